use std::collections::BTreeSet;
use std::time::Duration;

use super::{Completion, Easing, LaneClass, Motion, Renderer, SignalColor, Transform, VehicleHandle};
use crate::simulation::{Axis, VehicleKind};

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    Signal {
        axis: Axis,
        class: LaneClass,
        color: SignalColor,
    },
    Place {
        handle: VehicleHandle,
        kind: VehicleKind,
        transform: Transform,
    },
    Animate {
        handle: VehicleHandle,
        motion: Motion,
        duration: Duration,
        easing: Easing,
        on_complete: Completion,
    },
    Remove {
        handle: VehicleHandle,
    },
}

/// Renderer that draws nothing and keeps every command it receives.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    commands: Vec<RenderCommand>,
    next_handle: u64,
    live: BTreeSet<VehicleHandle>,
    outstanding: Vec<(VehicleHandle, Completion)>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Drain the command log.
    pub fn take_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn signals(&self) -> Vec<(Axis, LaneClass, SignalColor)> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                RenderCommand::Signal { axis, class, color } => Some((*axis, *class, *color)),
                _ => None,
            })
            .collect()
    }

    pub fn animations_of(&self, handle: VehicleHandle) -> Vec<&RenderCommand> {
        self.commands
            .iter()
            .filter(|command| matches!(command, RenderCommand::Animate { handle: h, .. } if *h == handle))
            .collect()
    }

    pub fn live_vehicles(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, handle: VehicleHandle) -> bool {
        self.live.contains(&handle)
    }

    /// Finish every animation issued so far, applying each completion once.
    /// Returns how many animations finished.
    pub fn complete_all(&mut self) -> usize {
        let finished = std::mem::take(&mut self.outstanding);
        for (handle, completion) in &finished {
            if *completion == Completion::Remove {
                self.remove_vehicle(*handle);
            }
        }
        finished.len()
    }
}

impl Renderer for RecordingRenderer {
    fn apply_lane_signal(&mut self, axis: Axis, class: LaneClass, color: SignalColor) {
        self.commands.push(RenderCommand::Signal { axis, class, color });
    }

    fn place_vehicle(&mut self, kind: VehicleKind, transform: Transform) -> VehicleHandle {
        let handle = VehicleHandle(self.next_handle);
        self.next_handle += 1;
        self.live.insert(handle);
        self.commands.push(RenderCommand::Place { handle, kind, transform });
        handle
    }

    fn animate_vehicle(
        &mut self,
        handle: VehicleHandle,
        motion: Motion,
        duration: Duration,
        easing: Easing,
        on_complete: Completion,
    ) {
        self.outstanding.push((handle, on_complete));
        self.commands.push(RenderCommand::Animate { handle, motion, duration, easing, on_complete });
    }

    fn remove_vehicle(&mut self, handle: VehicleHandle) {
        self.live.remove(&handle);
        self.commands.push(RenderCommand::Remove { handle });
    }
}
