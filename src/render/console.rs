use instant::Instant;
use std::collections::HashMap;
use std::time::Duration;

use super::{Completion, Easing, LaneClass, Motion, Renderer, SignalColor, Transform, VehicleHandle};
use crate::simulation::{Axis, VehicleKind};

#[derive(Debug)]
struct ActiveAnimation {
    handle: VehicleHandle,
    from: Transform,
    motion: Motion,
    started: Instant,
    duration: Duration,
    easing: Easing,
    on_complete: Completion,
}

/// Headless renderer: plays animations against the wall clock and reports
/// what it would draw through `log`.
#[derive(Debug, Default)]
pub struct ConsoleRenderer {
    next_handle: u64,
    positions: HashMap<VehicleHandle, Transform>,
    animations: Vec<ActiveAnimation>,
    removed: u64,
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_vehicles(&self) -> usize {
        self.positions.len()
    }

    pub fn active_animations(&self) -> usize {
        self.animations.len()
    }

    pub fn removed(&self) -> u64 {
        self.removed
    }

    /// Advance animations to the current instant; finished ones apply their
    /// completion. Returns how many finished.
    pub fn poll(&mut self) -> usize {
        let now = Instant::now();
        let mut finished = Vec::new();

        for animation in &self.animations {
            let elapsed = now.duration_since(animation.started);
            let progress = if animation.duration.is_zero() {
                1.0
            } else {
                elapsed.as_secs_f64() / animation.duration.as_secs_f64()
            };
            let transform = animation.motion.sample(&animation.from, animation.easing.apply(progress));
            self.positions.insert(animation.handle, transform);
            log::trace!(
                "Vehicle {} at ({:.0}, {:.0}) r{:.0}",
                animation.handle.0,
                transform.x,
                transform.y,
                transform.rotation
            );
            if progress >= 1.0 {
                finished.push((animation.handle, animation.on_complete));
            }
        }

        self.animations.retain(|animation| now.duration_since(animation.started) < animation.duration);

        for (handle, completion) in &finished {
            if *completion == Completion::Remove {
                self.remove_vehicle(*handle);
            }
        }
        finished.len()
    }
}

impl Renderer for ConsoleRenderer {
    fn apply_lane_signal(&mut self, axis: Axis, class: LaneClass, color: SignalColor) {
        log::info!("Signal {} {:?} -> {:?}", axis, class, color);
    }

    fn place_vehicle(&mut self, kind: VehicleKind, transform: Transform) -> VehicleHandle {
        let handle = VehicleHandle(self.next_handle);
        self.next_handle += 1;
        self.positions.insert(handle, transform);
        log::debug!("Placed {:?} vehicle {} at ({:.0}, {:.0})", kind, handle.0, transform.x, transform.y);
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
        let Some(from) = self.positions.get(&handle).copied() else {
            log::debug!("Ignoring animation for removed vehicle {}", handle.0);
            return;
        };
        // A newer animation of the same vehicle supersedes the old one
        self.animations.retain(|animation| animation.handle != handle);
        self.animations.push(ActiveAnimation {
            handle,
            from,
            motion,
            started: Instant::now(),
            duration,
            easing,
            on_complete,
        });
    }

    fn remove_vehicle(&mut self, handle: VehicleHandle) {
        self.animations.retain(|animation| animation.handle != handle);
        if self.positions.remove(&handle).is_some() {
            self.removed += 1;
            log::debug!("Removed vehicle {}", handle.0);
        }
    }
}
