use std::time::Duration;

use super::{Axis, LightPhase};
use crate::config::SignalConfig;
use crate::render::{LaneClass, SignalColor};

/// A light colour change the renderer should show, stamped with the
/// simulation time it was scheduled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalChange {
    pub at: Duration,
    pub axis: Axis,
    pub class: LaneClass,
    pub color: SignalColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepKind {
    /// Active axis goes yellow and stops admitting traffic.
    StopIntent,
    /// Stopping axis turns red.
    AllRed,
    /// Other axis gets a protected left arrow.
    ProtectedLeft,
    /// Other axis left arrow drops to flashing yellow.
    FlashingLeft,
    /// Other axis through lanes go green.
    ThroughGreen,
}

#[derive(Debug, Clone, Copy)]
struct TransitionStep {
    offset: Duration,
    kind: StepKind,
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    from: Axis,
    started: Duration,
    next_step: usize,
}

impl Transition {
    fn to(&self) -> Axis {
        self.from.other()
    }
}

/// Time-driven light phase state machine for the two axes.
///
/// Starts with north-south `Go` and east-west `Stop`. Each transition hands
/// right-of-way to the other axis through a fixed table of offsets; only one
/// transition may be in flight at a time.
#[derive(Debug, Clone)]
pub struct LightController {
    phases: [LightPhase; 2],
    steps: [TransitionStep; 5],
    transition: Option<Transition>,
    swaps: u64,
}

impl LightController {
    pub fn new(config: &SignalConfig) -> Self {
        let ms = Duration::from_millis;
        let red_at = ms(config.yellow_ms);
        let left_at = red_at + ms(config.all_red_ms);
        let flashing_at = left_at + ms(config.protected_left_ms);
        let through_at = flashing_at + ms(config.flashing_left_ms);

        Self {
            phases: [LightPhase::Go, LightPhase::Stop],
            steps: [
                TransitionStep { offset: Duration::ZERO, kind: StepKind::StopIntent },
                TransitionStep { offset: red_at, kind: StepKind::AllRed },
                TransitionStep { offset: left_at, kind: StepKind::ProtectedLeft },
                TransitionStep { offset: flashing_at, kind: StepKind::FlashingLeft },
                TransitionStep { offset: through_at, kind: StepKind::ThroughGreen },
            ],
            transition: None,
            swaps: 0,
        }
    }

    pub fn phase(&self, axis: Axis) -> LightPhase {
        self.phases[axis.index()]
    }

    pub fn in_transition(&self) -> bool {
        self.transition.is_some()
    }

    /// Completed swaps since construction.
    pub fn swaps(&self) -> u64 {
        self.swaps
    }

    /// The axis currently holding `Go`, if any.
    pub fn active_axis(&self) -> Option<Axis> {
        Axis::ALL.into_iter().find(|&axis| self.phase(axis) == LightPhase::Go)
    }

    /// At most one axis may be `Go` or `Turn` at any instant.
    pub fn check_invariant(&self) -> bool {
        !(self.phases[0].is_active() && self.phases[1].is_active())
    }

    /// Colours matching the current phases, used to paint the initial state.
    pub fn current_signals(&self, now: Duration) -> Vec<SignalChange> {
        Axis::ALL
            .into_iter()
            .flat_map(|axis| {
                let (through, left) = match self.phase(axis) {
                    LightPhase::Go => (SignalColor::Green, SignalColor::FlashingYellow),
                    LightPhase::Turn => (SignalColor::Red, SignalColor::Green),
                    LightPhase::Stop => (SignalColor::Red, SignalColor::Red),
                };
                [
                    SignalChange { at: now, axis, class: LaneClass::Through, color: through },
                    SignalChange { at: now, axis, class: LaneClass::Left, color: left },
                ]
            })
            .collect()
    }

    /// Start handing right-of-way to the other axis. Ignored (returns false)
    /// while a previous transition is still in flight.
    pub fn begin_transition(&mut self, now: Duration) -> bool {
        if let Some(transition) = &self.transition {
            log::warn!(
                "Light transition from {} already in flight, ignoring request at {:?}",
                transition.from,
                now
            );
            return false;
        }

        let Some(from) = self.active_axis() else {
            log::warn!("No axis holds go at {:?}, light transition skipped", now);
            return false;
        };

        log::info!("Light transition {} -> {} started at {:?}", from, from.other(), now);
        self.transition = Some(Transition { from, started: now, next_step: 0 });
        true
    }

    /// Run every transition step due at or before `now`.
    pub fn advance(&mut self, now: Duration) -> Vec<SignalChange> {
        let mut changes = Vec::new();

        while let Some(mut transition) = self.transition {
            let step = self.steps[transition.next_step];
            let due = transition.started + step.offset;
            if due > now {
                break;
            }

            self.apply_step(&transition, step.kind, due, &mut changes);
            transition.next_step += 1;

            self.transition = if transition.next_step < self.steps.len() {
                Some(transition)
            } else {
                self.swaps += 1;
                log::info!("Light transition complete: {} now has go", transition.to());
                None
            };
        }

        changes
    }

    /// Drop any in-flight transition without applying the remaining steps.
    pub fn cancel(&mut self) {
        self.transition = None;
    }

    fn apply_step(&mut self, transition: &Transition, kind: StepKind, at: Duration, changes: &mut Vec<SignalChange>) {
        let from = transition.from;
        let to = transition.to();
        let mut signal = |axis, class, color| changes.push(SignalChange { at, axis, class, color });

        match kind {
            StepKind::StopIntent => {
                signal(from, LaneClass::Through, SignalColor::Yellow);
                signal(from, LaneClass::Left, SignalColor::Yellow);
                self.phases[from.index()] = LightPhase::Stop;
            }
            StepKind::AllRed => {
                signal(from, LaneClass::Through, SignalColor::Red);
                signal(from, LaneClass::Left, SignalColor::Red);
            }
            StepKind::ProtectedLeft => {
                signal(to, LaneClass::Left, SignalColor::Green);
                self.phases[to.index()] = LightPhase::Turn;
            }
            StepKind::FlashingLeft => {
                signal(to, LaneClass::Left, SignalColor::FlashingYellow);
            }
            StepKind::ThroughGreen => {
                signal(to, LaneClass::Through, SignalColor::Green);
                self.phases[to.index()] = LightPhase::Go;
            }
        }
        log::debug!("Light step {:?} at {:?}: {} {:?}, {} {:?}", kind, at, from, self.phase(from), to, self.phase(to));
    }
}
