//! Boundary between the simulation core and whatever draws it.
//!
//! The core only ever tells a [`Renderer`] where things go; it never asks
//! the renderer for vehicle state.

use std::time::Duration;

use crate::simulation::{Axis, VehicleKind};

pub mod recorder;
pub mod console;

pub use recorder::*;
pub use console::*;
pub use crate::simulation::geometry::{Transform, TurnPath};

/// Renderer-owned vehicle glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleHandle(pub u64);

/// Which signal head of an axis a colour applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneClass {
    Through,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalColor {
    Red,
    Yellow,
    Green,
    FlashingYellow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
}

impl Easing {
    /// Map linear progress in [0, 1] to eased progress.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t.powf(1.7),
            Easing::EaseOut => t.powf(0.48),
        }
    }
}

/// What a vehicle animation moves toward.
#[derive(Debug, Clone, PartialEq)]
pub enum Motion {
    /// Straight slide to a transform.
    To(Transform),
    /// Follow a turn path, orienting the glyph along its tangent.
    Path(TurnPath),
}

impl Motion {
    /// Transform at `progress` in [0, 1] of the motion, starting from `from`.
    pub fn sample(&self, from: &Transform, progress: f64) -> Transform {
        let progress = progress.clamp(0.0, 1.0);
        match self {
            Motion::To(target) => from.lerp(target, progress),
            Motion::Path(path) => path.sample(path.length() * progress),
        }
    }

    pub fn target(&self) -> Transform {
        match self {
            Motion::To(target) => *target,
            Motion::Path(path) => path.end(),
        }
    }
}

/// What the renderer does once an animation has finished. Applied exactly
/// once per animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Leave the glyph where it stopped.
    Hold,
    /// Dispose of the glyph; the vehicle has left the intersection.
    Remove,
}

pub trait Renderer {
    fn apply_lane_signal(&mut self, axis: Axis, class: LaneClass, color: SignalColor);

    fn place_vehicle(&mut self, kind: VehicleKind, transform: Transform) -> VehicleHandle;

    fn animate_vehicle(
        &mut self,
        handle: VehicleHandle,
        motion: Motion,
        duration: Duration,
        easing: Easing,
        on_complete: Completion,
    );

    fn remove_vehicle(&mut self, handle: VehicleHandle);
}
