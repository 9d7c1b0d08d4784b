pub mod geometry;
pub mod occupancy;
pub mod right_of_way;
pub mod lights;
pub mod scheduler;
pub mod intersection;

pub use geometry::*;
pub use occupancy::*;
pub use right_of_way::*;
pub use lights::*;
pub use scheduler::*;
pub use intersection::*;

use nalgebra::{Point2, Vector2};
use std::fmt;
use std::time::Duration;

use crate::render::VehicleHandle;

pub type Vec2 = Vector2<f64>;
pub type Point = Point2<f64>;

/// One of the four roads feeding the intersection, named for the side the
/// vehicles arrive from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Approach {
    North,
    South,
    East,
    West,
}

impl Approach {
    pub const ALL: [Approach; 4] = [Approach::North, Approach::South, Approach::East, Approach::West];

    pub fn axis(self) -> Axis {
        match self {
            Approach::North | Approach::South => Axis::NorthSouth,
            Approach::East | Approach::West => Axis::EastWest,
        }
    }

    /// The approach facing this one across the intersection.
    pub fn opposite(self) -> Approach {
        match self {
            Approach::North => Approach::South,
            Approach::South => Approach::North,
            Approach::East => Approach::West,
            Approach::West => Approach::East,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Approach::North => 0,
            Approach::South => 1,
            Approach::East => 2,
            Approach::West => 3,
        }
    }
}

impl fmt::Display for Approach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Approach::North => "north",
            Approach::South => "south",
            Approach::East => "east",
            Approach::West => "west",
        };
        f.write_str(name)
    }
}

/// A perpendicular pair of approaches sharing one light phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    NorthSouth,
    EastWest,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::NorthSouth, Axis::EastWest];

    pub fn other(self) -> Axis {
        match self {
            Axis::NorthSouth => Axis::EastWest,
            Axis::EastWest => Axis::NorthSouth,
        }
    }

    pub fn approaches(self) -> [Approach; 2] {
        match self {
            Axis::NorthSouth => [Approach::North, Approach::South],
            Axis::EastWest => [Approach::East, Approach::West],
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Axis::NorthSouth => 0,
            Axis::EastWest => 1,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::NorthSouth => f.write_str("north-south"),
            Axis::EastWest => f.write_str("east-west"),
        }
    }
}

/// Lane number within an approach: 0 turns left, 1 and 2 go straight, 3 turns right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lane(u8);

impl Lane {
    pub const LEFT: Lane = Lane(0);
    pub const THROUGH_INNER: Lane = Lane(1);
    pub const THROUGH_OUTER: Lane = Lane(2);
    pub const RIGHT: Lane = Lane(3);

    pub const ALL: [Lane; 4] = [Lane::LEFT, Lane::THROUGH_INNER, Lane::THROUGH_OUTER, Lane::RIGHT];
    pub const COUNT: usize = 4;

    pub fn new(index: u8) -> Option<Lane> {
        (index < Self::COUNT as u8).then_some(Lane(index))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_left(self) -> bool {
        self == Lane::LEFT
    }

    pub fn is_right(self) -> bool {
        self == Lane::RIGHT
    }

    pub fn is_through(self) -> bool {
        !self.is_left() && !self.is_right()
    }

    pub fn is_turn(self) -> bool {
        !self.is_through()
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Right-of-way mode of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightPhase {
    /// Through traffic may go, lefts yield to oncoming through traffic.
    Go,
    /// Protected (then flashing) left turn, through traffic still held.
    Turn,
    Stop,
}

impl LightPhase {
    pub fn is_active(self) -> bool {
        self != LightPhase::Stop
    }
}

/// Glyph variants the renderer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleKind {
    Red,
    Green,
    Blue,
    Silver,
    Purple,
    Taxi,
}

impl VehicleKind {
    pub const ALL: [VehicleKind; 6] = [
        VehicleKind::Red,
        VehicleKind::Green,
        VehicleKind::Blue,
        VehicleKind::Silver,
        VehicleKind::Purple,
        VehicleKind::Taxi,
    ];
}

/// Bookkeeping for a vehicle waiting at (or spawned toward) the stop line.
/// The visual itself belongs to the renderer and is only referenced by handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vehicle {
    pub handle: VehicleHandle,
    pub kind: VehicleKind,
    pub approach: Approach,
    pub lane: Lane,
    /// Position in the lane queue at spawn time.
    pub index: usize,
    pub spawned_at: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationStats {
    pub spawned: u64,
    pub queued: u64,
    pub released: u64,
    pub dispatched: u64,
    pub skipped_spawns: u64,
    pub light_swaps: u64,
}
