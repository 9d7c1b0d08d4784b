//! Lane placement and turn paths on the intersection canvas.
//!
//! The canvas is a square with the origin in the top-left corner and y
//! growing downwards. Every approach is described by one `ApproachGeometry`
//! row; all placement math is the same computation parametrized by that row.

use kurbo::{BezPath, CubicBez, Line, ParamCurve, ParamCurveArclen, ParamCurveDeriv, PathSeg};

use super::{Approach, Lane, Point, Vec2};

/// Lateral distance between neighbouring lanes.
pub const LANE_WIDTH: f64 = 60.0;
/// Along-lane spacing between queued vehicles (one vehicle length).
pub const VEHICLE_LENGTH: f64 = 100.0;
/// How far a right turn travels forward and sideways through the box.
pub const RIGHT_TURN_PITCH: f64 = 142.0;
/// How far a left turn travels forward and sideways through the box.
pub const LEFT_TURN_PITCH: f64 = 404.0;
/// Coordinates just outside the visible canvas.
pub const OFFSCREEN_MIN: f64 = -100.0;
pub const OFFSCREEN_MAX: f64 = 1130.0;

/// Back-off applied when a queued vehicle pulls away, so the path starts
/// under the glyph's pivot rather than its nose.
const PULL_AWAY_OFFSET: f64 = VEHICLE_LENGTH / 2.0;
/// Run-up for a right turn entering from off-screen, per queue slot.
const RIGHT_TURN_RUN_UP: f64 = 200.0;
const ARCLEN_ACCURACY: f64 = 1e-3;

/// Where along its lane a vehicle is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanePosition {
    /// Off-screen, before entering.
    Start,
    /// Queued at the stop line.
    Stop,
    /// Off-screen, past the far side of the intersection.
    End,
}

/// Position and heading of a vehicle glyph, rotation in degrees clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub rotation: f64,
    pub x: f64,
    pub y: f64,
}

impl Transform {
    pub fn new(rotation: f64, x: f64, y: f64) -> Self {
        Self { rotation, x, y }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Straight-line interpolation, rotation kept from `self`.
    pub fn lerp(&self, to: &Transform, t: f64) -> Transform {
        Transform {
            rotation: self.rotation,
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
        }
    }
}

/// Per-approach constants: glyph rotation, travel direction, where lane 0
/// sits laterally and which way higher lanes go, and the along-axis
/// coordinates of the three lane positions.
#[derive(Debug, Clone, Copy)]
struct ApproachGeometry {
    rotation: f64,
    heading: [f64; 2],
    lane_base: f64,
    lane_sign: f64,
    start: f64,
    stop: f64,
    end: f64,
}

static APPROACH_GEOMETRY: [ApproachGeometry; 4] = [
    // north: drives south, lanes count down from x=506
    ApproachGeometry { rotation: 180.0, heading: [0.0, 1.0], lane_base: 506.0, lane_sign: -1.0, start: -100.0, stop: 180.0, end: 1230.0 },
    // south: drives north, lanes count up from x=524
    ApproachGeometry { rotation: 0.0, heading: [0.0, -1.0], lane_base: 524.0, lane_sign: 1.0, start: 1130.0, stop: 850.0, end: -200.0 },
    // east: drives west, lanes count down from y=506
    ApproachGeometry { rotation: 270.0, heading: [-1.0, 0.0], lane_base: 506.0, lane_sign: -1.0, start: 1130.0, stop: 850.0, end: -200.0 },
    // west: drives east, lanes count up from y=524
    ApproachGeometry { rotation: 90.0, heading: [1.0, 0.0], lane_base: 524.0, lane_sign: 1.0, start: -100.0, stop: 180.0, end: 1230.0 },
];

impl ApproachGeometry {
    fn of(approach: Approach) -> &'static ApproachGeometry {
        &APPROACH_GEOMETRY[approach.index()]
    }

    fn heading(&self) -> Vec2 {
        Vec2::new(self.heading[0], self.heading[1])
    }

    /// Unit vector pointing to the driver's right (screen coordinates).
    fn right(&self) -> Vec2 {
        Vec2::new(-self.heading[1], self.heading[0])
    }

    fn is_vertical(&self) -> bool {
        self.heading[0] == 0.0
    }

    /// +1 when travel increases the along-axis coordinate, -1 otherwise.
    fn along_sign(&self) -> f64 {
        self.heading[0] + self.heading[1]
    }

    fn point(&self, along: f64, lateral: f64) -> Point {
        if self.is_vertical() {
            Point::new(lateral, along)
        } else {
            Point::new(along, lateral)
        }
    }

    /// Offset between the path tangent angle and the glyph rotation.
    fn path_rotation_offset(&self) -> f64 {
        let heading = self.heading();
        normalize_degrees(self.rotation - heading.y.atan2(heading.x).to_degrees())
    }
}

fn normalize_degrees(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

/// Replace the coordinate `direction` points along with the matching
/// off-screen value. `direction` must be axis-aligned.
fn offscreen_toward(point: Point, direction: Vec2) -> Point {
    let edge = |component: f64| if component < 0.0 { OFFSCREEN_MIN } else { OFFSCREEN_MAX };
    if direction.x != 0.0 {
        Point::new(edge(direction.x), point.y)
    } else {
        Point::new(point.x, edge(direction.y))
    }
}

fn kurbo_point(p: Point) -> kurbo::Point {
    kurbo::Point::new(p.x, p.y)
}

/// Glyph transform for a vehicle in `lane` of `approach` at `position`,
/// pushed back `index` vehicle lengths for stacked queues.
pub fn lane_transform(approach: Approach, lane: Lane, position: LanePosition, index: usize) -> Transform {
    let geometry = ApproachGeometry::of(approach);
    let base = match position {
        LanePosition::Start => geometry.start,
        LanePosition::Stop => geometry.stop,
        LanePosition::End => geometry.end,
    };
    let along = base - geometry.along_sign() * VEHICLE_LENGTH * index as f64;
    let lateral = geometry.lane_base + geometry.lane_sign * LANE_WIDTH * lane.index() as f64;
    let point = geometry.point(along, lateral);

    Transform::new(geometry.rotation, point.x, point.y)
}

/// A straight run-up, a cubic bend into the perpendicular road and a
/// straight exit off-screen.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnPath {
    pub approach: Approach,
    pub lane: Lane,
    pub entry: Line,
    pub curve: CubicBez,
    pub exit: Line,
    /// Added to the tangent angle (degrees) to get the glyph rotation.
    pub rotation_offset: f64,
    /// Arclength of each segment, measured once at construction.
    lengths: [f64; 3],
}

impl TurnPath {
    pub fn segments(&self) -> [PathSeg; 3] {
        [PathSeg::Line(self.entry), PathSeg::Cubic(self.curve), PathSeg::Line(self.exit)]
    }

    /// The three Bézier control points following the turn start.
    pub fn control_points(&self) -> [kurbo::Point; 3] {
        [self.curve.p1, self.curve.p2, self.curve.p3]
    }

    pub fn length(&self) -> f64 {
        self.lengths.iter().sum()
    }

    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.entry.p0);
        path.line_to(self.entry.p1);
        path.curve_to(self.curve.p1, self.curve.p2, self.curve.p3);
        path.line_to(self.exit.p1);
        path
    }

    /// SVG path data, e.g. for a renderer that animates along `<path d=..>`.
    pub fn to_svg(&self) -> String {
        self.to_bez_path().to_svg()
    }

    pub fn start(&self) -> Transform {
        self.sample(0.0)
    }

    pub fn end(&self) -> Transform {
        self.sample(f64::INFINITY)
    }

    /// Glyph transform after travelling `distance` along the path; clamps to
    /// the path ends.
    pub fn sample(&self, distance: f64) -> Transform {
        let segments = self.segments();
        let mut remaining = distance.max(0.0);
        let mut index = 0;
        // Anything past the end lands on the exit segment.
        while index + 1 < segments.len() && remaining > self.lengths[index] {
            remaining -= self.lengths[index];
            index += 1;
        }

        let seg = &segments[index];
        let seg_len = self.lengths[index];
        let t = if seg_len > 0.0 {
            seg.inv_arclen(remaining.min(seg_len), ARCLEN_ACCURACY)
        } else {
            0.0
        };
        self.transform_at(seg, t)
    }

    fn transform_at(&self, seg: &PathSeg, t: f64) -> Transform {
        let point = seg.eval(t);
        let mut tangent = match seg {
            PathSeg::Line(line) => line.p1 - line.p0,
            PathSeg::Quad(quad) => quad.deriv().eval(t).to_vec2(),
            PathSeg::Cubic(cubic) => cubic.deriv().eval(t).to_vec2(),
        };
        if tangent.hypot2() < f64::EPSILON {
            let heading = ApproachGeometry::of(self.approach).heading();
            tangent = kurbo::Vec2::new(heading.x, heading.y);
        }

        let rotation = normalize_degrees(tangent.atan2().to_degrees() + self.rotation_offset);
        Transform::new(rotation, point.x, point.y)
    }
}

/// Motion path for a turning vehicle, `None` for through lanes.
///
/// Right turns bend toward the road immediately clockwise; left turns sweep
/// across to the far lanes of the road on the other side. `from_offscreen`
/// only moves the starting anchor, never the curve.
pub fn turn_path(approach: Approach, lane: Lane, index: usize, from_offscreen: bool) -> Option<TurnPath> {
    if lane.is_through() {
        return None;
    }

    let geometry = ApproachGeometry::of(approach);
    let stop = lane_transform(approach, lane, LanePosition::Stop, index).position();
    let forward = geometry.heading();
    let right = geometry.right();

    let (lane_start, turn_start, c1, c2, turn_end, lane_end) = if lane.is_right() {
        let pitch = RIGHT_TURN_PITCH;
        let lane_start = if from_offscreen {
            stop - forward * RIGHT_TURN_RUN_UP * (index + 1) as f64
        } else {
            stop - forward * PULL_AWAY_OFFSET
        };
        let turn_end = stop + forward * pitch + right * pitch;
        (
            lane_start,
            stop + forward * (pitch / 2.0),
            stop + forward * pitch,
            stop + forward * pitch + right * (pitch / 2.0),
            turn_end,
            offscreen_toward(turn_end, right),
        )
    } else {
        let pitch = LEFT_TURN_PITCH;
        let left = -right;
        // Queued vehicles all start bending at the same spot.
        let queue_offset = VEHICLE_LENGTH * index as f64;
        let lane_start = if from_offscreen {
            offscreen_toward(stop, -forward)
        } else {
            stop - forward * PULL_AWAY_OFFSET
        };
        let turn_end = stop + forward * (queue_offset + pitch) + left * pitch;
        (
            lane_start,
            stop + forward * (queue_offset + pitch / 4.0),
            stop + forward * (queue_offset + pitch / 2.0),
            stop + forward * (queue_offset + pitch) + left * (pitch / 4.0),
            turn_end,
            offscreen_toward(turn_end, left),
        )
    };

    let entry = Line::new(kurbo_point(lane_start), kurbo_point(turn_start));
    let curve = CubicBez::new(kurbo_point(turn_start), kurbo_point(c1), kurbo_point(c2), kurbo_point(turn_end));
    let exit = Line::new(kurbo_point(turn_end), kurbo_point(lane_end));

    Some(TurnPath {
        approach,
        lane,
        entry,
        curve,
        exit,
        rotation_offset: geometry.path_rotation_offset(),
        lengths: [entry.arclen(ARCLEN_ACCURACY), curve.arclen(ARCLEN_ACCURACY), exit.arclen(ARCLEN_ACCURACY)],
    })
}
