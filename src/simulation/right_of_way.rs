use super::{Approach, Lane, LightPhase, OccupancyModel};

/// Whether a vehicle waiting in `lane` of `approach` may enter the
/// intersection under the given axis phase.
///
/// - right turns always may (right on red);
/// - through lanes need `Go`;
/// - left turns need `Turn`, or `Go` with both through lanes of the opposite
///   approach empty. The opposite left and right lanes are not consulted.
///
/// During a swap both axes can be `Stop`; only right turns pass then.
pub fn can_proceed(phase: LightPhase, occupancy: &OccupancyModel, approach: Approach, lane: Lane) -> bool {
    if lane.is_right() {
        return true;
    }

    match phase {
        LightPhase::Stop => false,
        LightPhase::Turn => lane.is_left(),
        LightPhase::Go if lane.is_through() => true,
        LightPhase::Go => opposing_through_empty(occupancy, approach),
    }
}

fn opposing_through_empty(occupancy: &OccupancyModel, approach: Approach) -> bool {
    let opposite = approach.opposite();
    occupancy.is_empty(opposite, Lane::THROUGH_INNER) && occupancy.is_empty(opposite, Lane::THROUGH_OUTER)
}
