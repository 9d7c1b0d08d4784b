use std::collections::BTreeMap;

use super::{Approach, Lane, Vehicle};

/// Vehicles stopped at a single lane's stop line.
pub const LANE_CAPACITY: usize = 2;

/// Per-approach, per-lane queues of vehicles waiting at the stop line.
///
/// Vehicles in motion through the intersection are never tracked here.
#[derive(Debug, Clone, Default)]
pub struct OccupancyModel {
    queues: [[Vec<Vehicle>; Lane::COUNT]; 4],
}

impl OccupancyModel {
    pub fn new() -> Self {
        Self::default()
    }

    fn queue(&self, approach: Approach, lane: Lane) -> &Vec<Vehicle> {
        &self.queues[approach.index()][lane.index()]
    }

    fn queue_mut(&mut self, approach: Approach, lane: Lane) -> &mut Vec<Vehicle> {
        &mut self.queues[approach.index()][lane.index()]
    }

    /// Append `vehicle` to the tail of the lane queue. Returns false, leaving
    /// the queue untouched, when the lane is already full.
    pub fn try_enqueue(&mut self, approach: Approach, lane: Lane, vehicle: Vehicle) -> bool {
        let queue = self.queue_mut(approach, lane);
        if queue.len() >= LANE_CAPACITY {
            return false;
        }
        queue.push(vehicle);
        true
    }

    /// Empty the lane queue, returning its vehicles in arrival order.
    pub fn dequeue_all(&mut self, approach: Approach, lane: Lane) -> Vec<Vehicle> {
        std::mem::take(self.queue_mut(approach, lane))
    }

    /// Lanes with room for another vehicle, keyed by approach. Approaches
    /// without any free lane are left out.
    pub fn available_lanes(&self) -> BTreeMap<Approach, Vec<Lane>> {
        Approach::ALL
            .iter()
            .filter_map(|&approach| {
                let free: Vec<Lane> = Lane::ALL
                    .iter()
                    .copied()
                    .filter(|&lane| self.queue_len(approach, lane) < LANE_CAPACITY)
                    .collect();
                (!free.is_empty()).then_some((approach, free))
            })
            .collect()
    }

    pub fn queue_len(&self, approach: Approach, lane: Lane) -> usize {
        self.queue(approach, lane).len()
    }

    pub fn is_empty(&self, approach: Approach, lane: Lane) -> bool {
        self.queue(approach, lane).is_empty()
    }

    pub fn vehicles(&self, approach: Approach, lane: Lane) -> &[Vehicle] {
        self.queue(approach, lane)
    }

    /// Lanes that currently hold at least one vehicle.
    pub fn occupied_lanes(&self) -> Vec<(Approach, Lane)> {
        Approach::ALL
            .iter()
            .flat_map(|&approach| Lane::ALL.iter().map(move |&lane| (approach, lane)))
            .filter(|&(approach, lane)| !self.is_empty(approach, lane))
            .collect()
    }

    pub fn total(&self) -> usize {
        self.queues.iter().flatten().map(Vec::len).sum()
    }
}
