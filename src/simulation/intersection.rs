use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::time::Duration;

use super::{
    can_proceed, lane_transform, turn_path, Approach, Axis, Continuation, Lane, LanePosition, LightController,
    LightPhase, OccupancyModel, PeriodicTimer, Scheduler, SignalChange, SimulationStats, Vehicle, VehicleKind,
};
use crate::config::SimulationConfig;
use crate::render::{Completion, Easing, Motion, Renderer};

const PULL_UP_MS: u64 = 1_000;
const TURN_MS: u64 = 2_000;
const LEFT_TURN_FROM_OFFSCREEN_MS: u64 = 2_400;
const THROUGH_MS: u64 = 2_200;

/// One running intersection: lights, queues and pending continuations, with
/// all visual output going to `R`.
///
/// Driven by [`Intersection::tick`] with a monotonic simulation time.
pub struct Intersection<R: Renderer> {
    config: SimulationConfig,
    lights: LightController,
    occupancy: OccupancyModel,
    scheduler: Scheduler,
    light_timer: PeriodicTimer,
    vehicle_timer: PeriodicTimer,
    renderer: R,
    rng: StdRng,
    running: bool,
    stats: SimulationStats,
}

impl<R: Renderer> Intersection<R> {
    pub fn new(config: SimulationConfig, renderer: R) -> Self {
        let rng = if let Some(seed) = config.traffic.seed {
            StdRng::seed_from_u64(seed)
        } else {
            StdRng::from_entropy()
        };

        let lights = LightController::new(&config.signals);
        let initial_signals = lights.current_signals(Duration::ZERO);

        let mut intersection = Self {
            light_timer: PeriodicTimer::new(config.signals.timing()),
            vehicle_timer: PeriodicTimer::new(config.traffic.rate()),
            config,
            lights,
            occupancy: OccupancyModel::new(),
            scheduler: Scheduler::new(),
            renderer,
            rng,
            running: true,
            stats: SimulationStats::default(),
        };
        intersection.apply_signals(initial_signals);

        log::info!(
            "Intersection started: light timing {}ms, vehicle rate {}ms",
            intersection.config.signals.timing_ms,
            intersection.config.traffic.rate_ms
        );
        intersection
    }

    /// One cooperative scheduler step at simulation time `now`.
    ///
    /// Resumes due continuations, then fires the light timer (starting a
    /// transition whose first step lands in this same tick) and the vehicle
    /// timer (spawn, then release pass). Vehicles released with a due time
    /// of `now` pull away in this tick.
    pub fn tick(&mut self, now: Duration) {
        if !self.running {
            return;
        }

        self.resume_due(now);

        if self.light_timer.fire(now) && self.lights.begin_transition(now) {
            let changes = self.lights.advance(now);
            self.apply_signals(changes);
        }

        if self.vehicle_timer.fire(now) {
            self.add_random_vehicle(now);
            self.release_vehicles(now);
            self.dispatch_due(now);
        }
    }

    /// Stop the simulation. Pending continuations and any in-flight light
    /// transition are dropped; later ticks do nothing.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        let dropped = self.scheduler.len();
        self.scheduler.clear();
        self.lights.cancel();
        log::info!("Intersection stopped, {} pending continuations dropped", dropped);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn phase(&self, axis: Axis) -> LightPhase {
        self.lights.phase(axis)
    }

    pub fn lights(&self) -> &LightController {
        &self.lights
    }

    pub fn occupancy(&self) -> &OccupancyModel {
        &self.occupancy
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn stats(&self) -> SimulationStats {
        SimulationStats { light_swaps: self.lights.swaps(), ..self.stats }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn pending_continuations(&self) -> usize {
        self.scheduler.len()
    }

    pub fn can_proceed(&self, approach: Approach, lane: Lane) -> bool {
        can_proceed(self.lights.phase(approach.axis()), &self.occupancy, approach, lane)
    }

    /// Place a new vehicle of `kind` in `lane` and start it moving: through
    /// the intersection if it may proceed, otherwise up to the stop line and
    /// into the lane queue. Returns false when the lane queue is full.
    pub fn spawn_vehicle(&mut self, approach: Approach, lane: Lane, kind: VehicleKind, now: Duration) -> bool {
        if !self.running {
            return false;
        }

        let index = self.occupancy.queue_len(approach, lane);
        if index >= super::LANE_CAPACITY {
            log::debug!("Lane {} {} is full, not spawning", approach, lane);
            return false;
        }

        let start = lane_transform(approach, lane, LanePosition::Start, index);
        let handle = self.renderer.place_vehicle(kind, start);
        let vehicle = Vehicle { handle, kind, approach, lane, index, spawned_at: now };
        self.stats.spawned += 1;

        if self.can_proceed(approach, lane) {
            log::debug!("Vehicle {} in {} lane {} drives straight through", handle.0, approach, lane);
            self.send_through(&vehicle, index, true);
        } else {
            self.pull_up(&vehicle, index);
            if self.occupancy.try_enqueue(approach, lane, vehicle) {
                self.stats.queued += 1;
                log::debug!("Vehicle {} queued in {} lane {} at slot {}", handle.0, approach, lane, index);
            }
        }
        true
    }

    fn add_random_vehicle(&mut self, now: Duration) {
        let available = self.occupancy.available_lanes();
        let Some((approach, lane)) = self.pick_lane(&available) else {
            self.stats.skipped_spawns += 1;
            log::debug!("No lane has room, skipping spawn at {:?}", now);
            return;
        };
        let kind = VehicleKind::ALL[self.rng.gen_range(0..VehicleKind::ALL.len())];
        self.spawn_vehicle(approach, lane, kind, now);
    }

    fn pick_lane(&mut self, available: &BTreeMap<Approach, Vec<Lane>>) -> Option<(Approach, Lane)> {
        let approaches: Vec<Approach> = available.keys().copied().collect();
        let approach = *approaches.choose(&mut self.rng)?;
        let lane = *available.get(&approach)?.choose(&mut self.rng)?;
        Some((approach, lane))
    }

    /// Empty every lane that may proceed and schedule its vehicles to pull
    /// away one after another.
    fn release_vehicles(&mut self, now: Duration) {
        // Decide against the queues as they stand before anything is released.
        let drivable: Vec<(Approach, Lane)> = self
            .occupancy
            .occupied_lanes()
            .into_iter()
            .filter(|&(approach, lane)| self.can_proceed(approach, lane))
            .collect();

        let stagger = Duration::from_millis(self.config.traffic.release_stagger_ms);
        let jitter_ms = self.config.traffic.release_jitter_ms;

        for (approach, lane) in drivable {
            let released = self.occupancy.dequeue_all(approach, lane);
            log::debug!("Releasing {} vehicles from {} lane {}", released.len(), approach, lane);
            self.stats.released += released.len() as u64;

            let mut due = now;
            for (index, vehicle) in released.into_iter().enumerate() {
                if index > 0 {
                    due += stagger;
                }
                if jitter_ms > 0 {
                    due += Duration::from_millis(self.rng.gen_range(0..jitter_ms));
                }
                self.scheduler.schedule(due, Continuation::Drive { vehicle, index });
            }
        }
    }

    fn resume_due(&mut self, now: Duration) {
        let changes = self.lights.advance(now);
        self.apply_signals(changes);
        self.dispatch_due(now);
    }

    fn dispatch_due(&mut self, now: Duration) {
        for (due, continuation) in self.scheduler.drain_due(now) {
            self.run_continuation(due, continuation);
        }
    }

    fn run_continuation(&mut self, due: Duration, continuation: Continuation) {
        if !self.running {
            log::debug!("Dropping continuation due at {:?} after stop", due);
            return;
        }

        match continuation {
            Continuation::Drive { vehicle, index } => {
                // Already out of the queue, so it goes regardless of the light now.
                self.send_through(&vehicle, index, false);
                self.stats.dispatched += 1;
            }
        }
    }

    fn apply_signals(&mut self, changes: Vec<SignalChange>) {
        for change in changes {
            self.renderer.apply_lane_signal(change.axis, change.class, change.color);
        }
    }

    fn pull_up(&mut self, vehicle: &Vehicle, index: usize) {
        let stop = lane_transform(vehicle.approach, vehicle.lane, LanePosition::Stop, index);
        self.renderer.animate_vehicle(
            vehicle.handle,
            Motion::To(stop),
            Duration::from_millis(PULL_UP_MS),
            Easing::EaseIn,
            Completion::Hold,
        );
    }

    fn send_through(&mut self, vehicle: &Vehicle, index: usize, from_offscreen: bool) {
        let (motion, duration_ms, easing) = match turn_path(vehicle.approach, vehicle.lane, index, from_offscreen) {
            Some(path) if vehicle.lane.is_left() => {
                let duration_ms = if from_offscreen { LEFT_TURN_FROM_OFFSCREEN_MS } else { TURN_MS };
                (Motion::Path(path), duration_ms, Easing::EaseOut)
            }
            Some(path) => (Motion::Path(path), TURN_MS, Easing::Linear),
            None => {
                let end = lane_transform(vehicle.approach, vehicle.lane, LanePosition::End, index);
                (Motion::To(end), THROUGH_MS, Easing::EaseOut)
            }
        };

        self.renderer.animate_vehicle(
            vehicle.handle,
            motion,
            Duration::from_millis(duration_ms),
            easing,
            Completion::Remove,
        );
    }
}
