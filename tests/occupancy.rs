use std::time::Duration;

use intersection_sim::render::VehicleHandle;
use intersection_sim::simulation::{
    can_proceed, Approach, Lane, LightPhase, OccupancyModel, Vehicle, VehicleKind, LANE_CAPACITY,
};

fn vehicle(id: u64, approach: Approach, lane: Lane) -> Vehicle {
    Vehicle {
        handle: VehicleHandle(id),
        kind: VehicleKind::Blue,
        approach,
        lane,
        index: 0,
        spawned_at: Duration::from_millis(id * 1000),
    }
}

#[test]
fn test_enqueue_until_full() {
    let mut occupancy = OccupancyModel::new();
    let (approach, lane) = (Approach::North, Lane::THROUGH_INNER);

    assert!(occupancy.try_enqueue(approach, lane, vehicle(1, approach, lane)));
    assert!(occupancy.try_enqueue(approach, lane, vehicle(2, approach, lane)));
    assert!(!occupancy.try_enqueue(approach, lane, vehicle(3, approach, lane)));

    assert_eq!(occupancy.queue_len(approach, lane), LANE_CAPACITY);
    let handles: Vec<u64> = occupancy.vehicles(approach, lane).iter().map(|v| v.handle.0).collect();
    assert_eq!(handles, vec![1, 2]);
}

#[test]
fn test_dequeue_all_keeps_arrival_order() {
    let mut occupancy = OccupancyModel::new();
    let (approach, lane) = (Approach::West, Lane::LEFT);
    occupancy.try_enqueue(approach, lane, vehicle(7, approach, lane));
    occupancy.try_enqueue(approach, lane, vehicle(3, approach, lane));

    let released = occupancy.dequeue_all(approach, lane);
    let handles: Vec<u64> = released.iter().map(|v| v.handle.0).collect();
    assert_eq!(handles, vec![7, 3]);
    assert!(occupancy.is_empty(approach, lane));
    assert!(occupancy.dequeue_all(approach, lane).is_empty());
}

#[test]
fn test_available_lanes_omits_full_approaches() {
    let mut occupancy = OccupancyModel::new();
    assert_eq!(occupancy.available_lanes().len(), 4);

    for lane in Lane::ALL {
        for id in 0..LANE_CAPACITY as u64 {
            assert!(occupancy.try_enqueue(Approach::East, lane, vehicle(id, Approach::East, lane)));
        }
    }
    occupancy.try_enqueue(Approach::South, Lane::RIGHT, vehicle(9, Approach::South, Lane::RIGHT));
    occupancy.try_enqueue(Approach::South, Lane::RIGHT, vehicle(10, Approach::South, Lane::RIGHT));

    let available = occupancy.available_lanes();
    assert!(!available.contains_key(&Approach::East));
    assert_eq!(available[&Approach::South], vec![Lane::LEFT, Lane::THROUGH_INNER, Lane::THROUGH_OUTER]);
    assert_eq!(available[&Approach::North], Lane::ALL.to_vec());
}

#[test]
fn test_capacity_bound_across_all_queues() {
    let mut occupancy = OccupancyModel::new();
    let mut id = 0;
    for approach in Approach::ALL {
        for lane in Lane::ALL {
            for _ in 0..5 {
                occupancy.try_enqueue(approach, lane, vehicle(id, approach, lane));
                id += 1;
            }
            assert!(occupancy.queue_len(approach, lane) <= LANE_CAPACITY);
        }
    }

    assert_eq!(occupancy.total(), 32);
    assert!(occupancy.available_lanes().is_empty());
    assert_eq!(occupancy.occupied_lanes().len(), 16);
}

#[test]
fn test_right_turn_always_proceeds() {
    let mut occupancy = OccupancyModel::new();
    occupancy.try_enqueue(Approach::North, Lane::THROUGH_INNER, vehicle(1, Approach::North, Lane::THROUGH_INNER));

    for approach in Approach::ALL {
        for phase in [LightPhase::Go, LightPhase::Turn, LightPhase::Stop] {
            assert!(can_proceed(phase, &occupancy, approach, Lane::RIGHT));
        }
    }
}

#[test]
fn test_through_lanes_need_go() {
    let occupancy = OccupancyModel::new();
    for lane in [Lane::THROUGH_INNER, Lane::THROUGH_OUTER] {
        assert!(can_proceed(LightPhase::Go, &occupancy, Approach::East, lane));
        assert!(!can_proceed(LightPhase::Turn, &occupancy, Approach::East, lane));
        assert!(!can_proceed(LightPhase::Stop, &occupancy, Approach::East, lane));
    }
}

#[test]
fn test_left_turn_protected_and_stopped() {
    let mut occupancy = OccupancyModel::new();
    occupancy.try_enqueue(Approach::South, Lane::THROUGH_INNER, vehicle(1, Approach::South, Lane::THROUGH_INNER));

    // Oncoming traffic does not matter under a protected arrow.
    assert!(can_proceed(LightPhase::Turn, &occupancy, Approach::North, Lane::LEFT));
    assert!(!can_proceed(LightPhase::Stop, &occupancy, Approach::North, Lane::LEFT));
    assert!(!can_proceed(LightPhase::Stop, &OccupancyModel::new(), Approach::North, Lane::LEFT));
}

#[test]
fn test_permissive_left_with_empty_opposing_through_lanes() {
    let mut occupancy = OccupancyModel::new();
    // Opposing left and right lanes are not checked.
    occupancy.try_enqueue(Approach::South, Lane::LEFT, vehicle(1, Approach::South, Lane::LEFT));
    occupancy.try_enqueue(Approach::South, Lane::RIGHT, vehicle(2, Approach::South, Lane::RIGHT));
    // Same-side through traffic is irrelevant too.
    occupancy.try_enqueue(Approach::North, Lane::THROUGH_INNER, vehicle(3, Approach::North, Lane::THROUGH_INNER));

    assert!(can_proceed(LightPhase::Go, &occupancy, Approach::North, Lane::LEFT));
}

#[test]
fn test_permissive_left_blocked_by_oncoming_through_traffic() {
    for blocking_lane in [Lane::THROUGH_INNER, Lane::THROUGH_OUTER] {
        let mut occupancy = OccupancyModel::new();
        occupancy.try_enqueue(Approach::South, blocking_lane, vehicle(1, Approach::South, blocking_lane));

        assert!(!can_proceed(LightPhase::Go, &occupancy, Approach::North, Lane::LEFT));
        // South's own left only looks at north's through lanes.
        assert!(can_proceed(LightPhase::Go, &occupancy, Approach::South, Lane::LEFT));
    }

    let mut occupancy = OccupancyModel::new();
    occupancy.try_enqueue(Approach::West, Lane::THROUGH_OUTER, vehicle(1, Approach::West, Lane::THROUGH_OUTER));
    assert!(!can_proceed(LightPhase::Go, &occupancy, Approach::East, Lane::LEFT));
    assert!(can_proceed(LightPhase::Go, &occupancy, Approach::North, Lane::LEFT));
}
