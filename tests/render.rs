use std::time::Duration;

use intersection_sim::render::{
    Completion, ConsoleRenderer, Easing, LaneClass, Motion, RecordingRenderer, RenderCommand, Renderer, SignalColor,
    Transform,
};
use intersection_sim::simulation::{turn_path, Approach, Axis, Lane, VehicleKind};

#[test]
fn test_easing_endpoints_and_shape() {
    for easing in [Easing::Linear, Easing::EaseIn, Easing::EaseOut] {
        assert_eq!(easing.apply(0.0), 0.0);
        assert_eq!(easing.apply(1.0), 1.0);
        assert_eq!(easing.apply(2.0), 1.0);
        assert_eq!(easing.apply(-1.0), 0.0);
    }
    assert!(Easing::EaseIn.apply(0.5) < 0.5);
    assert!(Easing::EaseOut.apply(0.5) > 0.5);
    assert_eq!(Easing::Linear.apply(0.25), 0.25);
}

#[test]
fn test_motion_sampling() {
    let from = Transform::new(180.0, 100.0, 0.0);
    let to = Motion::To(Transform::new(180.0, 100.0, 200.0));
    assert_eq!(to.sample(&from, 0.5), Transform::new(180.0, 100.0, 100.0));
    assert_eq!(to.target(), Transform::new(180.0, 100.0, 200.0));

    let path = turn_path(Approach::West, Lane::LEFT, 0, true).unwrap();
    let along = Motion::Path(path.clone());
    assert_eq!(along.sample(&from, 0.0), path.start());
    assert_eq!(along.sample(&from, 1.0), path.sample(path.length()));
    assert_eq!(along.target(), path.end());
}

#[test]
fn test_recording_renderer_completion_runs_once() {
    let mut renderer = RecordingRenderer::new();
    let parked = renderer.place_vehicle(VehicleKind::Red, Transform::new(0.0, 10.0, 10.0));
    let leaving = renderer.place_vehicle(VehicleKind::Taxi, Transform::new(90.0, 20.0, 20.0));
    assert_ne!(parked, leaving);

    let duration = Duration::from_millis(1_000);
    renderer.animate_vehicle(parked, Motion::To(Transform::new(0.0, 10.0, 50.0)), duration, Easing::EaseIn, Completion::Hold);
    renderer.animate_vehicle(leaving, Motion::To(Transform::new(90.0, 900.0, 20.0)), duration, Easing::EaseOut, Completion::Remove);
    assert_eq!(renderer.live_vehicles(), 2);

    assert_eq!(renderer.complete_all(), 2);
    assert!(renderer.is_live(parked));
    assert!(!renderer.is_live(leaving));

    assert_eq!(renderer.complete_all(), 0);
    let removals = renderer
        .commands()
        .iter()
        .filter(|command| matches!(command, RenderCommand::Remove { .. }))
        .count();
    assert_eq!(removals, 1);
}

#[test]
fn test_recording_renderer_signal_log() {
    let mut renderer = RecordingRenderer::new();
    renderer.apply_lane_signal(Axis::EastWest, LaneClass::Left, SignalColor::FlashingYellow);
    renderer.apply_lane_signal(Axis::NorthSouth, LaneClass::Through, SignalColor::Red);

    assert_eq!(
        renderer.signals(),
        vec![
            (Axis::EastWest, LaneClass::Left, SignalColor::FlashingYellow),
            (Axis::NorthSouth, LaneClass::Through, SignalColor::Red),
        ]
    );
    assert_eq!(renderer.take_commands().len(), 2);
    assert!(renderer.commands().is_empty());
}

#[test]
fn test_console_renderer_finishes_instant_animations() {
    let mut renderer = ConsoleRenderer::new();
    let handle = renderer.place_vehicle(VehicleKind::Blue, Transform::new(0.0, 0.0, 0.0));
    renderer.animate_vehicle(
        handle,
        Motion::To(Transform::new(0.0, 0.0, -200.0)),
        Duration::ZERO,
        Easing::Linear,
        Completion::Remove,
    );
    assert_eq!(renderer.active_animations(), 1);

    assert_eq!(renderer.poll(), 1);
    assert_eq!(renderer.live_vehicles(), 0);
    assert_eq!(renderer.removed(), 1);
    assert_eq!(renderer.poll(), 0);
}

#[test]
fn test_console_renderer_holds_parked_vehicle() {
    let mut renderer = ConsoleRenderer::new();
    let handle = renderer.place_vehicle(VehicleKind::Green, Transform::new(0.0, 5.0, 5.0));
    renderer.animate_vehicle(
        handle,
        Motion::To(Transform::new(0.0, 5.0, 100.0)),
        Duration::ZERO,
        Easing::EaseIn,
        Completion::Hold,
    );

    assert_eq!(renderer.poll(), 1);
    assert_eq!(renderer.live_vehicles(), 1);
    assert_eq!(renderer.active_animations(), 0);

    renderer.remove_vehicle(handle);
    renderer.remove_vehicle(handle);
    assert_eq!(renderer.removed(), 1);
}
