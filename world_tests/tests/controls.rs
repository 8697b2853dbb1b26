//! Input control behaviour through the public API.

use world_client::controls::{HeadlessHost, PointerControls, PointerHost, SurfaceId};
use world_client::input::{ControlEvent, InputEvent, KeyBindings, ListenerSet};
use world_client::player::LocalPlayer;
use world_shared::physics::KinematicState;
use world_tests::*;

fn grant(controls: &mut PointerControls<HeadlessHost>, player: &mut LocalPlayer) {
    controls.dispatch(
        &InputEvent::PointerCaptureChange {
            target: Some(SURFACE),
        },
        player,
    );
}

#[test]
fn movement_key_down_never_reaches_ui() {
    init_tracing();
    let log = call_log();
    let mut keys = KeyBindings::new();
    bind_recording_action(&mut keys, "KeyE", &log);
    bind_recording_movement(&mut keys, "KeyE", &log);
    bind_recording_movement(&mut keys, "KeyW", &log);

    let mut controls = controls(keys);
    let mut player = local_player();
    controls.dispatch(&InputEvent::key_down("KeyE"), &mut player);
    controls.dispatch(&InputEvent::key_down("KeyW"), &mut player);

    assert_eq!(
        *log.borrow(),
        vec![("KeyE", Some(true)), ("KeyW", Some(true))]
    );
}

#[test]
fn ui_key_fires_on_press_only() {
    let log = call_log();
    let mut keys = KeyBindings::new();
    bind_recording_action(&mut keys, "KeyP", &log);

    let mut controls = controls(keys);
    let mut player = local_player();
    controls.dispatch(&InputEvent::key_down("KeyP"), &mut player);
    controls.dispatch(&InputEvent::key_up("KeyP"), &mut player);

    assert_eq!(*log.borrow(), vec![("KeyP", None)]);
}

#[test]
fn movement_key_release_passes_false() {
    let log = call_log();
    let mut keys = KeyBindings::new();
    bind_recording_movement(&mut keys, "KeyA", &log);

    let mut controls = controls(keys);
    let mut player = local_player();
    controls.dispatch(&InputEvent::key_down("KeyA"), &mut player);
    controls.dispatch(&InputEvent::key_up("KeyA"), &mut player);
    controls.dispatch(&InputEvent::key_up("KeyZ"), &mut player);

    assert_eq!(
        *log.borrow(),
        vec![("KeyA", Some(true)), ("KeyA", Some(false))]
    );
}

#[test]
fn pointer_moves_before_capture_are_dropped() {
    let mut controls = controls(KeyBindings::new());
    let seen = record_notifications(&mut controls);
    let mut player = local_player();

    for _ in 0..5 {
        controls.dispatch(&InputEvent::pointer_move(30.0, 30.0), &mut player);
    }

    assert!(seen.borrow().is_empty());
    assert_eq!(player.camera().yaw(), 0.0);
    assert_eq!(player.camera().pitch(), 0.0);
}

#[test]
fn captured_pointer_moves_rotate_and_notify() {
    let mut controls = controls(KeyBindings::new());
    let seen = record_notifications(&mut controls);
    let mut player = local_player();

    grant(&mut controls, &mut player);
    controls.dispatch(&InputEvent::pointer_move(10.0, 0.0), &mut player);
    controls.dispatch(&InputEvent::pointer_move(10.0, 0.0), &mut player);

    assert_eq!(
        *seen.borrow(),
        vec![ControlEvent::Lock, ControlEvent::Change, ControlEvent::Change]
    );
    assert!((player.camera().yaw() + 0.04).abs() < 1e-6);
}

#[test]
fn capture_grant_and_release_notify_once_each() {
    let mut controls = controls(KeyBindings::new());
    let seen = record_notifications(&mut controls);
    let mut player = local_player();

    grant(&mut controls, &mut player);
    assert!(controls.is_locked());
    assert_eq!(*seen.borrow(), vec![ControlEvent::Lock]);

    controls.dispatch(&InputEvent::PointerCaptureChange { target: None }, &mut player);
    assert!(!controls.is_locked());
    assert_eq!(*seen.borrow(), vec![ControlEvent::Lock, ControlEvent::Unlock]);
}

#[test]
fn lock_is_not_synchronous() {
    let mut controls = controls(KeyBindings::new());
    let seen = record_notifications(&mut controls);

    controls.lock();
    assert!(!controls.is_locked());
    assert!(seen.borrow().is_empty());
    assert_eq!(controls.host().capture_target(), Some(SURFACE));
}

#[test]
fn connect_then_disconnect_leaves_no_listeners() {
    let log = call_log();
    let mut keys = KeyBindings::new();
    bind_recording_movement(&mut keys, "KeyW", &log);
    bind_recording_action(&mut keys, "KeyQ", &log);

    let mut controls = controls(keys);
    let seen = record_notifications(&mut controls);
    let mut player = local_player();
    controls.disconnect();
    controls.connect();
    controls.disconnect();

    assert_eq!(controls.listeners(), ListenerSet::empty());
    assert_eq!(controls.host().attached(), ListenerSet::empty());

    let events = [
        InputEvent::PointerCaptureChange {
            target: Some(SURFACE),
        },
        InputEvent::pointer_move(5.0, 5.0),
        InputEvent::key_down("KeyW"),
        InputEvent::key_down("KeyQ"),
        InputEvent::key_up("KeyW"),
        InputEvent::PointerCaptureError,
    ];
    for e in &events {
        assert!(!controls.dispatch(e, &mut player));
    }

    assert!(log.borrow().is_empty());
    assert!(seen.borrow().is_empty());
    assert!(!controls.is_locked());

    let (adds, removes) = controls.host().listener_calls();
    assert_eq!(adds, removes);
}

#[test]
fn repeated_cycles_do_not_leak() {
    let mut controls = controls(KeyBindings::new());
    for _ in 0..10 {
        controls.connect();
        controls.detect_key_events(false);
        controls.detect_key_events(true);
        controls.disconnect();
        controls.disconnect();
    }
    assert_eq!(controls.host().attached(), ListenerSet::empty());
    let (adds, removes) = controls.host().listener_calls();
    assert_eq!(adds, removes);
}

#[test]
fn capture_on_other_surface_counts_as_unlock() {
    let mut controls = controls(KeyBindings::new());
    let seen = record_notifications(&mut controls);
    let mut player = local_player();

    grant(&mut controls, &mut player);
    controls.dispatch(
        &InputEvent::PointerCaptureChange {
            target: Some(SurfaceId(99)),
        },
        &mut player,
    );
    assert!(!controls.is_locked());
    assert_eq!(*seen.borrow(), vec![ControlEvent::Lock, ControlEvent::Unlock]);
}

#[test]
fn capture_error_changes_nothing() {
    let mut controls = controls(KeyBindings::new());
    let seen = record_notifications(&mut controls);
    let mut player = local_player();

    grant(&mut controls, &mut player);
    assert!(controls.dispatch(&InputEvent::PointerCaptureError, &mut player));
    assert!(controls.is_locked());
    assert_eq!(*seen.borrow(), vec![ControlEvent::Lock]);
}

#[test]
fn host_drained_events_flow_through_dispatch() {
    let mut controls = controls(KeyBindings::wasd());
    let mut player = local_player();

    controls.host_mut().inject(InputEvent::key_down("KeyS"));
    for e in controls.host_mut().drain_events() {
        controls.dispatch(&e, &mut player);
    }
    assert_eq!(player.state.velocity.z, 25.0);
}

#[test]
fn walk_forward_scenario() {
    let mut keys = KeyBindings::new();
    keys.bind_movement("KeyW", |s: &mut KinematicState, down| {
        s.velocity.z = if down { -25.0 } else { 0.0 };
    });
    let mut controls = controls(keys);
    let mut player = local_player();
    assert_eq!(player.state.speed, 25.0);
    assert_eq!(player.state.jump_height, 60.0);
    assert_eq!(player.state.gravity, 200.0);

    controls.dispatch(&InputEvent::key_down("KeyW"), &mut player);
    assert_eq!(player.state.velocity.z, -25.0);

    controls.dispatch(&InputEvent::key_up("KeyW"), &mut player);
    assert_eq!(player.state.velocity.z, 0.0);
}
