//! Shared helpers for the integration tests in `tests/`.

use std::{cell::RefCell, rc::Rc};

use world_client::{
    controls::{HeadlessHost, PointerControls, SurfaceId},
    input::{ControlEvent, KeyBindings},
    player::LocalPlayer,
};
use world_shared::{config::ClientConfig, net::UserData};

/// Installs a test-writer subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

pub const SURFACE: SurfaceId = SurfaceId(1);

/// A local player built from the default config.
pub fn local_player() -> LocalPlayer {
    LocalPlayer::new(UserData::new("local", "Local"), &ClientConfig::default())
}

/// Controls on [`SURFACE`] backed by a headless host.
pub fn controls(bindings: KeyBindings) -> PointerControls<HeadlessHost> {
    PointerControls::new(SURFACE, HeadlessHost::new(), bindings)
}

/// Subscribes to control notifications and records them in order.
pub fn record_notifications(
    controls: &mut PointerControls<HeadlessHost>,
) -> Rc<RefCell<Vec<ControlEvent>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    controls.subscribe(move |e| sink.borrow_mut().push(*e));
    seen
}

/// Shared log of handler invocations, e.g. `("KeyW", Some(true))`.
pub type CallLog = Rc<RefCell<Vec<(&'static str, Option<bool>)>>>;

pub fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Binds `code` as a movement key that records each call.
pub fn bind_recording_movement(keys: &mut KeyBindings, code: &'static str, log: &CallLog) {
    let log = log.clone();
    keys.bind_movement(code, move |_, down| log.borrow_mut().push((code, Some(down))));
}

/// Binds `code` as a UI key that records each call.
pub fn bind_recording_action(keys: &mut KeyBindings, code: &'static str, log: &CallLog) {
    let log = log.clone();
    keys.bind_action(code, move || log.borrow_mut().push((code, None)));
}
