//! Pointer-capture controls.
//!
//! `PointerControls` owns all handler state and decides what each device event
//! does. The host only stores which listener kinds are attached and carries
//! out capture requests; it delivers events back through
//! [`PointerControls::dispatch`].
//!
//! Capture requests are fire-and-forget. The outcome is only observable via a
//! later `PointerCaptureChange` or `PointerCaptureError` event, which the host
//! may never send.

use std::collections::VecDeque;

use tracing::{debug, error, trace};
use world_shared::event::{Notifier, ObserverId};

use crate::{
    input::{ControlEvent, InputEvent, KeyBindings, KeyHandler, ListenerSet},
    player::LocalPlayer,
};

/// Identifies a rendering surface that can hold exclusive pointer capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u32);

/// The environment that owns device listeners and pointer capture.
pub trait PointerHost {
    fn add_listeners(&mut self, kinds: ListenerSet);
    fn remove_listeners(&mut self, kinds: ListenerSet);
    fn request_pointer_capture(&mut self, surface: SurfaceId);
    fn exit_pointer_capture(&mut self);

    /// Events the host has produced since the last call.
    fn drain_events(&mut self) -> Vec<InputEvent> {
        Vec::new()
    }
}

/// In-memory host for headless sessions and tests.
///
/// Capture requests resolve asynchronously: the resulting change or error
/// event is queued and only delivered on the next [`PointerHost::drain_events`].
#[derive(Debug, Default)]
pub struct HeadlessHost {
    attached: ListenerSet,
    capture: Option<SurfaceId>,
    deny_capture: bool,
    pending: VecDeque<InputEvent>,
    add_calls: usize,
    remove_calls: usize,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host that refuses every capture request.
    pub fn denying() -> Self {
        Self {
            deny_capture: true,
            ..Self::default()
        }
    }

    /// Queues a device event as if the user produced it.
    pub fn inject(&mut self, event: InputEvent) {
        self.pending.push_back(event);
    }

    pub fn attached(&self) -> ListenerSet {
        self.attached
    }

    pub fn capture_target(&self) -> Option<SurfaceId> {
        self.capture
    }

    /// Number of `add_listeners`/`remove_listeners` calls received.
    pub fn listener_calls(&self) -> (usize, usize) {
        (self.add_calls, self.remove_calls)
    }
}

impl PointerHost for HeadlessHost {
    fn add_listeners(&mut self, kinds: ListenerSet) {
        self.add_calls += 1;
        self.attached |= kinds;
    }

    fn remove_listeners(&mut self, kinds: ListenerSet) {
        self.remove_calls += 1;
        self.attached -= kinds;
    }

    fn request_pointer_capture(&mut self, surface: SurfaceId) {
        if self.deny_capture {
            self.pending.push_back(InputEvent::PointerCaptureError);
            return;
        }
        self.capture = Some(surface);
        self.pending
            .push_back(InputEvent::PointerCaptureChange { target: self.capture });
    }

    fn exit_pointer_capture(&mut self) {
        if self.capture.take().is_some() {
            self.pending
                .push_back(InputEvent::PointerCaptureChange { target: None });
        }
    }

    fn drain_events(&mut self) -> Vec<InputEvent> {
        self.pending.drain(..).collect()
    }
}

const POINTER_LISTENERS: ListenerSet = ListenerSet::POINTER_MOVE
    .union(ListenerSet::CAPTURE_CHANGE)
    .union(ListenerSet::CAPTURE_ERROR);

/// First-person pointer controls bound to one surface.
pub struct PointerControls<H: PointerHost> {
    surface: SurfaceId,
    host: H,
    bindings: KeyBindings,
    attached: ListenerSet,
    is_locked: bool,
    notifier: Notifier<ControlEvent>,
}

impl<H: PointerHost> PointerControls<H> {
    /// Creates the controls and connects every listener.
    pub fn new(surface: SurfaceId, host: H, bindings: KeyBindings) -> Self {
        let mut controls = Self {
            surface,
            host,
            bindings,
            attached: ListenerSet::empty(),
            is_locked: false,
            notifier: Notifier::default(),
        };
        controls.connect();
        controls
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    /// Listener kinds currently attached to the host.
    pub fn listeners(&self) -> ListenerSet {
        self.attached
    }

    pub fn bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.bindings
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&ControlEvent) + 'static) -> ObserverId {
        self.notifier.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Attaches every listener. Calling it again attaches nothing new.
    pub fn connect(&mut self) {
        self.attach(POINTER_LISTENERS);
        self.detect_key_events(true);
    }

    /// Removes every listener `connect` attached.
    pub fn disconnect(&mut self) {
        self.detach(POINTER_LISTENERS);
        self.detect_key_events(false);
    }

    /// Toggles keyboard listening without touching pointer listeners.
    pub fn detect_key_events(&mut self, enabled: bool) {
        if enabled {
            self.attach(ListenerSet::KEYS);
        } else {
            self.detach(ListenerSet::KEYS);
        }
    }

    fn attach(&mut self, kinds: ListenerSet) {
        let missing = kinds - self.attached;
        if missing.is_empty() {
            return;
        }
        self.host.add_listeners(missing);
        self.attached |= missing;
    }

    fn detach(&mut self, kinds: ListenerSet) {
        let present = kinds & self.attached;
        if present.is_empty() {
            return;
        }
        self.host.remove_listeners(present);
        self.attached -= present;
    }

    /// Requests exclusive pointer capture for this surface.
    pub fn lock(&mut self) {
        self.host.request_pointer_capture(self.surface);
    }

    /// Requests release of pointer capture.
    pub fn unlock(&mut self) {
        self.host.exit_pointer_capture();
    }

    /// Handles one host event. Returns false when the event was dropped
    /// because its listener is not attached.
    pub fn dispatch(&mut self, event: &InputEvent, player: &mut LocalPlayer) -> bool {
        if !self.attached.contains(event.listener()) {
            trace!(?event, "No listener attached; event dropped");
            return false;
        }

        match event {
            InputEvent::PointerMove {
                movement_x,
                movement_y,
            } => {
                let dx = movement_x.unwrap_or(0.0);
                let dy = movement_y.unwrap_or(0.0);
                self.on_pointer_move(dx, dy, player);
            }
            InputEvent::KeyDown(code) => match self.bindings.get_mut(code) {
                Some(KeyHandler::Movement(handler)) => handler(&mut player.state, true),
                Some(KeyHandler::Action(handler)) => handler(),
                None => {}
            },
            InputEvent::KeyUp(code) => {
                if let Some(KeyHandler::Movement(handler)) = self.bindings.get_mut(code) {
                    handler(&mut player.state, false);
                }
            }
            InputEvent::PointerCaptureChange { target } => self.on_capture_change(*target),
            InputEvent::PointerCaptureError => {
                error!(surface = ?self.surface, "Unable to use exclusive pointer capture");
            }
        }
        true
    }

    fn on_pointer_move(&mut self, dx: f32, dy: f32, player: &mut LocalPlayer) {
        if !self.is_locked {
            trace!("Pointer not captured; move ignored");
            return;
        }
        player.look(dx, dy);
        self.notifier.emit(&ControlEvent::Change);
    }

    fn on_capture_change(&mut self, target: Option<SurfaceId>) {
        if target == Some(self.surface) {
            self.is_locked = true;
            debug!(surface = ?self.surface, "Pointer captured");
            self.notifier.emit(&ControlEvent::Lock);
        } else {
            self.is_locked = false;
            debug!(surface = ?self.surface, "Pointer released");
            self.notifier.emit(&ControlEvent::Unlock);
        }
    }
}
