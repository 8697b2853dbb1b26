//! Input handling.
//!
//! Device events arrive from the host as [`InputEvent`]s. Key codes are bound
//! to [`KeyHandler`]s in a single [`KeyBindings`] registry, so one code can
//! never be both a movement key and a UI key.

use std::collections::HashMap;
use std::fmt;

use world_shared::physics::KinematicState;

use crate::controls::SurfaceId;

/// Physical key identifier, e.g. `"KeyW"` or `"Space"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCode(pub String);

impl KeyCode {
    pub fn new(code: &str) -> Self {
        KeyCode(code.to_string())
    }
}

impl From<&str> for KeyCode {
    fn from(s: &str) -> Self {
        KeyCode::new(s)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Movement handler: receives the state it mutates and whether the key is down.
pub type MovementFn = Box<dyn FnMut(&mut KinematicState, bool)>;
/// UI handler: fires once per press.
pub type ActionFn = Box<dyn FnMut()>;

/// What a bound key does.
pub enum KeyHandler {
    /// Invoked with `true` on press and `false` on release.
    Movement(MovementFn),
    /// Invoked on press only.
    Action(ActionFn),
}

impl fmt::Debug for KeyHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyHandler::Movement(_) => f.write_str("Movement(..)"),
            KeyHandler::Action(_) => f.write_str("Action(..)"),
        }
    }
}

/// Key binding registry.
#[derive(Debug, Default)]
pub struct KeyBindings {
    handlers: HashMap<KeyCode, KeyHandler>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a movement handler, returning whatever was bound to `code` before.
    pub fn bind_movement(
        &mut self,
        code: impl Into<KeyCode>,
        handler: impl FnMut(&mut KinematicState, bool) + 'static,
    ) -> Option<KeyHandler> {
        self.handlers
            .insert(code.into(), KeyHandler::Movement(Box::new(handler)))
    }

    /// Binds a UI action, returning whatever was bound to `code` before.
    pub fn bind_action(
        &mut self,
        code: impl Into<KeyCode>,
        handler: impl FnMut() + 'static,
    ) -> Option<KeyHandler> {
        self.handlers
            .insert(code.into(), KeyHandler::Action(Box::new(handler)))
    }

    pub fn unbind(&mut self, code: &KeyCode) -> Option<KeyHandler> {
        self.handlers.remove(code)
    }

    pub fn contains(&self, code: &KeyCode) -> bool {
        self.handlers.contains_key(code)
    }

    pub fn is_movement(&self, code: &KeyCode) -> bool {
        matches!(self.handlers.get(code), Some(KeyHandler::Movement(_)))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub(crate) fn get_mut(&mut self, code: &KeyCode) -> Option<&mut KeyHandler> {
        self.handlers.get_mut(code)
    }

    /// WASD walking plus Space to jump.
    ///
    /// Forward is -z. Releasing a key zeroes its axis.
    pub fn wasd() -> Self {
        let mut keys = Self::new();
        keys.bind_movement("KeyW", |s: &mut KinematicState, down| {
            s.velocity.z = if down { -s.speed } else { 0.0 };
        });
        keys.bind_movement("KeyS", |s: &mut KinematicState, down| {
            s.velocity.z = if down { s.speed } else { 0.0 };
        });
        keys.bind_movement("KeyA", |s: &mut KinematicState, down| {
            s.velocity.x = if down { -s.speed } else { 0.0 };
        });
        keys.bind_movement("KeyD", |s: &mut KinematicState, down| {
            s.velocity.x = if down { s.speed } else { 0.0 };
        });
        keys.bind_movement("Space", |s: &mut KinematicState, down| {
            if down && s.on_ground {
                s.velocity.y = s.jump_height;
                s.on_ground = false;
            }
        });
        keys
    }
}

/// Raw device and capture events delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Relative pointer motion. Missing components count as 0.
    PointerMove {
        movement_x: Option<f32>,
        movement_y: Option<f32>,
    },
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    /// Capture target changed. `None` means no surface holds capture.
    PointerCaptureChange { target: Option<SurfaceId> },
    PointerCaptureError,
}

impl InputEvent {
    pub fn key_down(code: &str) -> Self {
        InputEvent::KeyDown(KeyCode::new(code))
    }

    pub fn key_up(code: &str) -> Self {
        InputEvent::KeyUp(KeyCode::new(code))
    }

    pub fn pointer_move(dx: f32, dy: f32) -> Self {
        InputEvent::PointerMove {
            movement_x: Some(dx),
            movement_y: Some(dy),
        }
    }

    /// The listener that must be attached for this event to be delivered.
    pub fn listener(&self) -> ListenerSet {
        match self {
            InputEvent::PointerMove { .. } => ListenerSet::POINTER_MOVE,
            InputEvent::KeyDown(_) => ListenerSet::KEY_DOWN,
            InputEvent::KeyUp(_) => ListenerSet::KEY_UP,
            InputEvent::PointerCaptureChange { .. } => ListenerSet::CAPTURE_CHANGE,
            InputEvent::PointerCaptureError => ListenerSet::CAPTURE_ERROR,
        }
    }
}

bitflags::bitflags! {
    /// Device listeners a control surface can hold.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ListenerSet: u8 {
        const POINTER_MOVE = 1 << 0;
        const KEY_DOWN = 1 << 1;
        const KEY_UP = 1 << 2;
        const CAPTURE_CHANGE = 1 << 3;
        const CAPTURE_ERROR = 1 << 4;

        const KEYS = Self::KEY_DOWN.bits() | Self::KEY_UP.bits();
        const ALL = Self::POINTER_MOVE.bits()
            | Self::KEYS.bits()
            | Self::CAPTURE_CHANGE.bits()
            | Self::CAPTURE_ERROR.bits();
    }
}

/// Notifications emitted by the control surface. No payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlEvent {
    /// An accepted pointer move rotated the camera.
    Change,
    Lock,
    Unlock,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebinding_replaces_handler_kind() {
        let mut keys = KeyBindings::new();
        assert!(keys.bind_movement("KeyE", |_, _| {}).is_none());
        assert!(keys.is_movement(&KeyCode::new("KeyE")));

        let prev = keys.bind_action("KeyE", || {});
        assert!(matches!(prev, Some(KeyHandler::Movement(_))));
        assert!(!keys.is_movement(&KeyCode::new("KeyE")));
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn wasd_sets_and_clears_axes() {
        let mut keys = KeyBindings::wasd();
        let mut state = KinematicState::default();

        if let Some(KeyHandler::Movement(f)) = keys.get_mut(&KeyCode::new("KeyD")) {
            f(&mut state, true);
            assert_eq!(state.velocity.x, 25.0);
            f(&mut state, false);
            assert_eq!(state.velocity.x, 0.0);
        } else {
            panic!("KeyD should be a movement key");
        }
    }

    #[test]
    fn jump_requires_ground_contact() {
        let mut keys = KeyBindings::wasd();
        let mut state = KinematicState::default();
        let Some(KeyHandler::Movement(jump)) = keys.get_mut(&KeyCode::new("Space")) else {
            panic!("Space should be a movement key");
        };

        jump(&mut state, true);
        assert_eq!(state.velocity.y, 0.0);

        state.on_ground = true;
        jump(&mut state, true);
        assert_eq!(state.velocity.y, 60.0);
        assert!(!state.on_ground);
    }

    #[test]
    fn listener_sets_cover_every_event() {
        let all = [
            InputEvent::pointer_move(1.0, 1.0),
            InputEvent::key_down("KeyW"),
            InputEvent::key_up("KeyW"),
            InputEvent::PointerCaptureChange { target: None },
            InputEvent::PointerCaptureError,
        ];
        let union = all
            .iter()
            .fold(ListenerSet::empty(), |acc, e| acc | e.listener());
        assert_eq!(union, ListenerSet::ALL);
    }
}
