//! Physics collaborator contract.
//!
//! Gravity integration and collision resolution live outside this crate.
//! What matters here is the state they read and write, and that each is
//! invoked once per simulation tick.

use serde::{Deserialize, Serialize};

use crate::{config::MovementConfig, math::Vec3};

/// Kinematic record of the locally controlled entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub on_ground: bool,
    pub speed: f32,
    pub jump_height: f32,
    pub gravity: f32,
    /// Per-frame gravity accumulator, owned by the gravity collaborator.
    pub grav_accel: f32,
}

impl KinematicState {
    pub fn new(movement: &MovementConfig) -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            on_ground: false,
            speed: movement.speed,
            jump_height: movement.jump_height,
            gravity: movement.gravity,
            grav_accel: 0.0,
        }
    }
}

impl Default for KinematicState {
    fn default() -> Self {
        Self::new(&MovementConfig::default())
    }
}

/// Static collision box used by the collider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionRange {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl CollisionRange {
    pub const fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }
}

impl Default for CollisionRange {
    fn default() -> Self {
        Self::new(4.0, 14.0, 4.0)
    }
}

/// Gravity integrator. Writes `velocity`, `grav_accel` and `on_ground`.
pub trait Gravity {
    fn apply(&mut self, state: &mut KinematicState, dt_sec: f32);
}

/// Collision resolver. Writes `position` and `on_ground`.
pub trait Collider {
    fn resolve(&mut self, state: &mut KinematicState, extent: &CollisionRange, dt_sec: f32);
}

/// No-op gravity.
#[derive(Debug, Default)]
pub struct NullGravity;

impl Gravity for NullGravity {
    fn apply(&mut self, _state: &mut KinematicState, _dt_sec: f32) {}
}

/// No-op collider.
#[derive(Debug, Default)]
pub struct NullCollider;

impl Collider for NullCollider {
    fn resolve(&mut self, _state: &mut KinematicState, _extent: &CollisionRange, _dt_sec: f32) {}
}
