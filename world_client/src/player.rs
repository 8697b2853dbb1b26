//! Local player.
//!
//! Owns the kinematic state of the controlled entity. The player itself has
//! no movement logic: key handlers write velocity, and the gravity and
//! collider collaborators write position and ground contact once per tick.

use world_shared::{
    config::ClientConfig,
    math::Vec3,
    net::UserData,
    physics::{Collider, CollisionRange, Gravity, KinematicState, NullCollider, NullGravity},
    render::{CameraRig, LookCamera},
};

/// The locally controlled entity.
pub struct LocalPlayer {
    pub data: UserData,
    pub state: KinematicState,
    collision: CollisionRange,
    camera: Box<dyn CameraRig>,
    gravity: Box<dyn Gravity>,
    collider: Box<dyn Collider>,
}

impl LocalPlayer {
    pub fn new(data: UserData, cfg: &ClientConfig) -> Self {
        Self {
            data,
            state: KinematicState::new(&cfg.movement),
            collision: cfg.collision,
            camera: Box::new(LookCamera::new(cfg.look_sensitivity)),
            gravity: Box::new(NullGravity),
            collider: Box::new(NullCollider),
        }
    }

    pub fn with_gravity(mut self, gravity: impl Gravity + 'static) -> Self {
        self.gravity = Box::new(gravity);
        self
    }

    pub fn with_collider(mut self, collider: impl Collider + 'static) -> Self {
        self.collider = Box::new(collider);
        self
    }

    pub fn with_camera(mut self, camera: impl CameraRig + 'static) -> Self {
        self.camera = Box::new(camera);
        self
    }

    pub fn collision(&self) -> CollisionRange {
        self.collision
    }

    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    pub fn camera(&self) -> &dyn CameraRig {
        self.camera.as_ref()
    }

    /// Forwards a captured pointer delta to the camera rig.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.camera.rotate(dx, dy);
    }

    /// One simulation tick: gravity first, then collision.
    pub fn step(&mut self, dt_sec: f32) {
        self.gravity.apply(&mut self.state, dt_sec);
        self.collider.resolve(&mut self.state, &self.collision, dt_sec);
    }
}
