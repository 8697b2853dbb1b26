//! Camera abstraction.
//!
//! This crate intentionally does not depend on a scene graph. Pointer deltas
//! are forwarded to a `CameraRig`, which a renderer implementation supplies.

use std::f32::consts::FRAC_PI_2;

/// Receives relative pointer motion while the pointer is captured.
pub trait CameraRig {
    fn rotate(&mut self, dx: f32, dy: f32);
    fn yaw(&self) -> f32;
    fn pitch(&self) -> f32;
}

/// A camera that ignores input, useful for headless tests.
#[derive(Debug, Default)]
pub struct NullCamera;

impl CameraRig for NullCamera {
    fn rotate(&mut self, _dx: f32, _dy: f32) {}

    fn yaw(&self) -> f32 {
        0.0
    }

    fn pitch(&self) -> f32 {
        0.0
    }
}

/// First-person yaw/pitch rig. Pitch is clamped so the view never flips.
#[derive(Debug, Clone, Copy)]
pub struct LookCamera {
    yaw: f32,
    pitch: f32,
    sensitivity: f32,
}

impl LookCamera {
    pub fn new(sensitivity: f32) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            sensitivity,
        }
    }
}

impl CameraRig for LookCamera {
    fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * self.sensitivity;
        self.pitch = (self.pitch - dy * self.sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    fn yaw(&self) -> f32 {
        self.yaw
    }

    fn pitch(&self) -> f32 {
        self.pitch
    }
}
