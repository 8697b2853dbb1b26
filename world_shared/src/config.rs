//! Configuration system.
//!
//! Loads client configuration from JSON strings (file IO left to app).
//! Every field has a default, so an empty object is a valid config.

use serde::{Deserialize, Serialize};

use crate::physics::CollisionRange;

/// Root configuration for a client session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Local player movement parameters.
    #[serde(default)]
    pub movement: MovementConfig,
    /// Local player collision box.
    #[serde(default)]
    pub collision: CollisionRange,
    /// Remote avatar interpolation.
    #[serde(default)]
    pub interp: InterpConfig,
    /// Radians of camera rotation per pointer delta unit.
    #[serde(default = "default_look_sensitivity")]
    pub look_sensitivity: f32,
    /// Frame rate of the session driver.
    #[serde(default = "default_frame_hz")]
    pub frame_hz: u32,
    /// Local player display name.
    #[serde(default = "default_player_name")]
    pub player_name: String,
}

fn default_look_sensitivity() -> f32 {
    0.002
}

fn default_frame_hz() -> u32 {
    60
}

fn default_player_name() -> String {
    "Player".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            movement: MovementConfig::default(),
            collision: CollisionRange::default(),
            interp: InterpConfig::default(),
            look_sensitivity: default_look_sensitivity(),
            frame_hz: default_frame_hz(),
            player_name: default_player_name(),
        }
    }
}

impl ClientConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

/// Local player movement parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub speed: f32,
    pub jump_height: f32,
    pub gravity: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: 25.0,
            jump_height: 60.0,
            gravity: 200.0,
        }
    }
}

/// Where a remote avatar restarts interpolation when a new snapshot arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebasePolicy {
    /// Start from the previous target, even if it was never reached.
    #[default]
    LastTarget,
    /// Start from the currently rendered position.
    RenderedPosition,
}

/// Remote avatar interpolation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpConfig {
    /// Alpha gained per unit of elapsed time. 10 converges in 0.1 time units.
    pub rate: f32,
    pub rebase: RebasePolicy,
}

impl Default for InterpConfig {
    fn default() -> Self {
        Self {
            rate: 10.0,
            rebase: RebasePolicy::LastTarget,
        }
    }
}
