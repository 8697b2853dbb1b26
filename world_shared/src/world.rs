//! World configuration record.
//!
//! Shared between participants through [`crate::codec`]. Field names use the
//! camelCase keys every peer expects in the canonical text. Peers agree on the
//! parsed record, not on exact bytes: `1.0` here may be `1` elsewhere.

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// Number of skybox faces, ordered +x, -x, +y, -y, +z, -z.
pub const SKYBOX_FACES: usize = 6;

const DEFAULT_SKYBOX: [&str; SKYBOX_FACES] = [
    "../assets/skybox/px.png",
    "../assets/skybox/nx.png",
    "../assets/skybox/py.png",
    "../assets/skybox/ny.png",
    "../assets/skybox/pz.png",
    "../assets/skybox/nz.png",
];

/// Slot 0 is empty space; the rest are block colors.
const DEFAULT_PALETTE: [&str; 65] = [
    "", "#060608", "#141013", "#3b1725", "#73172d", "#b4202a", "#df3e23", "#fa6a0a", "#f9a31b",
    "#ffd541", "#fffc40", "#d6f264", "#9cdb43", "#59c135", "#14a02e", "#1a7a3e", "#24523b",
    "#122020", "#143464", "#285cc4", "#249fde", "#20d6c7", "#a6fcdb", "#ffffff", "#fef3c0",
    "#fad6b8", "#f5a097", "#e86a73", "#bc4a9b", "#793a80", "#403353", "#242234", "#221c1a",
    "#322b28", "#71413b", "#bb7547", "#dba463", "#f4d29c", "#dae0ea", "#b3b9d1", "#8b93af",
    "#6d758d", "#4a5462", "#333941", "#422433", "#5b3138", "#8e5252", "#ba756a", "#e9b5a3",
    "#e3e6ff", "#b9bffb", "#849be4", "#588dbe", "#477d85", "#23674e", "#328464", "#5daf8d",
    "#92dcba", "#cdf7e2", "#e4d2aa", "#c7b08b", "#a08662", "#796755", "#5a4e44", "#423934",
];

/// World configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldData {
    /// Skybox image paths, one per face.
    pub skybox: Vec<String>,
    /// Ambient light intensity.
    pub intensity: f64,
    /// Block colors; slot 0 is empty space.
    pub palette_colors: Vec<String>,
    /// Components stay `None` until a spawn point is assigned.
    pub spawn_point: [Option<f64>; 3],
}

impl Default for WorldData {
    fn default() -> Self {
        Self {
            skybox: DEFAULT_SKYBOX.iter().map(|s| s.to_string()).collect(),
            intensity: 1.0,
            palette_colors: DEFAULT_PALETTE.iter().map(|s| s.to_string()).collect(),
            spawn_point: [None; 3],
        }
    }
}

impl WorldData {
    pub fn set_spawn_point(&mut self, p: Vec3) {
        self.spawn_point = [Some(p.x.into()), Some(p.y.into()), Some(p.z.into())];
    }

    /// Returns the spawn point once every component is defined.
    pub fn spawn_point(&self) -> Option<Vec3> {
        match self.spawn_point {
            [Some(x), Some(y), Some(z)] => Some(Vec3::new(x as f32, y as f32, z as f32)),
            _ => None,
        }
    }
}
