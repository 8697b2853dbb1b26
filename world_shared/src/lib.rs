//! `world_shared`
//!
//! Libraries shared by every participant in a world session.
//!
//! Design goals:
//! - Pure, deterministic transforms for anything that crosses the wire.
//! - Traits at the seams owned by external collaborators (physics, camera).
//! - No `unsafe`.

pub mod codec;
pub mod config;
pub mod event;
pub mod math;
pub mod net;
pub mod physics;
pub mod render;
pub mod world;

pub mod prelude {
    //! Commonly used exports.

    pub use crate::codec::*;
    pub use crate::config::*;
    pub use crate::event::*;
    pub use crate::math::*;
    pub use crate::net::*;
    pub use crate::world::*;
}
