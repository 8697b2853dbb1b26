//! `world_client`
//!
//! Client-side systems:
//! - Input capture and key binding dispatch
//! - Exclusive pointer capture lifecycle
//! - Local player kinematic state
//! - Interpolation for remote avatars
//! - Per-frame session driver

pub mod client;
pub mod controls;
pub mod input;
pub mod interp;
pub mod player;

pub use client::Session;
