//! Networking payloads.
//!
//! The peer transport is external. This module only defines the identities of
//! participants and the fixed-width movement payload they exchange.
//!
//! Movement wire format: three little-endian `f32`s `(x, y, z)`, 12 bytes.

use std::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use crate::{codec::CodecError, math::Vec3};

/// Exact size of a movement payload.
pub const MOVEMENT_PAYLOAD_LEN: usize = 12;

/// Identifies a participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId(s.to_string())
    }
}

/// Public identity of a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub user_id: UserId,
    pub name: String,
}

impl UserData {
    pub fn new(user_id: impl Into<UserId>, name: &str) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.to_string(),
        }
    }
}

/// Encodes a position as a movement payload.
pub fn encode_movement(pos: Vec3) -> Bytes {
    let mut buf = BytesMut::with_capacity(MOVEMENT_PAYLOAD_LEN);
    buf.put_f32_le(pos.x);
    buf.put_f32_le(pos.y);
    buf.put_f32_le(pos.z);
    buf.freeze()
}

/// Decodes a movement payload. Any length other than 12 is rejected.
pub fn decode_movement(mut payload: &[u8]) -> Result<Vec3, CodecError> {
    if payload.len() != MOVEMENT_PAYLOAD_LEN {
        return Err(CodecError::MalformedPayload {
            expected: MOVEMENT_PAYLOAD_LEN,
            actual: payload.len(),
        });
    }
    let x = payload.get_f32_le();
    let y = payload.get_f32_le();
    let z = payload.get_f32_le();
    Ok(Vec3::new(x, y, z))
}
