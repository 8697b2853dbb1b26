//! World state codec.
//!
//! The world record is serialized to its canonical JSON text, then every
//! character code is shifted by [`OBFUSCATION_SHIFT`] into one byte.
//!
//! This is an obfuscation transform, not encryption. It offers no
//! confidentiality and no integrity check; a tampered payload decodes to
//! whatever text the bytes spell.
//!
//! # Constraint
//! One byte per character. Only text whose code points are `0..=127` survives
//! the round trip. Higher code points are truncated modulo 256 on encode and
//! decode to unrelated characters, which usually surfaces as
//! [`CodecError::Json`].
//!
//! JSON has no NaN or infinities, so [`encode_world`] refuses records with a
//! non-finite `intensity` or spawn component instead of writing `null`.

use std::fmt;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::world::WorldData;

/// Additive shift applied to every character code.
pub const OBFUSCATION_SHIFT: u8 = 128;

/// Codec failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A fixed-width payload had the wrong length.
    MalformedPayload { expected: usize, actual: usize },
    /// A number has no JSON representation.
    NonFinite { field: &'static str },
    /// The canonical text could not be produced or parsed.
    Json(String),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::MalformedPayload { expected, actual } => {
                write!(f, "malformed payload: expected {expected} bytes, got {actual}")
            }
            CodecError::NonFinite { field } => write!(f, "non-finite number in {field}"),
            CodecError::Json(e) => write!(f, "invalid world text: {e}"),
        }
    }
}

impl std::error::Error for CodecError {}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        CodecError::Json(e.to_string())
    }
}

/// Shifts each character code into a byte.
pub fn obfuscate(text: &str) -> Bytes {
    text.chars()
        .map(|c| (c as u32).wrapping_add(u32::from(OBFUSCATION_SHIFT)) as u8)
        .collect::<Vec<u8>>()
        .into()
}

/// Inverse of [`obfuscate`] for one-byte text.
pub fn deobfuscate(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| char::from(b.wrapping_sub(OBFUSCATION_SHIFT)))
        .collect()
}

/// Encodes a world record for transfer to a peer.
pub fn encode_world(data: &WorldData) -> Result<Bytes, CodecError> {
    check_finite(data)?;
    let text = serde_json::to_string(data)?;
    if !text.is_ascii() {
        warn!("World text contains characters outside one-byte range; peers will not decode it");
    }
    let out = obfuscate(&text);
    debug!(bytes = out.len(), "Encoded world data");
    Ok(out)
}

fn check_finite(data: &WorldData) -> Result<(), CodecError> {
    if !data.intensity.is_finite() {
        return Err(CodecError::NonFinite { field: "intensity" });
    }
    if data.spawn_point.iter().flatten().any(|v| !v.is_finite()) {
        return Err(CodecError::NonFinite { field: "spawnPoint" });
    }
    Ok(())
}

/// Decodes a world record received from a peer.
pub fn decode_world(bytes: &[u8]) -> Result<WorldData, CodecError> {
    let text = deobfuscate(bytes);
    let data = serde_json::from_str(&text)?;
    debug!(bytes = bytes.len(), "Decoded world data");
    Ok(data)
}
