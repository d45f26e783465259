//! Serialisation helpers.
//!
//! Thin wrappers around `serde_json` and `rmp-serde` for exporting views and
//! plain objects. MessagePack output uses named maps so field names survive
//! the round trip.

use serde::{Deserialize, Serialize};

use crate::error::MapperError;

/// Encode a value as a JSON string.
///
/// # Errors
///
/// Returns [`MapperError::Json`] if serialisation fails.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, MapperError> {
    serde_json::to_string(value).map_err(MapperError::Json)
}

/// Decode a value from a JSON string.
///
/// # Errors
///
/// Returns [`MapperError::Json`] if deserialisation fails.
pub fn from_json<'a, T: Deserialize<'a>>(json: &'a str) -> Result<T, MapperError> {
    serde_json::from_str(json).map_err(MapperError::Json)
}

/// Encode a value to MessagePack bytes.
///
/// # Errors
///
/// Returns [`MapperError::Encode`] if serialisation fails.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, MapperError> {
    rmp_serde::to_vec_named(value).map_err(MapperError::Encode)
}

/// Decode a value from MessagePack bytes.
///
/// # Errors
///
/// Returns [`MapperError::Decode`] if deserialisation fails.
pub fn decode<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T, MapperError> {
    rmp_serde::from_slice(bytes).map_err(MapperError::Decode)
}
