//! Mapper error types.

/// Errors raised while building a mapper or writing through a view.
///
/// Reads never fail: a missing field or an offset past the end of the row
/// yields `None` instead.
#[derive(Debug, thiserror::Error)]
pub enum MapperError {
    /// No usable field list could be resolved from the configuration.
    #[error("a field list or configuration object with `headers` is required ({0})")]
    Configuration(String),

    /// A field name in the configuration is not a string or scalar.
    #[error("field name at position {position} must be a string, number or boolean, got {found}")]
    InvalidFieldName {
        position: usize,
        found: &'static str,
    },

    /// A write targeted a reserved pseudo-field that is not shadowed by a
    /// real field.
    #[error("cannot assign to read-only field '{field}'")]
    ReadOnlyField { field: String },

    /// A write targeted a name with no accessor.
    #[error("no field named '{0}'")]
    UnknownField(String),

    /// A write targeted an offset outside the mapper's field list.
    #[error("no field at offset {0}")]
    UnknownOffset(usize),

    /// A write landed past the end of a fixed-length backing sequence.
    #[error("offset {offset} is out of bounds for a fixed sequence of length {len}")]
    OutOfBounds { offset: usize, len: usize },

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to encode to MessagePack.
    #[error("failed to encode MessagePack: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// Failed to decode from MessagePack.
    #[error("failed to decode MessagePack: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

impl From<std::convert::Infallible> for MapperError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}
