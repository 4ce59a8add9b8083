//! Error types for the urlfilter crate.

use thiserror::Error;

/// Errors produced while building record metadata or decoding values.
#[derive(Debug, Error)]
pub enum Error {
    /// A field carries both the `required` and the `nowhere` tag options.
    #[error("urlfilter: {record}.{field}: required and nowhere tags can't be set together")]
    RequiredNoWhere { record: &'static str, field: String },

    /// A raw value could not be converted into the field's type.
    #[error("urlfilter: can't decode {key:?}: {source}")]
    Scan {
        key: String,
        #[source]
        source: ScanError,
    },

    /// Failure reported by a custom decoder.
    #[error("urlfilter: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an error for use in [`DecodeValues`](crate::DecodeValues) implementations.
    pub fn custom(msg: impl std::fmt::Display) -> Self {
        Error::Custom(msg.to_string())
    }
}

/// Errors produced by scan functions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// The raw string is not a valid value of the target type.
    #[error("invalid {ty} value {value:?}: {reason}")]
    Invalid {
        ty: &'static str,
        value: String,
        reason: String,
    },

    /// The scan function was handed a slot of another type.
    #[error("scan target is not a {expected}")]
    TypeMismatch { expected: &'static str },
}

/// Result type for urlfilter operations.
pub type Result<T> = std::result::Result<T, Error>;
