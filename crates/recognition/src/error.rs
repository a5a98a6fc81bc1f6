//! Error types for the recognition crate.

use thiserror::Error;

/// Validation failures for the `limit` request parameter.
///
/// The `Display` output of each variant is the exact message returned to
/// HTTP clients, so the wording here is part of the wire contract.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitError {
    /// The raw value could not be parsed as an integer at all.
    #[error("Limit format is invalid")]
    InvalidFormat,

    /// The value parsed as an integer but is out of range (negative).
    #[error("Limit value is invalid")]
    InvalidValue,
}

/// Errors that can occur while decoding an uploaded image.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The upload bytes could not be interpreted as an image.
    #[error("Failed to decode image {filename:?}: {reason}")]
    Unreadable { filename: String, reason: String },
}
