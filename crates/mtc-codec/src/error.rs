//! Error types for mtc-codec

use thiserror::Error;

/// Errors raised while decoding a byte stream.
///
/// Every variant carries the offset at which decoding failed so callers can
/// point at the offending bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    /// Input ended before the value was complete
    #[error("unexpected end of input at offset {offset}: {context} needs {needed} more byte(s)")]
    UnexpectedEnd {
        offset: usize,
        needed: usize,
        context: &'static str,
    },

    /// A length marker lies outside the declared bounds of its vector
    #[error("length marker {length} for {context} at offset {offset} outside {min}..={max}")]
    LengthOutOfRange {
        offset: usize,
        length: u64,
        min: u64,
        max: u64,
        context: &'static str,
    },

    /// A length marker promises more bytes than the input holds
    #[error("length marker {length} for {context} at offset {offset} exceeds {remaining} remaining byte(s)")]
    LengthExceedsInput {
        offset: usize,
        length: u64,
        remaining: usize,
        context: &'static str,
    },

    /// An enum or variant tag is not in the declared mapping
    #[error("unknown tag {tag} for {context} at offset {offset}")]
    UnknownTag {
        offset: usize,
        tag: u64,
        context: &'static str,
    },

    /// Vector elements consumed more bytes than the length marker promised
    #[error("elements of {context} overran their length marker at offset {offset}")]
    PayloadOverrun { offset: usize, context: &'static str },

    /// The payload is structurally malformed in a type-specific way
    #[error("invalid payload for {context} at offset {offset}: {reason}")]
    InvalidPayload {
        offset: usize,
        reason: &'static str,
        context: &'static str,
    },

    /// Bytes were left over after a complete value
    #[error("{remaining} trailing byte(s) after value ending at offset {offset}")]
    TrailingBytes { offset: usize, remaining: usize },
}

/// Errors raised when a structurally well-formed value breaks a semantic
/// invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A vector's payload length lies outside its declared bounds
    #[error("{context}: payload length {length} outside {min}..={max}")]
    LengthOutOfBounds {
        context: &'static str,
        length: u64,
        min: u64,
        max: u64,
    },

    /// Any other invariant violation
    #[error("{context}: {reason}")]
    Invalid { context: &'static str, reason: String },
}

impl ValidationError {
    /// Creates an invariant-violation error.
    pub fn invalid(context: &'static str, reason: impl Into<String>) -> Self {
        ValidationError::Invalid {
            context,
            reason: reason.into(),
        }
    }
}
