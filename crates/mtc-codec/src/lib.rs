//! TLS-presentation-language codec kernel
//!
//! This crate implements the serialization layer shared by every Merkle Tree
//! Certificate wire type: big-endian fixed-width integers, length-prefixed
//! vectors (byte-length bounds, marker width derived from the maximum),
//! opaque byte vectors, fixed arrays, enumerations, and records.
//!
//! Values implement [`Codec`]: deterministic serialization, strict parsing,
//! cheap skipping, and on-demand semantic validation. Parsing failures and
//! invariant violations are kept apart as [`ParsingError`] and
//! [`ValidationError`].

mod codec;
mod error;
mod macros;
mod reader;

pub use codec::{
    check_length_bounds, marker_width, read_bounded_marker, write_length_marker, Codec,
};
pub use error::{ParsingError, ValidationError};
pub use macros::no_extra_validation;
pub use reader::ByteReader;
