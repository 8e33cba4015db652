//! # Wire Codec
//!
//! Deterministic binary serialization for everything the network's consensus
//! layer parses. The format is fixed: big-endian integers, fixed-width byte
//! blobs, and length-prefixed arrays, concatenated in schema order with no
//! padding, no alignment, and no self-description.
//!
//! The contract every implementation upholds:
//!
//! - `encode(decode(bytes)) == bytes` — byte-for-byte round-trip.
//! - Decoding consumes exactly the declared width of each field and returns
//!   the untouched remainder, so composites nest by plain delegation.
//! - Decoding past the end of the buffer is a [`CodecError`] and the whole
//!   parse is discarded. There is no partial recovery: a truncated input
//!   yields an error, never a truncated value.
//!
//! Field order is part of the consensus contract. It is written down exactly
//! once per type, in that type's [`Wire`] impl, and locked by golden-byte
//! tests in [`crate::tx`].

pub mod primitives;

pub use primitives::{read_array, read_exact, read_prefixed_bytes, write_array, write_prefixed_bytes};

use crate::error::CodecError;

/// A value with a fixed wire representation.
///
/// `write` appends the encoding to `out`; `read` parses one value from the
/// front of `input` and returns it with the remainder. The default
/// [`to_bytes`](Wire::to_bytes) / [`from_bytes`](Wire::from_bytes) pair adds
/// allocation and whole-buffer enforcement on top.
pub trait Wire: Sized {
    /// Appends this value's encoding to `out`. Infallible: every in-memory
    /// value has an encoding.
    fn write(&self, out: &mut Vec<u8>);

    /// Parses one value from the front of `input`, returning the value and
    /// the unconsumed remainder.
    fn read(input: &[u8]) -> Result<(Self, &[u8]), CodecError>;

    /// Encodes into a fresh buffer.
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(&mut out);
        out
    }

    /// Decodes a value that must consume the entire buffer. Trailing bytes
    /// are a [`CodecError::TrailingBytes`], since an encoding with garbage
    /// after it is not the encoding of anything.
    fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let (value, rest) = Self::read(bytes)?;
        if !rest.is_empty() {
            return Err(CodecError::TrailingBytes { count: rest.len() });
        }
        Ok(value)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
