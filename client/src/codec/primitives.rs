//! Primitive wire types: fixed-width big-endian integers, fixed byte blobs,
//! and length-prefixed arrays.
//!
//! Everything larger in the wire format is a concatenation of these. The
//! integer widths are fixed by the network: `u16` (2 bytes), `u32` (4 bytes),
//! `u64` (8 bytes), all big-endian. Arrays carry a 4-byte element count
//! followed by the concatenated elements; a zero-length array is exactly the
//! 4-byte zero count.

use super::Wire;
use crate::error::CodecError;

/// Splits `len` bytes off the front of `input`, or fails if the input is
/// shorter than the declared width.
pub fn read_exact(input: &[u8], len: usize) -> Result<(&[u8], &[u8]), CodecError> {
    if input.len() < len {
        return Err(CodecError::UnexpectedEof {
            needed: len,
            remaining: input.len(),
        });
    }
    Ok(input.split_at(len))
}

impl Wire for u16 {
    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_be_bytes());
    }

    fn read(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (head, rest) = read_exact(input, 2)?;
        Ok((u16::from_be_bytes([head[0], head[1]]), rest))
    }
}

impl Wire for u32 {
    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_be_bytes());
    }

    fn read(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (head, rest) = read_exact(input, 4)?;
        Ok((u32::from_be_bytes([head[0], head[1], head[2], head[3]]), rest))
    }
}

impl Wire for u64 {
    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_be_bytes());
    }

    fn read(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (head, rest) = read_exact(input, 8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(head);
        Ok((u64::from_be_bytes(buf), rest))
    }
}

/// Fixed-width byte blob. The width is declared by the schema (the array
/// length in the type), never by the wire.
impl<const N: usize> Wire for [u8; N] {
    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self);
    }

    fn read(input: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        let (head, rest) = read_exact(input, N)?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(head);
        Ok((buf, rest))
    }
}

/// Writes a length-prefixed array: 4-byte big-endian element count, then the
/// concatenated element encodings.
pub fn write_array<T: Wire>(items: &[T], out: &mut Vec<u8>) {
    (items.len() as u32).write(out);
    for item in items {
        item.write(out);
    }
}

/// Reads a length-prefixed array. The count is trusted only as far as the
/// input reaches: a count larger than the remaining elements fails with
/// [`CodecError::UnexpectedEof`] from the element decode.
pub fn read_array<T: Wire>(input: &[u8]) -> Result<(Vec<T>, &[u8]), CodecError> {
    let (count, mut rest) = u32::read(input)?;
    let mut items = Vec::with_capacity(count.min(1024) as usize);
    for _ in 0..count {
        let (item, next) = T::read(rest)?;
        items.push(item);
        rest = next;
    }
    Ok((items, rest))
}

/// Writes a length-prefixed raw byte string (4-byte count, then the bytes).
/// Used for fields whose width is data-dependent, such as memos.
pub fn write_prefixed_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    (bytes.len() as u32).write(out);
    out.extend_from_slice(bytes);
}

/// Reads a length-prefixed raw byte string.
pub fn read_prefixed_bytes(input: &[u8]) -> Result<(Vec<u8>, &[u8]), CodecError> {
    let (len, rest) = u32::read(input)?;
    let (bytes, rest) = read_exact(rest, len as usize)?;
    Ok((bytes.to_vec(), rest))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
