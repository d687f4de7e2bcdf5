//! Fixed-shape record encoding
//!
//! Every record type stored in a collection has a fixed encoded width, so a
//! collection payload is just its records laid end to end:
//!
//! ```text
//! ┌──────────────┬──────────────┬─────┬──────────────┐
//! │ Record 0     │ Record 1     │ ... │ Record N-1   │
//! │ ENCODED_SIZE │ ENCODED_SIZE │     │ ENCODED_SIZE │
//! └──────────────┴──────────────┴─────┴──────────────┘
//! ```
//!
//! The record count is never stored; a decoder infers it from the payload
//! length. All multi-byte fields are little-endian.

use crate::error::DecodeError;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io;

/// A fixed-shape record that can live in a [`RecordCollection`](crate::RecordCollection).
pub trait Record: fmt::Debug + Clone + PartialEq + Send + Sync + 'static {
    /// Type tag written into the collection header.
    ///
    /// Tags must be unique within a [`CollectionRegistry`](crate::CollectionRegistry).
    const TYPE_TAG: &'static str;

    /// Exact number of bytes one record occupies in a payload.
    const ENCODED_SIZE: usize;

    /// Append exactly `ENCODED_SIZE` bytes describing this record.
    fn encode_into(&self, buf: &mut Vec<u8>);

    /// Rebuild a record from a reader positioned at its first byte.
    fn decode_from(reader: &mut &[u8]) -> io::Result<Self>;
}

/// Encode a slice of records into one contiguous payload.
pub fn encode_records<R: Record>(records: &[R]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(records.len() * R::ENCODED_SIZE);
    for record in records {
        record.encode_into(&mut buf);
    }
    buf
}

/// Decode a payload of known length back into records.
///
/// Fails if the payload is not a whole number of records.
pub fn decode_records<R: Record>(payload: &[u8]) -> Result<Vec<R>, DecodeError> {
    if R::ENCODED_SIZE == 0 || payload.len() % R::ENCODED_SIZE != 0 {
        return Err(DecodeError::RecordSizeMismatch {
            type_tag: R::TYPE_TAG,
            record_size: R::ENCODED_SIZE,
            len: payload.len(),
        });
    }

    payload
        .chunks_exact(R::ENCODED_SIZE)
        .enumerate()
        .map(|(index, mut chunk)| {
            R::decode_from(&mut chunk).map_err(|e| DecodeError::MalformedRecord {
                type_tag: R::TYPE_TAG,
                index,
                detail: e.to_string(),
            })
        })
        .collect()
}

// ============================================================================
// Field helpers
// ============================================================================

// Writes into a Vec<u8> cannot fail, so the helpers swallow the io::Result.

pub(crate) fn put_i32(buf: &mut Vec<u8>, v: i32) {
    let _ = buf.write_i32::<LittleEndian>(v);
}

pub(crate) fn put_u32(buf: &mut Vec<u8>, v: u32) {
    let _ = buf.write_u32::<LittleEndian>(v);
}

pub(crate) fn put_u64(buf: &mut Vec<u8>, v: u64) {
    let _ = buf.write_u64::<LittleEndian>(v);
}

pub(crate) fn put_f32(buf: &mut Vec<u8>, v: f32) {
    let _ = buf.write_f32::<LittleEndian>(v);
}

pub(crate) fn put_f64(buf: &mut Vec<u8>, v: f64) {
    let _ = buf.write_f64::<LittleEndian>(v);
}

pub(crate) fn put_f32x3(buf: &mut Vec<u8>, v: [f32; 3]) {
    for x in v {
        put_f32(buf, x);
    }
}

pub(crate) fn put_f64x3(buf: &mut Vec<u8>, v: [f64; 3]) {
    for x in v {
        put_f64(buf, x);
    }
}

pub(crate) fn get_f32x3(reader: &mut &[u8]) -> io::Result<[f32; 3]> {
    Ok([
        reader.read_f32::<LittleEndian>()?,
        reader.read_f32::<LittleEndian>()?,
        reader.read_f32::<LittleEndian>()?,
    ])
}

pub(crate) fn get_f64x3(reader: &mut &[u8]) -> io::Result<[f64; 3]> {
    Ok([
        reader.read_f64::<LittleEndian>()?,
        reader.read_f64::<LittleEndian>()?,
        reader.read_f64::<LittleEndian>()?,
    ])
}
