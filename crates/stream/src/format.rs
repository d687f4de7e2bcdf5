//! Frame layout
//!
//! Every event in a stream is one frame:
//!
//! ```text
//! ┌──────────────────┬────────────────────┬──────────────────────┬──────────────────────────┐
//! │ Magic (4 bytes)  │ Header Len (u32 LE)│ Header (Header Len)  │ Payload (sum of sizes)   │
//! └──────────────────┴────────────────────┴──────────────────────┴──────────────────────────┘
//!
//! Header: MessagePack EventHeader (name, type tag, payload size per collection)
//! Payload: each collection's encoded records, concatenated in header order
//! ```
//!
//! There is no checksum. Corruption inside a correctly sized section is only
//! noticed if the header or a collection then fails to parse.

use crate::error::WriteError;
use eicio_core::Event;
use std::fmt;

/// Marker at the start of every frame
pub const MAGIC: [u8; 4] = [0xE1, 0xC1, 0x00, 0x00];

/// Size of the magic marker in bytes
pub const MAGIC_LEN: usize = 4;

/// Size of the header length field in bytes
pub const HEADER_LEN_SIZE: usize = 4;

/// Bytes preceding the header block: magic + header length
pub const FRAME_PREAMBLE_SIZE: usize = MAGIC_LEN + HEADER_LEN_SIZE;

/// Length-delimited section of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSection {
    /// The 4-byte header length field
    HeaderLen,
    /// The marshaled event header
    Header,
    /// The concatenated collection payloads
    Payload,
}

impl fmt::Display for FrameSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrameSection::HeaderLen => "header length",
            FrameSection::Header => "header",
            FrameSection::Payload => "payload",
        };
        f.write_str(name)
    }
}

/// Encode an event as one complete frame.
///
/// The header is re-derived from the event's collections, so the declared
/// payload sizes always match the bytes that follow.
pub fn encode_frame(event: &Event) -> Result<Vec<u8>, WriteError> {
    let (header, payload) = event.encode_payload()?;
    let header_bytes = header.marshal()?;
    let header_len = u32::try_from(header_bytes.len())
        .map_err(|_| WriteError::HeaderTooLarge(header_bytes.len()))?;

    let mut frame = Vec::with_capacity(FRAME_PREAMBLE_SIZE + header_bytes.len() + payload.len());
    frame.extend_from_slice(&MAGIC);
    frame.extend_from_slice(&header_len.to_le_bytes());
    frame.extend_from_slice(&header_bytes);
    frame.extend_from_slice(&payload);
    Ok(frame)
}
