//! Framed, resynchronizing event streams for eicio
//!
//! This crate turns events into bytes and back:
//!
//! - Format: frame layout (magic, header length, header, payload)
//! - Reader: scanning, resynchronization, truncation detection, header-only reads
//! - Writer: one contiguous write per event
//! - Source / Sink: what a reader or writer can be driven over, and how it is closed
//! - File: plain, gzip and zstd files opened by extension
//! - Config: size limits and compression settings

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod file; // Compressed and plain file streams
pub mod format;
pub mod reader;
pub mod sink;
pub mod source;
pub mod writer;

pub use config::{ReaderConfig, WriterConfig, DEFAULT_MAX_HEADER_LEN, DEFAULT_MAX_PAYLOAD_LEN};
pub use error::{
    ConfigError, OpenError, ReadError, ReadResult, ResyncOccurred, TruncatedStream,
    TruncationCause, WriteError,
};
pub use file::{create, create_with_config, open, open_with_config, Compression, InputStream, OutputStream};
pub use format::{encode_frame, FrameSection, FRAME_PREAMBLE_SIZE, HEADER_LEN_SIZE, MAGIC, MAGIC_LEN};
pub use reader::{EventReader, Events};
pub use sink::StreamSink;
pub use source::{Seekable, Sequential, StreamSource};
pub use writer::EventWriter;
