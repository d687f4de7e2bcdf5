//! Stream error types
//!
//! ## Read failures
//!
//! - `EndOfStream`: no further magic marker before the source ran dry. This is
//!   the normal way a stream ends.
//! - `Truncated`: a length-delimited section could not be fully read, or its
//!   bytes did not parse. No event is produced; the caller may keep reading,
//!   which resumes scanning for the next marker.
//! - `Io`: the underlying source failed, passed through unchanged.
//!
//! A resynchronization is not an error. It is reported as
//! [`ResyncOccurred`] next to the event that was recovered.

use crate::format::{FrameSection, MAGIC_LEN};
use eicio_core::{DecodeError, EventError, HeaderParseError};
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by [`EventReader`](crate::EventReader)
#[derive(Debug, Error)]
pub enum ReadError {
    /// No further frame in the stream
    #[error("End of stream")]
    EndOfStream,

    /// A frame section was cut short or did not parse
    #[error(transparent)]
    Truncated(#[from] TruncatedStream),

    /// Underlying read or seek failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ReadError {
    /// Whether this is the clean end of the stream
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, ReadError::EndOfStream)
    }

    /// Whether a frame was truncated or malformed
    pub fn is_truncated(&self) -> bool {
        matches!(self, ReadError::Truncated(_))
    }
}

/// A frame that could not be read in full.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Truncated stream in {section} at offset {offset}: {cause}")]
pub struct TruncatedStream {
    /// Section being read when the frame broke off
    pub section: FrameSection,
    /// Stream offset at which the section starts
    pub offset: u64,
    /// What went wrong
    pub cause: TruncationCause,
}

/// Why a frame section could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TruncationCause {
    /// The source ended before the declared length was read
    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead {
        /// Declared section length
        expected: u64,
        /// Bytes actually available
        actual: u64,
    },

    /// The declared length is larger than the reader accepts
    #[error("declared length {len} exceeds limit {max}")]
    LimitExceeded {
        /// Declared section length
        len: u64,
        /// Configured maximum
        max: u64,
    },

    /// Header bytes were the right length but did not parse
    #[error("header parse error: {0}")]
    Header(#[from] HeaderParseError),

    /// Payload bytes were the right length but a collection did not decode
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Bytes were skipped before the next frame was found.
///
/// Returned alongside a successfully read event or header; the event itself
/// is intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResyncOccurred {
    /// Bytes consumed while scanning, including the magic marker
    pub bytes_scanned: u64,
    /// Stream offset of the magic marker that was found
    pub frame_offset: u64,
}

impl ResyncOccurred {
    /// Bytes skipped before the magic marker
    pub fn skipped(&self) -> u64 {
        self.bytes_scanned - MAGIC_LEN as u64
    }
}

impl fmt::Display for ResyncOccurred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stream resynchronized: skipped {} bytes before frame at offset {}",
            self.skipped(),
            self.frame_offset
        )
    }
}

/// Result type for read operations
pub type ReadResult<T> = Result<T, ReadError>;

/// Errors returned by [`EventWriter`](crate::EventWriter)
#[derive(Debug, Error)]
pub enum WriteError {
    /// The event cannot be framed
    #[error("Invalid event: {0}")]
    Event(#[from] EventError),

    /// The header could not be marshaled
    #[error("Header error: {0}")]
    Header(#[from] HeaderParseError),

    /// The marshaled header does not fit the 32-bit length field
    #[error("Header too large: {0} bytes")]
    HeaderTooLarge(usize),

    /// Underlying write failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Reader or writer configuration is invalid
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A size limit of zero would reject every frame
    #[error("Invalid limit: {name} must be greater than zero")]
    ZeroLimit {
        /// Name of the setting
        name: &'static str,
    },

    /// Compression level outside the codec's range
    #[error("Invalid {codec} level {level} (valid: {min}..={max})")]
    InvalidLevel {
        /// Codec name
        codec: &'static str,
        /// Requested level
        level: i32,
        /// Lowest accepted level
        min: i32,
        /// Highest accepted level
        max: i32,
    },
}

/// Errors opening or creating a file-backed stream
#[derive(Debug, Error)]
pub enum OpenError {
    /// The file or a compression layer could not be set up
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File being opened
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The supplied configuration was rejected
    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),
}

impl OpenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        OpenError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_display() {
        let err = ReadError::from(TruncatedStream {
            section: FrameSection::Payload,
            offset: 42,
            cause: TruncationCause::ShortRead {
                expected: 100,
                actual: 7,
            },
        });
        let msg = err.to_string();
        assert!(msg.contains("payload"));
        assert!(msg.contains("42"));
        assert!(msg.contains("100"));
        assert!(msg.contains('7'));
        assert!(err.is_truncated());
        assert!(!err.is_end_of_stream());
    }

    #[test]
    fn test_parse_errors_become_truncation_causes() {
        let cause: TruncationCause = HeaderParseError::TrailingBytes(1).into();
        assert!(matches!(cause, TruncationCause::Header(_)));

        let cause: TruncationCause = DecodeError::UnknownTypeTag("x".to_string()).into();
        assert!(matches!(cause, TruncationCause::Decode(_)));
    }

    #[test]
    fn test_resync_skipped() {
        let resync = ResyncOccurred {
            bytes_scanned: 17,
            frame_offset: 13,
        };
        assert_eq!(resync.skipped(), 13);
        assert!(resync.to_string().contains("13 bytes"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err: ReadError = io_err.into();
        assert!(matches!(err, ReadError::Io(_)));

        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "gone");
        let err: WriteError = io_err.into();
        assert!(matches!(err, WriteError::Io(_)));
    }

    #[test]
    fn test_open_error_names_path() {
        let err = OpenError::io(
            "/tmp/missing.eicio",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        assert!(err.to_string().contains("/tmp/missing.eicio"));
    }
}
