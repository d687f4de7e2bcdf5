//! Error types for the event model
//!
//! This module defines the errors raised while building events, marshaling
//! headers and decoding collection payloads. We use `thiserror` for automatic
//! `Display` and `Error` trait implementations.

use thiserror::Error;

/// A collection payload could not be turned back into records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// No codec is registered for the type tag named in the header
    #[error("Unknown collection type tag: {0}")]
    UnknownTypeTag(String),

    /// Payload length is not a whole number of fixed-size records
    #[error(
        "Payload of {len} bytes is not a multiple of the {record_size}-byte {type_tag} record"
    )]
    RecordSizeMismatch {
        /// Tag of the collection being decoded
        type_tag: &'static str,
        /// Fixed encoded size of one record
        record_size: usize,
        /// Number of payload bytes supplied
        len: usize,
    },

    /// A record's bytes could not be read field by field
    #[error("Malformed {type_tag} record at index {index}: {detail}")]
    MalformedRecord {
        /// Tag of the collection being decoded
        type_tag: &'static str,
        /// Index of the offending record
        index: usize,
        /// Human-readable description
        detail: String,
    },

    /// Fewer payload bytes were supplied than the header declares
    #[error("Truncated payload: header declares {expected} bytes, got {actual}")]
    TruncatedPayload {
        /// Sum of declared payload sizes
        expected: u64,
        /// Bytes actually supplied
        actual: u64,
    },

    /// Decoding one collection of an event failed
    #[error("Collection '{name}' failed to decode: {source}")]
    Collection {
        /// Name of the collection from the header
        name: String,
        /// Underlying decode failure
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Wrap a decode failure with the name of the collection it belongs to.
    pub fn in_collection(name: impl Into<String>, source: DecodeError) -> Self {
        DecodeError::Collection {
            name: name.into(),
            source: Box::new(source),
        }
    }
}

/// The header block of a frame could not be marshaled or parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderParseError {
    /// MessagePack encoding of the header failed
    #[error("Header encode error: {0}")]
    Encode(String),

    /// Header bytes are not a valid MessagePack header
    #[error("Malformed header: {0}")]
    Malformed(String),

    /// Bytes remain after the header message
    #[error("Header has {0} trailing bytes")]
    TrailingBytes(usize),

    /// A collection descriptor has an empty name
    #[error("Collection descriptor {index} has an empty name")]
    EmptyName {
        /// Position of the descriptor
        index: usize,
    },

    /// A collection descriptor has an empty type tag
    #[error("Collection '{name}' has an empty type tag")]
    EmptyTypeTag {
        /// Name of the collection
        name: String,
    },

    /// Two descriptors share one name
    #[error("Duplicate collection name in header: {0}")]
    DuplicateName(String),
}

/// Errors raised while assembling an event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// A collection with this name is already part of the event
    #[error("Collection already exists: {0}")]
    DuplicateName(String),

    /// Collection names must be non-empty
    #[error("Collection name must not be empty")]
    EmptyName,

    /// The encoded collection does not fit the 32-bit payload size field
    #[error("Collection '{name}' encodes to {size} bytes (max: {max})")]
    PayloadTooLarge {
        /// Name of the collection
        name: String,
        /// Encoded size in bytes
        size: usize,
        /// Largest representable payload size
        max: u64,
    },
}

/// Errors raised while building a collection registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A codec for this tag is already registered
    #[error("Type tag already registered: {0}")]
    DuplicateTag(String),
}
