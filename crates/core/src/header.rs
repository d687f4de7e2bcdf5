//! Event header and its marshaled form
//!
//! The header is the preamble of every frame. It lists, in payload order,
//! one descriptor per collection:
//!
//! ```text
//! EventHeader
//! └── collections: [CollectionHeader]
//!     ├── name          : unique within the event
//!     ├── type_tag      : selects the codec on decode
//!     └── payload_size  : exact payload bytes of this collection
//! ```
//!
//! The marshaled block is a MessagePack map. It carries no length of its
//! own; the framing layer always prefixes it.

use crate::error::HeaderParseError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Cursor;

/// Descriptor of one collection within an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionHeader {
    /// Collection name
    pub name: String,
    /// Codec discriminant
    pub type_tag: String,
    /// Exact number of payload bytes
    pub payload_size: u32,
}

impl CollectionHeader {
    /// Create a descriptor
    pub fn new(name: impl Into<String>, type_tag: impl Into<String>, payload_size: u32) -> Self {
        CollectionHeader {
            name: name.into(),
            type_tag: type_tag.into(),
            payload_size,
        }
    }
}

/// Ordered collection descriptors of one event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventHeader {
    /// Descriptors, in payload order
    pub collections: Vec<CollectionHeader>,
}

impl EventHeader {
    /// Create an empty header
    pub fn new() -> Self {
        Self::default()
    }

    /// Total payload length declared by all descriptors.
    ///
    /// Summed in 64 bits so a corrupt header cannot wrap around.
    pub fn payload_len(&self) -> u64 {
        self.collections
            .iter()
            .map(|c| u64::from(c.payload_size))
            .sum()
    }

    /// Look up a descriptor by collection name
    pub fn get(&self, name: &str) -> Option<&CollectionHeader> {
        self.collections.iter().find(|c| c.name == name)
    }

    /// Collection names, in payload order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.iter().map(|c| c.name.as_str())
    }

    /// Number of collections described
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Whether the header describes no collections
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Serialize into a self-contained block.
    pub fn marshal(&self) -> Result<Vec<u8>, HeaderParseError> {
        rmp_serde::to_vec_named(self).map_err(|e| HeaderParseError::Encode(e.to_string()))
    }

    /// Parse a block produced by [`EventHeader::marshal`].
    ///
    /// The block must be consumed exactly; descriptors must have non-empty,
    /// unique names and non-empty type tags.
    pub fn unmarshal(bytes: &[u8]) -> Result<Self, HeaderParseError> {
        let mut cursor = Cursor::new(bytes);
        let header: EventHeader = rmp_serde::from_read(&mut cursor)
            .map_err(|e| HeaderParseError::Malformed(e.to_string()))?;

        let consumed = cursor.position() as usize;
        if consumed != bytes.len() {
            return Err(HeaderParseError::TrailingBytes(bytes.len() - consumed));
        }

        header.validate()?;
        Ok(header)
    }

    fn validate(&self) -> Result<(), HeaderParseError> {
        let mut seen = HashSet::with_capacity(self.collections.len());
        for (index, coll) in self.collections.iter().enumerate() {
            if coll.name.is_empty() {
                return Err(HeaderParseError::EmptyName { index });
            }
            if coll.type_tag.is_empty() {
                return Err(HeaderParseError::EmptyTypeTag {
                    name: coll.name.clone(),
                });
            }
            if !seen.insert(coll.name.as_str()) {
                return Err(HeaderParseError::DuplicateName(coll.name.clone()));
            }
        }
        Ok(())
    }
}
