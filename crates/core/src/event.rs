//! Events: named collections plus the header describing them
//!
//! An [`Event`] keeps its [`EventHeader`] and its collections side by side,
//! in matching order and length. The header is always derived from the
//! collections; there is no way to edit one without the other.
//!
//! ## Payload layout
//!
//! Collection `i` occupies `payload[offset_i .. offset_i + payload_size_i]`
//! where `offset_i` is the sum of the payload sizes before it.

use crate::collection::{Collection, RecordCollection};
use crate::error::{DecodeError, EventError};
use crate::header::{CollectionHeader, EventHeader};
use crate::record::Record;
use crate::registry::CollectionRegistry;
use std::fmt;

/// One unit of the stream: a header and its collections.
#[derive(Clone, Default)]
pub struct Event {
    header: EventHeader,
    collections: Vec<Box<dyn Collection>>,
}

impl Event {
    /// Create an empty event
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named collection.
    ///
    /// Names are unique within an event: adding a second collection under an
    /// existing name fails with [`EventError::DuplicateName`] and leaves the
    /// event unchanged.
    pub fn add_collection<C: Collection>(
        &mut self,
        name: impl Into<String>,
        collection: C,
    ) -> Result<(), EventError> {
        self.add_boxed(name, Box::new(collection))
    }

    /// Append an already boxed collection. See [`Event::add_collection`].
    pub fn add_boxed(
        &mut self,
        name: impl Into<String>,
        collection: Box<dyn Collection>,
    ) -> Result<(), EventError> {
        let name = name.into();
        if name.is_empty() {
            return Err(EventError::EmptyName);
        }
        if self.header.get(&name).is_some() {
            return Err(EventError::DuplicateName(name));
        }

        let payload_size = checked_payload_size(&name, collection.encoded_len())?;
        self.header.collections.push(CollectionHeader::new(
            name,
            collection.type_tag(),
            payload_size,
        ));
        self.collections.push(collection);
        Ok(())
    }

    /// Rebuild an event from a parsed header and its concatenated payload.
    ///
    /// Each descriptor's byte range is decoded with the codec its type tag
    /// selects. Fails with [`DecodeError::TruncatedPayload`] if `payload` is
    /// shorter than the header declares.
    pub fn from_payload(
        header: EventHeader,
        payload: &[u8],
        registry: &CollectionRegistry,
    ) -> Result<Self, DecodeError> {
        let expected = header.payload_len();
        if (payload.len() as u64) < expected {
            return Err(DecodeError::TruncatedPayload {
                expected,
                actual: payload.len() as u64,
            });
        }

        let mut collections = Vec::with_capacity(header.collections.len());
        let mut offset = 0usize;
        for desc in &header.collections {
            let end = offset + desc.payload_size as usize;
            let collection = registry
                .decode(&desc.type_tag, &payload[offset..end])
                .map_err(|e| DecodeError::in_collection(&desc.name, e))?;
            collections.push(collection);
            offset = end;
        }

        Ok(Event {
            header,
            collections,
        })
    }

    /// Encode every collection and derive a fresh header from the result.
    ///
    /// The returned header's payload sizes are the lengths actually produced,
    /// so `header.payload_len() == payload.len()` always holds.
    pub fn encode_payload(&self) -> Result<(EventHeader, Vec<u8>), EventError> {
        let total: usize = self.collections.iter().map(|c| c.encoded_len()).sum();
        let mut payload = Vec::with_capacity(total);
        let mut header = EventHeader::new();

        for (desc, collection) in self.header.collections.iter().zip(&self.collections) {
            let bytes = collection.encode();
            let payload_size = checked_payload_size(&desc.name, bytes.len())?;
            header.collections.push(CollectionHeader::new(
                desc.name.clone(),
                collection.type_tag(),
                payload_size,
            ));
            payload.extend_from_slice(&bytes);
        }

        Ok((header, payload))
    }

    /// Header describing this event's collections
    pub fn header(&self) -> &EventHeader {
        &self.header
    }

    /// Look up a collection by name
    pub fn collection(&self, name: &str) -> Option<&dyn Collection> {
        self.position(name).map(|i| self.collections[i].as_ref())
    }

    /// Look up a collection by name and record type.
    ///
    /// Returns `None` if the name is absent or holds a different type.
    pub fn get<R: Record>(&self, name: &str) -> Option<&RecordCollection<R>> {
        self.collection(name)?
            .as_any()
            .downcast_ref::<RecordCollection<R>>()
    }

    /// Iterate `(name, collection)` pairs in payload order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Collection)> {
        self.header
            .collections
            .iter()
            .zip(&self.collections)
            .map(|(desc, coll)| (desc.name.as_str(), coll.as_ref()))
    }

    /// Collection names in payload order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.header.names()
    }

    /// Number of collections
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Whether the event has no collections
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.header.collections.iter().position(|c| c.name == name)
    }
}

fn checked_payload_size(name: &str, size: usize) -> Result<u32, EventError> {
    u32::try_from(size).map_err(|_| EventError::PayloadTooLarge {
        name: name.to_string(),
        size,
        max: u64::from(u32::MAX),
    })
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header
            && self.collections.len() == other.collections.len()
            && self
                .collections
                .iter()
                .zip(&other.collections)
                .all(|(a, b)| a.dyn_eq(b.as_ref()))
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
