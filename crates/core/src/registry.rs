//! Type-tag to codec lookup table
//!
//! Decoding a collection needs more than its bytes: the reader has to know
//! which concrete record type the payload holds. The header names it with a
//! type tag, and the registry resolves that tag to a decoder.
//!
//! ## Usage
//!
//! ```ignore
//! let mut registry = CollectionRegistry::standard();
//! registry.register::<MyRecord>()?;
//! let reader = EventReader::new(file).with_registry(Arc::new(registry));
//! ```
//!
//! A registry is built once, then shared immutably (typically behind an
//! `Arc`) by every reader that needs it.

use crate::collection::{Collection, RecordCollection};
use crate::error::{DecodeError, RegistryError};
use crate::primitives::{McParticle, SimTrackerHit};
use crate::record::Record;
use std::collections::BTreeMap;
use std::fmt;

/// Decoder for one collection type.
pub type DecodeFn = fn(&[u8]) -> Result<Box<dyn Collection>, DecodeError>;

/// Registered collection codecs, keyed by type tag.
#[derive(Clone, Default)]
pub struct CollectionRegistry {
    decoders: BTreeMap<&'static str, DecodeFn>,
}

impl CollectionRegistry {
    /// Create a registry with no codecs
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in record type
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.insert(McParticle::TYPE_TAG, RecordCollection::<McParticle>::decode_boxed);
        registry.insert(
            SimTrackerHit::TYPE_TAG,
            RecordCollection::<SimTrackerHit>::decode_boxed,
        );
        registry
    }

    /// Register the collection codec for record type `R`.
    pub fn register<R: Record>(&mut self) -> Result<&mut Self, RegistryError> {
        self.register_decoder(R::TYPE_TAG, RecordCollection::<R>::decode_boxed)
    }

    /// Register a decoder under an explicit tag.
    ///
    /// Use this for collection types that are not a [`RecordCollection`].
    pub fn register_decoder(
        &mut self,
        type_tag: &'static str,
        decode: DecodeFn,
    ) -> Result<&mut Self, RegistryError> {
        if self.decoders.contains_key(type_tag) {
            return Err(RegistryError::DuplicateTag(type_tag.to_string()));
        }
        self.insert(type_tag, decode);
        Ok(self)
    }

    fn insert(&mut self, type_tag: &'static str, decode: DecodeFn) {
        self.decoders.insert(type_tag, decode);
    }

    /// Decode a payload whose header names `type_tag`.
    pub fn decode(&self, type_tag: &str, payload: &[u8]) -> Result<Box<dyn Collection>, DecodeError> {
        let decode = self
            .decoders
            .get(type_tag)
            .ok_or_else(|| DecodeError::UnknownTypeTag(type_tag.to_string()))?;
        decode(payload)
    }

    /// Whether a codec is registered for `type_tag`
    pub fn contains(&self, type_tag: &str) -> bool {
        self.decoders.contains_key(type_tag)
    }

    /// Registered tags, in sorted order
    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.decoders.keys().copied()
    }

    /// Number of registered codecs
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Whether no codecs are registered
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

impl fmt::Debug for CollectionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.decoders.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::McParticleCollection;
    use byteorder::ReadBytesExt;
    use std::io;

    #[derive(Debug, Clone, PartialEq)]
    struct Flag(u8);

    impl Record for Flag {
        const TYPE_TAG: &'static str = "test.Flag";
        const ENCODED_SIZE: usize = 1;

        fn encode_into(&self, buf: &mut Vec<u8>) {
            buf.push(self.0);
        }

        fn decode_from(reader: &mut &[u8]) -> io::Result<Self> {
            Ok(Flag(reader.read_u8()?))
        }
    }

    #[test]
    fn test_standard_registry_tags() {
        let registry = CollectionRegistry::standard();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("eicio.MCParticle"));
        assert!(registry.contains("eicio.SimTrackerHit"));
        assert!(!registry.contains("eicio.Unknown"));
    }

    #[test]
    fn test_decode_dispatches_on_tag() {
        let registry = CollectionRegistry::standard();
        let coll: McParticleCollection = vec![McParticle::default(); 3].into();

        let decoded = registry.decode(McParticle::TYPE_TAG, &coll.encode()).unwrap();
        assert_eq!(decoded.type_tag(), McParticle::TYPE_TAG);
        assert_eq!(decoded.len(), 3);
    }

    #[test]
    fn test_decode_unknown_tag() {
        let registry = CollectionRegistry::standard();
        let err = registry.decode("nope", &[]).unwrap_err();
        assert_eq!(err, DecodeError::UnknownTypeTag("nope".to_string()));
    }

    #[test]
    fn test_register_custom_record() {
        let mut registry = CollectionRegistry::new();
        assert!(registry.is_empty());

        registry.register::<Flag>().unwrap();
        let decoded = registry.decode("test.Flag", &[1, 2, 3]).unwrap();
        let flags = decoded
            .as_any()
            .downcast_ref::<RecordCollection<Flag>>()
            .unwrap();
        assert_eq!(flags.records(), &[Flag(1), Flag(2), Flag(3)]);
    }

    #[test]
    fn test_register_duplicate_tag_rejected() {
        let mut registry = CollectionRegistry::standard();
        let err = registry.register::<McParticle>().unwrap_err();
        assert_eq!(err, RegistryError::DuplicateTag("eicio.MCParticle".to_string()));
    }

    #[test]
    fn test_tags_sorted() {
        let mut registry = CollectionRegistry::standard();
        registry.register::<Flag>().unwrap();
        let tags: Vec<_> = registry.tags().collect();
        assert_eq!(
            tags,
            vec!["eicio.MCParticle", "eicio.SimTrackerHit", "test.Flag"]
        );
    }
}
