//! Collections: ordered, homogeneously typed runs of records
//!
//! [`Collection`] is the object-safe view an [`Event`](crate::Event) holds.
//! [`RecordCollection<R>`] is the one concrete implementation, generic over
//! the [`Record`] type it stores.

use crate::error::DecodeError;
use crate::record::{decode_records, encode_records, Record};
use std::any::Any;
use std::fmt;

/// A collection stored in an event.
///
/// The type tag returned here is written into the collection header and is
/// the only thing a reader uses to pick a decoder.
pub trait Collection: fmt::Debug + Send + Sync + 'static {
    /// Type tag selecting the codec on decode.
    fn type_tag(&self) -> &'static str;

    /// Number of records.
    fn len(&self) -> usize;

    /// Whether the collection has no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Exact length of [`Collection::encode`] output.
    fn encoded_len(&self) -> usize;

    /// Encode all records, in order, into one payload.
    fn encode(&self) -> Vec<u8>;

    /// Upcast for typed access.
    fn as_any(&self) -> &dyn Any;

    /// Clone behind a box.
    fn clone_boxed(&self) -> Box<dyn Collection>;

    /// Compare with another collection of unknown concrete type.
    fn dyn_eq(&self, other: &dyn Collection) -> bool;
}

impl Clone for Box<dyn Collection> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

impl PartialEq for dyn Collection {
    fn eq(&self, other: &Self) -> bool {
        self.dyn_eq(other)
    }
}

/// A collection of fixed-shape records of type `R`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordCollection<R: Record> {
    records: Vec<R>,
}

impl<R: Record> RecordCollection<R> {
    /// Create an empty collection
    pub fn new() -> Self {
        RecordCollection {
            records: Vec::new(),
        }
    }

    /// Append a record
    pub fn push(&mut self, record: R) {
        self.records.push(record);
    }

    /// Records in insertion order
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Iterate over records
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    /// Consume the collection, returning its records
    pub fn into_records(self) -> Vec<R> {
        self.records
    }

    /// Decode a payload of exactly `payload.len()` bytes.
    pub fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        Ok(RecordCollection {
            records: decode_records(payload)?,
        })
    }

    /// Decode into a boxed trait object; this is what the registry stores.
    pub fn decode_boxed(payload: &[u8]) -> Result<Box<dyn Collection>, DecodeError> {
        Ok(Box::new(Self::decode(payload)?))
    }
}

impl<R: Record> Default for RecordCollection<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> From<Vec<R>> for RecordCollection<R> {
    fn from(records: Vec<R>) -> Self {
        RecordCollection { records }
    }
}

impl<R: Record> FromIterator<R> for RecordCollection<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        RecordCollection {
            records: iter.into_iter().collect(),
        }
    }
}

impl<R: Record> Collection for RecordCollection<R> {
    fn type_tag(&self) -> &'static str {
        R::TYPE_TAG
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn encoded_len(&self) -> usize {
        self.records.len() * R::ENCODED_SIZE
    }

    fn encode(&self) -> Vec<u8> {
        encode_records(&self.records)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_boxed(&self) -> Box<dyn Collection> {
        Box::new(self.clone())
    }

    fn dyn_eq(&self, other: &dyn Collection) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .map_or(false, |other| self == other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{McParticle, McParticleCollection, SimTrackerHit};

    fn particle(pdg: i32) -> McParticle {
        McParticle {
            pdg,
            mass: 0.938,
            ..Default::default()
        }
    }

    #[test]
    fn test_encoded_len_matches_encode() {
        let coll: McParticleCollection = vec![particle(11), particle(2212)].into();
        assert_eq!(coll.encoded_len(), coll.encode().len());
        assert_eq!(coll.encoded_len(), 2 * McParticle::ENCODED_SIZE);
    }

    #[test]
    fn test_decode_roundtrip_through_trait_object() {
        let coll: McParticleCollection = vec![particle(-13), particle(22)].into();
        let boxed: Box<dyn Collection> = Box::new(coll.clone());

        let decoded = McParticleCollection::decode_boxed(&boxed.encode()).unwrap();
        assert!(decoded.dyn_eq(boxed.as_ref()));
        assert_eq!(decoded.len(), 2);
    }

    #[test]
    fn test_dyn_eq_distinguishes_types() {
        let particles: Box<dyn Collection> = Box::new(McParticleCollection::new());
        let hits: Box<dyn Collection> = Box::new(RecordCollection::<SimTrackerHit>::new());

        // Both are empty, but they are different collection types.
        assert!(!particles.dyn_eq(hits.as_ref()));
        assert!(particles.dyn_eq(particles.clone().as_ref()));
    }

    #[test]
    fn test_empty_collection() {
        let coll = McParticleCollection::default();
        assert!(coll.is_empty());
        assert!(coll.encode().is_empty());
        assert!(McParticleCollection::decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_collect_from_iterator() {
        let coll: McParticleCollection = (0..5).map(particle).collect();
        assert_eq!(coll.len(), 5);
        assert_eq!(coll.records()[3].pdg, 3);
    }
}
