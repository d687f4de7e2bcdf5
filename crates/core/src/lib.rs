//! Core types for eicio event streams
//!
//! This crate defines the value model that the stream framing serializes:
//! - Record: fixed-shape record encoding (little-endian, no padding)
//! - Collection: object-safe view of an ordered run of records
//! - RecordCollection: the generic collection over one record type
//! - CollectionRegistry: type tag to decoder lookup, built once and shared
//! - EventHeader / CollectionHeader: per-event descriptors and their marshaled form
//! - Event: named collections kept in step with their header
//! - Built-in records: McParticle, SimTrackerHit

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod error;
pub mod event;
pub mod header;
pub mod primitives;
pub mod record;
pub mod registry;

pub use collection::{Collection, RecordCollection};
pub use error::{DecodeError, EventError, HeaderParseError, RegistryError};
pub use event::Event;
pub use header::{CollectionHeader, EventHeader};
pub use primitives::{McParticle, McParticleCollection, SimTrackerHit, SimTrackerHitCollection};
pub use record::{decode_records, encode_records, Record};
pub use registry::{CollectionRegistry, DecodeFn};
