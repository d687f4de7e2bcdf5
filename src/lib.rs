//! eicio - self-describing binary container for event streams
//!
//! An eicio stream is a sequence of framed events. Each event carries named,
//! typed collections of fixed-shape records together with a header that
//! describes them, so a reader can list, skip or decode events without any
//! out-of-band schema.
//!
//! # Quick Start
//!
//! ```ignore
//! use eicio::{Event, EventReader, EventWriter, McParticle, McParticleCollection};
//!
//! let mut event = Event::new();
//! let particles: McParticleCollection = vec![McParticle::default(); 2].into();
//! event.add_collection("MCParticles", particles)?;
//!
//! let mut writer = eicio::create("run.eicio.gz")?;
//! writer.write(&event)?;
//! writer.close()?;
//!
//! let mut reader = eicio::open("run.eicio.gz")?;
//! let (event, resync) = reader.read_next()?;
//! ```
//!
//! # Architecture
//!
//! - `eicio-core`: records, collections, the type-tag registry, headers, events
//! - `eicio-stream`: framing, resynchronizing reader, writer, file streams
//!
//! Their public items are re-exported here.

pub use eicio_core::{
    decode_records, encode_records, Collection, CollectionHeader, CollectionRegistry, DecodeError,
    DecodeFn, Event, EventError, EventHeader, HeaderParseError, McParticle, McParticleCollection,
    Record, RecordCollection, RegistryError, SimTrackerHit, SimTrackerHitCollection,
};
pub use eicio_stream::{
    create, create_with_config, encode_frame, open, open_with_config, Compression, ConfigError,
    EventReader, EventWriter, Events, FrameSection, InputStream, OpenError, OutputStream,
    ReadError, ReadResult, ReaderConfig, ResyncOccurred, Seekable, Sequential, StreamSink,
    StreamSource, TruncatedStream, TruncationCause, WriteError, WriterConfig,
    DEFAULT_MAX_HEADER_LEN, DEFAULT_MAX_PAYLOAD_LEN, FRAME_PREAMBLE_SIZE, HEADER_LEN_SIZE, MAGIC,
    MAGIC_LEN,
};
