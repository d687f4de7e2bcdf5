//! Event reader with resynchronization
//!
//! ## Read path
//!
//! ```text
//! SCANNING_MAGIC ─► READING_HEADER_LEN ─► READING_HEADER ─► READING_PAYLOAD ─► DONE
//!       │                   │                    │                  │
//!       ▼                   └────────────────────┴──────────────────┴──► Truncated
//!  EndOfStream
//! ```
//!
//! Scanning reads one byte at a time through a 4-byte window until the window
//! equals the magic marker. Exactly 4 bytes scanned means the stream was
//! aligned; anything more means junk was skipped and the frame is reported
//! with [`ResyncOccurred`].
//!
//! Nothing is retried after a truncated frame. Calling `read_next` again
//! re-enters scanning from wherever the failed read stopped.
//!
//! ## Usage
//!
//! ```ignore
//! let mut reader = EventReader::new(file);
//! loop {
//!     match reader.read_next() {
//!         Ok((event, resync)) => { /* process */ }
//!         Err(ReadError::EndOfStream) => break,
//!         Err(e) => return Err(e),
//!     }
//! }
//! ```

use crate::config::ReaderConfig;
use crate::error::{ReadError, ReadResult, ResyncOccurred, TruncatedStream, TruncationCause};
use crate::format::{FrameSection, HEADER_LEN_SIZE, MAGIC, MAGIC_LEN};
use crate::source::{is_cut_off, Seekable, Sequential, StreamSource};
use eicio_core::{CollectionRegistry, Event, EventHeader};
use std::io::{self, Read, Seek};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Upper bound on up-front allocation for a section; larger sections grow as
/// bytes actually arrive.
const PREALLOC_LIMIT: u64 = 1024 * 1024;

/// Sequential reader of framed events.
///
/// A reader owns its cursor in the underlying stream and is not meant to be
/// shared between threads without external locking.
pub struct EventReader<S> {
    source: S,
    registry: Arc<CollectionRegistry>,
    config: ReaderConfig,
    position: u64,
    events_read: u64,
    resync_count: u64,
}

impl<R: Read> EventReader<Sequential<R>> {
    /// Read from a plain byte stream; skipped payloads are read and discarded.
    pub fn new(reader: R) -> Self {
        Self::from_source(Sequential::new(reader))
    }
}

impl<R: Read + Seek> EventReader<Seekable<R>> {
    /// Read from a seekable stream; skipped payloads are seeked over.
    pub fn seekable(reader: R) -> Self {
        Self::from_source(Seekable::new(reader))
    }
}

impl<S: StreamSource> EventReader<S> {
    /// Read from any [`StreamSource`], using the built-in collection types.
    pub fn from_source(source: S) -> Self {
        EventReader {
            source,
            registry: Arc::new(CollectionRegistry::standard()),
            config: ReaderConfig::default(),
            position: 0,
            events_read: 0,
            resync_count: 0,
        }
    }

    /// Decode collections with `registry` instead of the built-in one
    pub fn with_registry(mut self, registry: Arc<CollectionRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Apply size limits from `config`
    pub fn with_config(mut self, config: ReaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Read the next complete event.
    ///
    /// Returns `ResyncOccurred` alongside the event if junk had to be skipped
    /// to find it. Fails with [`ReadError::EndOfStream`] once no further
    /// frame exists.
    pub fn read_next(&mut self) -> ReadResult<(Event, Option<ResyncOccurred>)> {
        let (header, resync) = self.read_preamble()?;

        let payload_len = header.payload_len();
        let payload_offset = self.position;
        let payload = self.read_section(FrameSection::Payload, payload_len)?;

        let event = Event::from_payload(header, &payload, &self.registry)
            .map_err(|e| truncated(FrameSection::Payload, payload_offset, e.into()))?;

        self.events_read += 1;
        trace!(
            position = self.position,
            collections = event.len(),
            payload_len,
            "Event read"
        );
        Ok((event, resync))
    }

    /// Read the next event's header and move past its payload.
    ///
    /// Seekable sources seek over the payload; others read and discard it.
    /// No collections are decoded.
    pub fn read_next_header(&mut self) -> ReadResult<(EventHeader, Option<ResyncOccurred>)> {
        let (header, resync) = self.read_preamble()?;

        let payload_len = header.payload_len();
        let payload_offset = self.position;
        self.check_limit(FrameSection::Payload, payload_offset, payload_len)?;

        let skipped = self.source.skip(payload_len)?;
        self.position += skipped;
        if skipped < payload_len {
            return Err(truncated(
                FrameSection::Payload,
                payload_offset,
                TruncationCause::ShortRead {
                    expected: payload_len,
                    actual: skipped,
                },
            ));
        }

        self.events_read += 1;
        trace!(
            position = self.position,
            collections = header.len(),
            payload_len,
            seek = self.source.is_seekable(),
            "Header read"
        );
        Ok((header, resync))
    }

    /// Iterate over the remaining events.
    ///
    /// The iterator ends at `EndOfStream`, and after yielding any other error.
    pub fn events(&mut self) -> Events<'_, S> {
        Events {
            reader: self,
            done: false,
        }
    }

    /// Bytes consumed from the stream so far
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Events (or headers) read successfully
    pub fn events_read(&self) -> u64 {
        self.events_read
    }

    /// Number of times junk was skipped to find a frame
    pub fn resync_count(&self) -> u64 {
        self.resync_count
    }

    /// Registry used to decode collections
    pub fn registry(&self) -> &Arc<CollectionRegistry> {
        &self.registry
    }

    /// Active configuration
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Borrow the underlying source
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Unwrap the underlying source without closing it
    pub fn into_source(self) -> S {
        self.source
    }

    /// Release every layer the source owns
    pub fn close(self) -> io::Result<()> {
        debug!(
            events_read = self.events_read,
            resyncs = self.resync_count,
            position = self.position,
            "Closing event reader"
        );
        self.source.close()
    }

    /// Synchronize to the next frame and read its header.
    fn read_preamble(&mut self) -> ReadResult<(EventHeader, Option<ResyncOccurred>)> {
        let scanned = self.sync_to_magic()?;
        let frame_offset = self.position - MAGIC_LEN as u64;

        let resync = if scanned == MAGIC_LEN as u64 {
            None
        } else {
            self.resync_count += 1;
            let resync = ResyncOccurred {
                bytes_scanned: scanned,
                frame_offset,
            };
            warn!(
                skipped = resync.skipped(),
                frame_offset, "Stream out of sync, skipped bytes before frame"
            );
            Some(resync)
        };

        let len_bytes = self.read_section(FrameSection::HeaderLen, HEADER_LEN_SIZE as u64)?;
        let header_len = u32::from_le_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]);

        let header_offset = self.position;
        if header_len > self.config.max_header_len {
            return Err(truncated(
                FrameSection::Header,
                header_offset,
                TruncationCause::LimitExceeded {
                    len: u64::from(header_len),
                    max: u64::from(self.config.max_header_len),
                },
            ));
        }

        let header_bytes = self.read_section(FrameSection::Header, u64::from(header_len))?;
        let header = EventHeader::unmarshal(&header_bytes)
            .map_err(|e| truncated(FrameSection::Header, header_offset, e.into()))?;

        Ok((header, resync))
    }

    /// Scan for the magic marker, returning the bytes consumed doing so.
    fn sync_to_magic(&mut self) -> ReadResult<u64> {
        let mut window = [0u8; MAGIC_LEN];
        let mut byte = [0u8; 1];
        let mut scanned = 0u64;

        loop {
            match self.source.read(&mut byte) {
                Ok(0) => {
                    if scanned > 0 {
                        debug!(scanned, "End of stream while scanning for frame");
                    }
                    return Err(ReadError::EndOfStream);
                }
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if is_cut_off(&e) => {
                    debug!(scanned, "Stream cut off while scanning for frame");
                    return Err(ReadError::EndOfStream);
                }
                Err(e) => return Err(ReadError::Io(e)),
            }

            scanned += 1;
            self.position += 1;
            window.rotate_left(1);
            window[MAGIC_LEN - 1] = byte[0];

            if scanned >= MAGIC_LEN as u64 && window == MAGIC {
                return Ok(scanned);
            }
        }
    }

    /// Read exactly `len` bytes of one section.
    fn read_section(&mut self, section: FrameSection, len: u64) -> ReadResult<Vec<u8>> {
        let offset = self.position;
        self.check_limit(section, offset, len)?;

        // On error, read_to_end leaves the bytes it got in `buf`.
        let mut buf = Vec::with_capacity(len.min(PREALLOC_LIMIT) as usize);
        let result = (&mut self.source).take(len).read_to_end(&mut buf);
        let read = buf.len() as u64;
        self.position += read;
        match result {
            Ok(_) => {}
            Err(e) if is_cut_off(&e) => {}
            Err(e) => return Err(ReadError::Io(e)),
        }

        if read < len {
            return Err(truncated(
                section,
                offset,
                TruncationCause::ShortRead {
                    expected: len,
                    actual: read,
                },
            ));
        }
        Ok(buf)
    }

    fn check_limit(&self, section: FrameSection, offset: u64, len: u64) -> ReadResult<()> {
        if section == FrameSection::Payload && len > self.config.max_payload_len {
            return Err(truncated(
                section,
                offset,
                TruncationCause::LimitExceeded {
                    len,
                    max: self.config.max_payload_len,
                },
            ));
        }
        Ok(())
    }
}

fn truncated(section: FrameSection, offset: u64, cause: TruncationCause) -> ReadError {
    ReadError::Truncated(TruncatedStream {
        section,
        offset,
        cause,
    })
}

/// Iterator returned by [`EventReader::events`]
pub struct Events<'a, S> {
    reader: &'a mut EventReader<S>,
    done: bool,
}

impl<S: StreamSource> Iterator for Events<'_, S> {
    type Item = ReadResult<(Event, Option<ResyncOccurred>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_next() {
            Ok(item) => Some(Ok(item)),
            Err(ReadError::EndOfStream) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
