//! Event writer
//!
//! Each event is encoded into one contiguous frame buffer and handed to the
//! sink in a single `write_all`, so a failed write never leaves a frame with
//! a header that describes bytes that were not produced by the same call.

use crate::error::WriteError;
use crate::format::encode_frame;
use crate::sink::StreamSink;
use eicio_core::Event;
use std::io::{self, Write};
use tracing::{debug, trace};

/// Appends framed events to a byte sink.
pub struct EventWriter<W> {
    sink: W,
    events_written: u64,
    bytes_written: u64,
}

impl<W: Write> EventWriter<W> {
    /// Write events to `sink`
    pub fn new(sink: W) -> Self {
        EventWriter {
            sink,
            events_written: 0,
            bytes_written: 0,
        }
    }

    /// Frame and write one event.
    ///
    /// The header is derived from the event's collections at write time.
    pub fn write(&mut self, event: &Event) -> Result<(), WriteError> {
        let frame = encode_frame(event)?;
        self.sink.write_all(&frame)?;

        self.events_written += 1;
        self.bytes_written += frame.len() as u64;
        trace!(
            collections = event.len(),
            frame_len = frame.len(),
            "Event written"
        );
        Ok(())
    }

    /// Flush buffered bytes to the sink
    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }

    /// Events written so far
    pub fn events_written(&self) -> u64 {
        self.events_written
    }

    /// Frame bytes written so far, before any compression
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Borrow the sink
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Unwrap the sink without flushing or closing it
    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: StreamSink> EventWriter<W> {
    /// Flush and release every layer of the sink
    pub fn close(self) -> io::Result<()> {
        debug!(
            events_written = self.events_written,
            bytes_written = self.bytes_written,
            "Closing event writer"
        );
        self.sink.close()
    }
}
