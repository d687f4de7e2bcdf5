//! Byte sinks a writer can append to
//!
//! Closing a sink releases whatever it owns, innermost layer last. A sink
//! borrowed from the caller is only flushed; the caller still owns it.

use std::fs::File;
use std::io::{self, BufWriter, Cursor, Write};

/// A writable byte stream the event writer can drive.
pub trait StreamSink: Write {
    /// Flush and release every layer this sink owns.
    fn close(self) -> io::Result<()>
    where
        Self: Sized;
}

impl<W: Write + ?Sized> StreamSink for &mut W {
    fn close(self) -> io::Result<()> {
        self.flush()
    }
}

impl StreamSink for Vec<u8> {
    fn close(self) -> io::Result<()> {
        Ok(())
    }
}

impl<T> StreamSink for Cursor<T>
where
    Cursor<T>: Write,
{
    fn close(mut self) -> io::Result<()> {
        self.flush()
    }
}

impl StreamSink for File {
    fn close(mut self) -> io::Result<()> {
        self.flush()?;
        self.sync_all()
    }
}

impl<W: StreamSink> StreamSink for BufWriter<W> {
    fn close(self) -> io::Result<()> {
        let inner = self.into_inner().map_err(|e| e.into_error())?;
        inner.close()
    }
}
