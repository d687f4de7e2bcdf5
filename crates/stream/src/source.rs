//! Byte sources a reader can consume
//!
//! The reader needs a blocking byte source and one extra capability: moving
//! forward past a payload it does not want. Sources that can seek do that in
//! place; everything else reads and discards.

use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};

/// A readable byte stream the event reader can drive.
pub trait StreamSource: Read {
    /// Advance past up to `n` bytes without returning them.
    ///
    /// Returns how many bytes were actually skipped, which is less than `n`
    /// only if the stream ended first.
    fn skip(&mut self, n: u64) -> io::Result<u64>;

    /// Whether [`StreamSource::skip`] seeks rather than reads
    fn is_seekable(&self) -> bool {
        false
    }

    /// Release any layers this source owns.
    fn close(self) -> io::Result<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Whether a read failed because the data ended mid-stream.
///
/// Decompressors report a cut-off input as `UnexpectedEof` rather than as a
/// zero-length read.
pub(crate) fn is_cut_off(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::UnexpectedEof
}

/// Read and discard `n` bytes.
///
/// Stops early, returning the count so far, if the stream ends or is cut off.
pub(crate) fn discard<R: Read>(reader: &mut R, n: u64) -> io::Result<u64> {
    let mut limited = reader.take(n);
    let mut scratch = [0u8; 8 * 1024];
    let mut skipped = 0u64;
    loop {
        match limited.read(&mut scratch) {
            Ok(0) => return Ok(skipped),
            Ok(read) => skipped += read as u64,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if is_cut_off(&e) => return Ok(skipped),
            Err(e) => return Err(e),
        }
    }
}

/// Seek forward `n` bytes, stopping at the end of the stream.
pub(crate) fn seek_forward<S: Seek>(stream: &mut S, n: u64) -> io::Result<u64> {
    let start = stream.stream_position()?;
    let end = stream.seek(SeekFrom::End(0))?;
    let target = start.saturating_add(n).min(end.max(start));
    stream.seek(SeekFrom::Start(target))?;
    Ok(target - start)
}

/// Buffered source that skips by reading.
#[derive(Debug)]
pub struct Sequential<R> {
    inner: BufReader<R>,
}

impl<R: Read> Sequential<R> {
    /// Wrap a reader
    pub fn new(reader: R) -> Self {
        Sequential {
            inner: BufReader::new(reader),
        }
    }

    /// Borrow the wrapped reader
    pub fn get_ref(&self) -> &R {
        self.inner.get_ref()
    }

    /// Unwrap the reader. Buffered but unread bytes are lost.
    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}

impl<R: Read> Read for Sequential<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read> BufRead for Sequential<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt)
    }
}

impl<R: Read> StreamSource for Sequential<R> {
    fn skip(&mut self, n: u64) -> io::Result<u64> {
        discard(&mut self.inner, n)
    }
}

/// Buffered source that skips by seeking.
#[derive(Debug)]
pub struct Seekable<R> {
    inner: BufReader<R>,
}

impl<R: Read + Seek> Seekable<R> {
    /// Wrap a seekable reader
    pub fn new(reader: R) -> Self {
        Seekable {
            inner: BufReader::new(reader),
        }
    }

    /// Borrow the wrapped reader
    pub fn get_ref(&self) -> &R {
        self.inner.get_ref()
    }

    /// Unwrap the reader. Buffered but unread bytes are lost.
    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}

impl<R: Read + Seek> Read for Seekable<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read + Seek> BufRead for Seekable<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt)
    }
}

impl<R: Read + Seek> StreamSource for Seekable<R> {
    fn skip(&mut self, n: u64) -> io::Result<u64> {
        seek_forward(&mut self.inner, n)
    }

    fn is_seekable(&self) -> bool {
        true
    }
}
