//! File-backed streams
//!
//! Files ending in `.gz` are read and written through gzip, files ending in
//! `.zst` or `.zstd` through zstd. Anything else is plain. Only plain files
//! are seekable; header-only reads of compressed files decompress and discard
//! the payload.
//!
//! Closing a stream unwinds its layers: the compressor is finished first,
//! then the buffer is flushed, then the file is synced.

use crate::config::{ReaderConfig, WriterConfig};
use crate::error::OpenError;
use crate::reader::EventReader;
use crate::sink::StreamSink;
use crate::source::{discard, seek_forward, StreamSource};
use crate::writer::EventWriter;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

/// Compression layer of a file-backed stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Plain frames
    #[default]
    None,
    /// gzip (`.gz`)
    Gzip,
    /// zstd (`.zst`, `.zstd`)
    Zstd,
}

impl Compression {
    /// Infer compression from a file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("gz") => Compression::Gzip,
            Some("zst") | Some("zstd") => Compression::Zstd,
            _ => Compression::None,
        }
    }

    /// Conventional file extension, if any
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            Compression::None => None,
            Compression::Gzip => Some("gz"),
            Compression::Zstd => Some("zst"),
        }
    }
}

/// Readable file, optionally behind a decompressor.
pub enum InputStream {
    /// Plain file
    Plain(BufReader<File>),
    /// gzip-compressed file; concatenated members are read in sequence
    Gzip(BufReader<MultiGzDecoder<File>>),
    /// zstd-compressed file
    Zstd(BufReader<zstd::Decoder<'static, BufReader<File>>>),
}

impl InputStream {
    /// Open `path` with the given compression.
    pub fn open(path: &Path, compression: Compression) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(match compression {
            Compression::None => InputStream::Plain(BufReader::new(file)),
            Compression::Gzip => InputStream::Gzip(BufReader::new(MultiGzDecoder::new(file))),
            Compression::Zstd => InputStream::Zstd(BufReader::new(zstd::Decoder::new(file)?)),
        })
    }

    /// Compression layer of this stream
    pub fn compression(&self) -> Compression {
        match self {
            InputStream::Plain(_) => Compression::None,
            InputStream::Gzip(_) => Compression::Gzip,
            InputStream::Zstd(_) => Compression::Zstd,
        }
    }
}

impl std::fmt::Debug for InputStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputStream")
            .field("compression", &self.compression())
            .finish()
    }
}

impl Read for InputStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            InputStream::Plain(r) => r.read(buf),
            InputStream::Gzip(r) => r.read(buf),
            InputStream::Zstd(r) => r.read(buf),
        }
    }
}

impl StreamSource for InputStream {
    fn skip(&mut self, n: u64) -> io::Result<u64> {
        match self {
            InputStream::Plain(r) => seek_forward(r, n),
            InputStream::Gzip(r) => discard(r, n),
            InputStream::Zstd(r) => discard(r, n),
        }
    }

    fn is_seekable(&self) -> bool {
        matches!(self, InputStream::Plain(_))
    }

    fn close(self) -> io::Result<()> {
        // Read layers have no fallible release step: unwrapping each one
        // releases its decoder state, then the file handle is dropped last.
        match self {
            InputStream::Plain(r) => drop(r.into_inner()),
            InputStream::Gzip(r) => drop(r.into_inner().into_inner()),
            InputStream::Zstd(r) => drop(r.into_inner().finish().into_inner()),
        }
        debug!("Closed input stream");
        Ok(())
    }
}

/// Writable file, optionally behind a compressor.
pub enum OutputStream {
    /// Plain file
    Plain(BufWriter<File>),
    /// gzip-compressed file
    Gzip(GzEncoder<BufWriter<File>>),
    /// zstd-compressed file
    Zstd(zstd::Encoder<'static, BufWriter<File>>),
}

impl OutputStream {
    /// Create (or truncate) `path` with the given compression.
    pub fn create(path: &Path, config: &WriterConfig, compression: Compression) -> io::Result<Self> {
        let file = BufWriter::new(File::create(path)?);
        Ok(match compression {
            Compression::None => OutputStream::Plain(file),
            Compression::Gzip => OutputStream::Gzip(GzEncoder::new(
                file,
                flate2::Compression::new(config.gzip_level),
            )),
            Compression::Zstd => OutputStream::Zstd(zstd::Encoder::new(file, config.zstd_level)?),
        })
    }

    /// Compression layer of this stream
    pub fn compression(&self) -> Compression {
        match self {
            OutputStream::Plain(_) => Compression::None,
            OutputStream::Gzip(_) => Compression::Gzip,
            OutputStream::Zstd(_) => Compression::Zstd,
        }
    }
}

impl std::fmt::Debug for OutputStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputStream")
            .field("compression", &self.compression())
            .finish()
    }
}

impl Write for OutputStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputStream::Plain(w) => w.write(buf),
            OutputStream::Gzip(w) => w.write(buf),
            OutputStream::Zstd(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputStream::Plain(w) => w.flush(),
            OutputStream::Gzip(w) => w.flush(),
            OutputStream::Zstd(w) => w.flush(),
        }
    }
}

impl StreamSink for OutputStream {
    fn close(self) -> io::Result<()> {
        let compression = self.compression();
        let file = match self {
            OutputStream::Plain(w) => w,
            OutputStream::Gzip(w) => w.finish()?,
            OutputStream::Zstd(w) => w.finish()?,
        };
        file.close()?;
        debug!(?compression, "Closed output stream");
        Ok(())
    }
}

/// Open an event file for reading, inferring compression from its extension.
pub fn open(path: impl AsRef<Path>) -> Result<EventReader<InputStream>, OpenError> {
    open_with_config(path, ReaderConfig::default())
}

/// Open an event file for reading with explicit configuration.
pub fn open_with_config(
    path: impl AsRef<Path>,
    config: ReaderConfig,
) -> Result<EventReader<InputStream>, OpenError> {
    config.validate()?;
    let path = path.as_ref();
    let compression = config
        .compression
        .unwrap_or_else(|| Compression::from_path(path));

    let stream = InputStream::open(path, compression).map_err(|e| OpenError::io(path, e))?;
    debug!(path = %path.display(), ?compression, "Opened event file");
    Ok(EventReader::from_source(stream).with_config(config))
}

/// Create an event file for writing, inferring compression from its extension.
pub fn create(path: impl AsRef<Path>) -> Result<EventWriter<OutputStream>, OpenError> {
    create_with_config(path, WriterConfig::default())
}

/// Create an event file for writing with explicit configuration.
pub fn create_with_config(
    path: impl AsRef<Path>,
    config: WriterConfig,
) -> Result<EventWriter<OutputStream>, OpenError> {
    config.validate()?;
    let path = path.as_ref();
    let compression = config
        .compression
        .unwrap_or_else(|| Compression::from_path(path));

    let stream =
        OutputStream::create(path, &config, compression).map_err(|e| OpenError::io(path, e))?;
    debug!(path = %path.display(), ?compression, "Created event file");
    Ok(EventWriter::new(stream))
}
