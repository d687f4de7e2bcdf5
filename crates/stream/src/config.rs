//! Reader and writer configuration
//!
//! Limits on frame sizes, and compression settings for file-backed streams.

use crate::error::ConfigError;
use crate::file::Compression;

/// Default largest accepted header block (16 MiB)
pub const DEFAULT_MAX_HEADER_LEN: u32 = 16 * 1024 * 1024;

/// Default largest accepted payload (1 GiB)
pub const DEFAULT_MAX_PAYLOAD_LEN: u64 = 1024 * 1024 * 1024;

/// Reader configuration
///
/// A frame whose declared header or payload exceeds a limit is reported as
/// truncated; nothing is allocated for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Largest header block accepted (default: 16 MiB)
    pub max_header_len: u32,
    /// Largest total payload accepted (default: 1 GiB)
    pub max_payload_len: u64,
    /// Compression of opened files (`None`: infer from extension)
    pub compression: Option<Compression>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            max_header_len: DEFAULT_MAX_HEADER_LEN,
            max_payload_len: DEFAULT_MAX_PAYLOAD_LEN,
            compression: None,
        }
    }
}

impl ReaderConfig {
    /// Set the header size limit
    pub fn with_max_header_len(mut self, len: u32) -> Self {
        self.max_header_len = len;
        self
    }

    /// Set the payload size limit
    pub fn with_max_payload_len(mut self, len: u64) -> Self {
        self.max_payload_len = len;
        self
    }

    /// Force a compression layer instead of inferring it from the path
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = Some(compression);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_header_len == 0 {
            return Err(ConfigError::ZeroLimit {
                name: "max_header_len",
            });
        }
        if self.max_payload_len == 0 {
            return Err(ConfigError::ZeroLimit {
                name: "max_payload_len",
            });
        }
        Ok(())
    }
}

/// Writer configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterConfig {
    /// Compression of created files (`None`: infer from extension)
    pub compression: Option<Compression>,
    /// gzip level, 0..=9 (default: 6)
    pub gzip_level: u32,
    /// zstd level, 1..=22 (default: 3)
    pub zstd_level: i32,
}

impl Default for WriterConfig {
    fn default() -> Self {
        WriterConfig {
            compression: None,
            gzip_level: 6,
            zstd_level: 3,
        }
    }
}

impl WriterConfig {
    /// Force a compression layer instead of inferring it from the path
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = Some(compression);
        self
    }

    /// Set the gzip level
    pub fn with_gzip_level(mut self, level: u32) -> Self {
        self.gzip_level = level;
        self
    }

    /// Set the zstd level
    pub fn with_zstd_level(mut self, level: i32) -> Self {
        self.zstd_level = level;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gzip_level > 9 {
            return Err(ConfigError::InvalidLevel {
                codec: "gzip",
                level: self.gzip_level as i32,
                min: 0,
                max: 9,
            });
        }
        if !(1..=22).contains(&self.zstd_level) {
            return Err(ConfigError::InvalidLevel {
                codec: "zstd",
                level: self.zstd_level,
                min: 1,
                max: 22,
            });
        }
        Ok(())
    }
}
