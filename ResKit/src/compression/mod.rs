//! Segment compression for LSF documents
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2015 Norbyte (`LSLib`, MIT)
//!
//! SPDX-License-Identifier: MIT

use crate::error::{Error, Result};
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use lz4_flex::frame::{FrameDecoder, FrameEncoder};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Compression method stored in the low nibble of the flags byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionMethod {
    None,
    Zlib,
    Lz4,
}

/// Compression level stored in the high nibble of the flags byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionLevel {
    Fast,
    Default,
    Max,
}

const LEVEL_FAST: u8 = 0x10;
const LEVEL_DEFAULT: u8 = 0x20;
const LEVEL_MAX: u8 = 0x40;

impl CompressionMethod {
    /// Parse compression method from the flags byte
    #[must_use]
    pub fn from_flags(flags: u8) -> Option<Self> {
        match flags & 0x0F {
            0 => Some(CompressionMethod::None),
            1 => Some(CompressionMethod::Zlib),
            2 => Some(CompressionMethod::Lz4),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionMethod::None => "none",
            CompressionMethod::Zlib => "zlib",
            CompressionMethod::Lz4 => "lz4",
        }
    }
}

impl CompressionLevel {
    #[must_use]
    pub fn from_flags(flags: u8) -> Self {
        match flags & 0xF0 {
            LEVEL_FAST => CompressionLevel::Fast,
            LEVEL_MAX => CompressionLevel::Max,
            _ => CompressionLevel::Default,
        }
    }

    fn zlib(self) -> Compression {
        match self {
            CompressionLevel::Fast => Compression::fast(),
            CompressionLevel::Default => Compression::default(),
            CompressionLevel::Max => Compression::best(),
        }
    }
}

/// Pack method and level into the flags byte written to LSF metadata
#[must_use]
pub fn make_compression_flags(method: CompressionMethod, level: CompressionLevel) -> u8 {
    let method_bits = match method {
        CompressionMethod::None => return 0,
        CompressionMethod::Zlib => 1,
        CompressionMethod::Lz4 => 2,
    };
    let level_bits = match level {
        CompressionLevel::Fast => LEVEL_FAST,
        CompressionLevel::Default => LEVEL_DEFAULT,
        CompressionLevel::Max => LEVEL_MAX,
    };
    method_bits | level_bits
}

/// Compress a segment.
///
/// `chunked` selects the LZ4 frame format instead of a single LZ4 block;
/// it has no effect on Zlib.
///
/// # Errors
/// Returns an error if the encoder fails.
pub fn compress(
    data: &[u8],
    method: CompressionMethod,
    level: CompressionLevel,
    chunked: bool,
) -> Result<Vec<u8>> {
    match method {
        CompressionMethod::None => Ok(data.to_vec()),
        CompressionMethod::Lz4 if chunked => {
            let mut encoder = FrameEncoder::new(Vec::new());
            encoder.write_all(data)?;
            encoder
                .finish()
                .map_err(|e| Error::CompressionError(format!("LZ4 frame: {e}")))
        }
        CompressionMethod::Lz4 => Ok(lz4_flex::block::compress(data)),
        CompressionMethod::Zlib => {
            let mut encoder = ZlibEncoder::new(Vec::new(), level.zlib());
            encoder.write_all(data)?;
            encoder
                .finish()
                .map_err(|e| Error::CompressionError(format!("Zlib: {e}")))
        }
    }
}

/// Upper bound on buffer space reserved from a header-declared size.
const MAX_PREALLOCATION: usize = 16 * 1024 * 1024;

/// Decompress a segment and check it against the size recorded in the header.
///
/// Decoding stops one byte past `uncompressed_size`, so a corrupt or hostile
/// stream cannot inflate further than the header allows.
///
/// # Errors
/// Returns [`Error::DecompressionError`] if the payload is corrupt or does
/// not inflate to `uncompressed_size` bytes.
pub fn decompress(
    data: &[u8],
    method: CompressionMethod,
    uncompressed_size: usize,
    chunked: bool,
) -> Result<Vec<u8>> {
    let decompressed = match method {
        CompressionMethod::None => data.to_vec(),
        CompressionMethod::Lz4 => decompress_lz4(data, uncompressed_size, chunked)?,
        CompressionMethod::Zlib => read_bounded(ZlibDecoder::new(data), uncompressed_size)
            .map_err(|e| Error::DecompressionError(format!("Zlib: {e}")))?,
    };

    if decompressed.len() != uncompressed_size {
        return Err(Error::DecompressionError(format!(
            "{} segment inflated to {}{} bytes, expected {uncompressed_size}",
            method.as_str(),
            if decompressed.len() > uncompressed_size { "more than " } else { "" },
            decompressed.len().min(uncompressed_size)
        )));
    }
    Ok(decompressed)
}

/// Read at most `limit + 1` bytes from `reader`.
fn read_bounded<R: Read>(reader: R, limit: usize) -> std::io::Result<Vec<u8>> {
    let mut decompressed = Vec::with_capacity(limit.min(MAX_PREALLOCATION));
    reader
        .take((limit as u64).saturating_add(1))
        .read_to_end(&mut decompressed)?;
    Ok(decompressed)
}

fn decompress_lz4(data: &[u8], uncompressed_size: usize, chunked: bool) -> Result<Vec<u8>> {
    if chunked {
        if let Ok(decompressed) = read_bounded(FrameDecoder::new(data), uncompressed_size) {
            return Ok(decompressed);
        }
        tracing::debug!("LZ4 frame decode failed, retrying as a single block");
    }

    lz4_flex::block::decompress(data, uncompressed_size)
        .map_err(|e| Error::DecompressionError(format!("LZ4: {e}")))
}
