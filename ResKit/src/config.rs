//! Version policy and write options
//!
//! Which header shape, node layout and translated-string layout a codec
//! uses is decided by the caller through these types. [`Game`] maps a
//! title to the versions its engine expects.

use crate::compression::{CompressionLevel, CompressionMethod};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Games whose resource formats are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Game {
    DivinityOriginalSin,
    DivinityOriginalSinEE,
    DivinityOriginalSin2,
    DivinityOriginalSin2DE,
    BaldursGate3,
}

impl Game {
    #[must_use]
    pub fn lsf_version(self) -> LsfVersion {
        match self {
            Game::DivinityOriginalSin | Game::DivinityOriginalSinEE => LsfVersion::ChunkedCompress,
            Game::DivinityOriginalSin2 | Game::DivinityOriginalSin2DE => LsfVersion::ExtendedNodes,
            Game::BaldursGate3 => LsfVersion::Bg3AdditionalBlob,
        }
    }

    #[must_use]
    pub fn lsx_version(self) -> LsxVersion {
        match self {
            Game::BaldursGate3 => LsxVersion::V4,
            _ => LsxVersion::V3,
        }
    }

    #[must_use]
    pub fn lsb_family(self) -> LsbFamily {
        match self {
            Game::BaldursGate3 => LsbFamily::Bg3,
            _ => LsbFamily::Legacy,
        }
    }

    /// Version of the package container the game ships its resources in.
    #[must_use]
    pub fn package_version(self) -> u32 {
        match self {
            Game::DivinityOriginalSin => 7,
            Game::DivinityOriginalSinEE => 9,
            Game::DivinityOriginalSin2 => 10,
            Game::DivinityOriginalSin2DE => 13,
            Game::BaldursGate3 => 18,
        }
    }
}

/// LSF format versions, in release order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u32)]
pub enum LsfVersion {
    /// Initial format
    Initial = 1,
    /// Nodes/attributes segments use chunked (frame) compression
    ChunkedCompress = 2,
    /// 16-byte node and attribute records with sibling and attribute chains
    ExtendedNodes = 3,
    /// Translated strings store a version instead of their literal
    Bg3 = 4,
    /// 64-bit packed engine version in the header
    Bg3ExtendedHeader = 5,
    /// Extra 8-byte blob in the segment metadata
    Bg3AdditionalBlob = 6,
}

impl LsfVersion {
    pub const MAX: LsfVersion = LsfVersion::Bg3AdditionalBlob;

    /// # Errors
    /// Returns [`Error::UnsupportedVersion`] outside `1..=6`.
    pub fn from_u32(version: u32) -> Result<Self> {
        Ok(match version {
            1 => LsfVersion::Initial,
            2 => LsfVersion::ChunkedCompress,
            3 => LsfVersion::ExtendedNodes,
            4 => LsfVersion::Bg3,
            5 => LsfVersion::Bg3ExtendedHeader,
            6 => LsfVersion::Bg3AdditionalBlob,
            _ => {
                return Err(Error::UnsupportedVersion {
                    format: "LSF",
                    version,
                });
            }
        })
    }

    #[must_use]
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// LSX document versions. Below V4 attribute types are written as numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LsxVersion {
    V3 = 3,
    V4 = 4,
}

/// LSB engine family, selected by the header signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LsbFamily {
    /// Divinity titles, signature `0x40000000`
    Legacy,
    /// Baldur's Gate 3, signature `LSFM`
    Bg3,
}

/// Options for [`write_lsf`](crate::formats::lsf::write_lsf).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LsfWriteOptions {
    pub version: LsfVersion,
    pub compression: CompressionMethod,
    pub level: CompressionLevel,
    /// Emit 16-byte records with `NextSiblingIndex` (needs `ExtendedNodes`+).
    pub encode_sibling_data: bool,
}

impl Default for LsfWriteOptions {
    fn default() -> Self {
        Self::for_game(Game::BaldursGate3)
    }
}

impl LsfWriteOptions {
    #[must_use]
    pub fn for_game(game: Game) -> Self {
        let version = game.lsf_version();
        LsfWriteOptions {
            version,
            compression: CompressionMethod::Lz4,
            level: CompressionLevel::Default,
            encode_sibling_data: version >= LsfVersion::ExtendedNodes,
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: LsfVersion) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn with_compression(mut self, compression: CompressionMethod) -> Self {
        self.compression = compression;
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: CompressionLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_sibling_data(mut self, encode: bool) -> Self {
        self.encode_sibling_data = encode;
        self
    }
}

/// Options for [`write_lsb`](crate::formats::lsb::write_lsb).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LsbWriteOptions {
    pub family: LsbFamily,
}

impl Default for LsbWriteOptions {
    fn default() -> Self {
        Self::for_game(Game::BaldursGate3)
    }
}

impl LsbWriteOptions {
    #[must_use]
    pub fn for_game(game: Game) -> Self {
        LsbWriteOptions {
            family: game.lsb_family(),
        }
    }

    #[must_use]
    pub fn with_family(mut self, family: LsbFamily) -> Self {
        self.family = family;
        self
    }
}

/// Options for [`write_lsx`](crate::formats::lsx::write_lsx).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LsxWriteOptions {
    pub version: LsxVersion,
    /// Indent with tabs, one element per line.
    pub pretty_print: bool,
}

impl Default for LsxWriteOptions {
    fn default() -> Self {
        Self::for_game(Game::BaldursGate3)
    }
}

impl LsxWriteOptions {
    #[must_use]
    pub fn for_game(game: Game) -> Self {
        LsxWriteOptions {
            version: game.lsx_version(),
            pretty_print: true,
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: LsxVersion) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn with_pretty_print(mut self, pretty_print: bool) -> Self {
        self.pretty_print = pretty_print;
        self
    }
}

/// Everything a conversion needs, loadable from JSON.
///
/// ```
/// use reskit::config::{ConversionOptions, LsfVersion};
///
/// let options = ConversionOptions::from_json_str(
///     r#"{ "lsf": { "version": "ExtendedNodes", "encode_sibling_data": false } }"#,
/// )?;
/// assert_eq!(options.lsf.version, LsfVersion::ExtendedNodes);
/// # Ok::<(), reskit::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    pub lsb: LsbWriteOptions,
    pub lsf: LsfWriteOptions,
    pub lsx: LsxWriteOptions,
}

impl ConversionOptions {
    #[must_use]
    pub fn for_game(game: Game) -> Self {
        ConversionOptions {
            lsb: LsbWriteOptions::for_game(game),
            lsf: LsfWriteOptions::for_game(game),
            lsx: LsxWriteOptions::for_game(game),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_policy() {
        let bg3 = ConversionOptions::for_game(Game::BaldursGate3);
        assert_eq!(bg3.lsf.version, LsfVersion::Bg3AdditionalBlob);
        assert!(bg3.lsf.encode_sibling_data);
        assert_eq!(bg3.lsx.version, LsxVersion::V4);
        assert_eq!(bg3.lsb.family, LsbFamily::Bg3);

        let dos = ConversionOptions::for_game(Game::DivinityOriginalSin);
        assert_eq!(dos.lsf.version, LsfVersion::ChunkedCompress);
        assert!(!dos.lsf.encode_sibling_data);
        assert_eq!(dos.lsx.version, LsxVersion::V3);
        assert_eq!(dos.lsb.family, LsbFamily::Legacy);
    }

    #[test]
    fn test_lsf_version_bounds() {
        assert_eq!(LsfVersion::from_u32(3).unwrap(), LsfVersion::ExtendedNodes);
        assert!(matches!(
            LsfVersion::from_u32(7),
            Err(Error::UnsupportedVersion { format: "LSF", version: 7 })
        ));
        assert!(LsfVersion::from_u32(0).is_err());
    }

    #[test]
    fn test_options_from_json() {
        let options = ConversionOptions::from_json_str(
            r#"{ "lsf": { "compression": "Zlib", "level": "Max" }, "lsx": { "pretty_print": false } }"#,
        )
        .unwrap();
        assert_eq!(options.lsf.compression, CompressionMethod::Zlib);
        assert_eq!(options.lsf.level, CompressionLevel::Max);
        assert_eq!(options.lsf.version, LsfVersion::Bg3AdditionalBlob);
        assert!(!options.lsx.pretty_print);
        assert_eq!(options.lsx.version, LsxVersion::V4);
    }
}
