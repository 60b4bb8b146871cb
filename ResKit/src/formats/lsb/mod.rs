//! LSB binary resource format
//!
//! A 40-byte header, a global string table and a region directory pointing
//! at depth-first node records. Attribute values carry their own length
//! prefixes.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2015 Norbyte (`LSLib`, MIT)
//!
//! SPDX-License-Identifier: MIT

mod reader;
mod writer;

pub use reader::{parse_lsb_bytes, read_lsb};
pub use writer::{serialize_lsb, write_lsb};

use crate::config::LsbFamily;
use crate::formats::common::LocalizationLayout;

/// Signature of Divinity-era LSB files.
pub const LSB_SIGNATURE_LEGACY: u32 = 0x4000_0000;
/// Signature of Baldur's Gate 3 LSB files (`LSFM`).
pub const LSB_SIGNATURE_BG3: u32 = u32::from_le_bytes(*b"LSFM");

pub(crate) const HEADER_SIZE: usize = 40;

impl LsbFamily {
    #[must_use]
    pub fn signature(self) -> u32 {
        match self {
            LsbFamily::Legacy => LSB_SIGNATURE_LEGACY,
            LsbFamily::Bg3 => LSB_SIGNATURE_BG3,
        }
    }

    #[must_use]
    pub fn from_signature(signature: u32) -> Option<Self> {
        match signature {
            LSB_SIGNATURE_LEGACY => Some(LsbFamily::Legacy),
            LSB_SIGNATURE_BG3 => Some(LsbFamily::Bg3),
            _ => None,
        }
    }

    pub(crate) fn localization_layout(self) -> LocalizationLayout {
        match self {
            LsbFamily::Legacy => LocalizationLayout::Inline,
            LsbFamily::Bg3 => LocalizationLayout::Sniffed,
        }
    }
}
