//! Raw LSF document: the decoded segments before tree materialization
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2015 Norbyte (`LSLib`, MIT)
//!
//! SPDX-License-Identifier: MIT

#![allow(clippy::cast_possible_truncation)]

use super::string_table::StringTable;
use crate::compression::CompressionMethod;
use crate::config::LsfVersion;
use crate::error::{Error, Result};
use crate::formats::common::LocalizationLayout;
use crate::resource::{AttributeType, Metadata};

pub const LSF_MAGIC: [u8; 4] = *b"LSOF";

/// Sentinel for "no index" in node and attribute records.
pub(crate) const NO_INDEX: i32 = -1;

/// Record layout selector stored in the segment metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LsfMetadataFormat {
    None,
    KeysAndAdjacency,
    None2,
}

impl From<u32> for LsfMetadataFormat {
    fn from(value: u32) -> Self {
        match value {
            1 => LsfMetadataFormat::KeysAndAdjacency,
            2 => LsfMetadataFormat::None2,
            _ => LsfMetadataFormat::None,
        }
    }
}

impl LsfMetadataFormat {
    #[must_use]
    pub fn as_u32(self) -> u32 {
        match self {
            LsfMetadataFormat::None => 0,
            LsfMetadataFormat::KeysAndAdjacency => 1,
            LsfMetadataFormat::None2 => 2,
        }
    }
}

/// Uncompressed and on-disk size of one segment. On-disk 0 means stored raw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentSize {
    pub uncompressed: u32,
    pub on_disk: u32,
}

/// Header fields following magic and version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LsfHeader {
    pub version: LsfVersion,
    pub engine: Metadata,
    pub strings: SegmentSize,
    pub nodes: SegmentSize,
    pub attributes: SegmentSize,
    pub values: SegmentSize,
    pub compression_flags: u8,
    pub metadata_format: LsfMetadataFormat,
}

impl LsfHeader {
    /// Whether node and attribute records use the 16-byte sibling-chain shape.
    #[must_use]
    pub fn has_sibling_data(&self) -> bool {
        has_sibling_records(self.version, self.metadata_format)
    }

    /// Compression method from the flags byte.
    ///
    /// # Errors
    /// Returns [`Error::MalformedHeader`] for an unknown method nibble.
    pub fn compression(&self) -> Result<CompressionMethod> {
        CompressionMethod::from_flags(self.compression_flags).ok_or_else(|| {
            Error::malformed(format!(
                "unknown compression flags {:#04x}",
                self.compression_flags
            ))
        })
    }
}

pub(crate) fn has_sibling_records(version: LsfVersion, format: LsfMetadataFormat) -> bool {
    version >= LsfVersion::ExtendedNodes && format == LsfMetadataFormat::KeysAndAdjacency
}

pub(crate) fn localization_layout(version: LsfVersion) -> LocalizationLayout {
    if version >= LsfVersion::Bg3 {
        LocalizationLayout::Late
    } else {
        LocalizationLayout::Inline
    }
}

/// Pack type id and value length into the attribute record field.
///
/// # Errors
/// Returns [`Error::ValueTooLarge`] if `length` needs more than 26 bits.
pub fn pack_type_and_length(ty: AttributeType, length: usize) -> Result<u32> {
    if length >= 1 << 26 {
        return Err(Error::ValueTooLarge { length });
    }
    Ok(ty.id() | ((length as u32) << 6))
}

/// Split the attribute record field into `(type id, length)`.
#[must_use]
pub fn unpack_type_and_length(packed: u32) -> (u32, usize) {
    (packed & 0x3F, (packed >> 6) as usize)
}

/// One node record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LsfNode {
    pub name: u32,
    pub parent: Option<usize>,
    /// Only present in sibling-chain documents.
    pub next_sibling: Option<usize>,
    pub first_attribute: Option<usize>,
}

/// One attribute record, normalized to the chained shape.
///
/// Old-shape records store an owning node instead of a chain; the reader
/// links consecutive attributes of the same node and accumulates offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LsfAttribute {
    pub name: u32,
    pub type_id: u32,
    pub length: usize,
    pub next_attribute: Option<usize>,
    pub offset: usize,
}

/// Fully decoded, decompressed LSF content.
#[derive(Debug, Clone)]
pub struct LsfDocument {
    pub header: LsfHeader,
    pub names: StringTable,
    pub nodes: Vec<LsfNode>,
    pub attributes: Vec<LsfAttribute>,
    pub values: Vec<u8>,
}

impl LsfDocument {
    /// Resolve a name id.
    ///
    /// # Errors
    /// Returns [`Error::UnresolvedStringId`] for an unknown id.
    pub fn name(&self, id: u32) -> Result<&str> {
        self.names.resolve(id)
    }

    /// Indices of the root nodes (one per region), in record order.
    #[must_use]
    pub fn roots(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Children of `parent` by scanning parent indices, in record order.
    #[must_use]
    pub fn children_by_parent(&self, parent: usize) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.parent == Some(parent))
            .map(|(i, _)| i)
            .collect()
    }

    /// Children of `parent` by following the `next_sibling` chain from its
    /// first child.
    ///
    /// Returns `None` when the document carries no sibling data or the chain
    /// loops.
    #[must_use]
    pub fn children_via_siblings(&self, parent: usize) -> Option<Vec<usize>> {
        if !self.header.has_sibling_data() {
            return None;
        }
        let Some(first) = self.nodes.iter().position(|node| node.parent == Some(parent)) else {
            return Some(Vec::new());
        };

        let mut children = vec![first];
        let mut current = first;
        while let Some(next) = self.nodes.get(current).and_then(|node| node.next_sibling) {
            if children.len() > self.nodes.len() {
                return None;
            }
            children.push(next);
            current = next;
        }
        Some(children)
    }

    /// Attribute indices of `node`, following the attribute chain.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDocumentStructure`] if the chain leaves the
    /// attribute table or revisits an attribute.
    pub fn attributes_of(&self, node: usize) -> Result<Vec<usize>> {
        let mut indices = Vec::new();
        let mut next = self.nodes.get(node).and_then(|n| n.first_attribute);
        while let Some(index) = next {
            if indices.len() >= self.attributes.len() {
                return Err(Error::structure(format!(
                    "attribute chain of node {node} loops"
                )));
            }
            let attribute = self.attributes.get(index).ok_or_else(|| {
                Error::structure(format!("node {node} references missing attribute {index}"))
            })?;
            indices.push(index);
            next = attribute.next_attribute;
        }
        Ok(indices)
    }

    /// Value bytes of one attribute.
    ///
    /// # Errors
    /// Returns [`Error::TruncatedData`] if the value runs past the segment.
    pub fn value_bytes(&self, attribute: &LsfAttribute) -> Result<&[u8]> {
        let end = attribute.offset.saturating_add(attribute.length);
        self.values
            .get(attribute.offset..end)
            .ok_or(Error::TruncatedData {
                needed: end,
                remaining: self.values.len(),
            })
    }
}

pub(crate) fn optional_index(raw: i32) -> Option<usize> {
    usize::try_from(raw).ok()
}

pub(crate) fn raw_index(index: Option<usize>) -> Result<i32> {
    match index {
        None => Ok(NO_INDEX),
        Some(i) => i32::try_from(i).map_err(|_| Error::ValueTooLarge { length: i }),
    }
}
