//! LSF reading
//!
//! Based on `LSLib`'s `LSFReader.cs` implementation.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2015 Norbyte (`LSLib`, MIT), 2023 saghm (xiba, Apache-2.0)
//!
//! SPDX-License-Identifier: MIT AND Apache-2.0

// Binary format parsing requires many intentional casts between integer types
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use super::document::{
    LSF_MAGIC, LsfAttribute, LsfDocument, LsfHeader, LsfMetadataFormat, LsfNode, SegmentSize,
    localization_layout, optional_index, unpack_type_and_length,
};
use super::string_table::StringTable;
use crate::compression::{CompressionMethod, decompress};
use crate::config::LsfVersion;
use crate::error::{Error, Result};
use crate::formats::common::value::read_bytes;
use crate::formats::common::{ValueFraming, read_value};
use crate::resource::{AttributeType, Metadata, Node, Resource, check_node_depth};
use byteorder::{LittleEndian, ReadBytesExt};
use std::collections::HashMap;
use std::io::{Cursor, Read};

/// Read an LSF resource from a stream.
///
/// # Errors
/// Returns an error if the stream cannot be read or is not valid LSF.
pub fn read_lsf<R: Read>(reader: &mut R) -> Result<Resource> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    parse_lsf_bytes(&data)
}

/// Parse LSF data into a resource tree.
///
/// # Errors
/// Returns an error if the data has an invalid LSF format.
pub fn parse_lsf_bytes(data: &[u8]) -> Result<Resource> {
    parse_lsf_document(data)?.to_resource()
}

fn header_len(version: LsfVersion) -> usize {
    let engine = if version >= LsfVersion::Bg3ExtendedHeader { 8 } else { 4 };
    let blob = if version >= LsfVersion::Bg3AdditionalBlob { 8 } else { 0 };
    8 + engine + 4 * 8 + blob + 8
}

fn read_segment_size(cursor: &mut Cursor<&[u8]>) -> Result<SegmentSize> {
    Ok(SegmentSize {
        uncompressed: cursor.read_u32::<LittleEndian>()?,
        on_disk: cursor.read_u32::<LittleEndian>()?,
    })
}

/// Decode the header and all four segments without building a tree.
///
/// # Errors
/// Returns [`Error::MalformedHeader`] for a bad magic,
/// [`Error::UnsupportedVersion`] outside versions 1-6, and decompression or
/// record errors for corrupt segments.
pub fn parse_lsf_document(data: &[u8]) -> Result<LsfDocument> {
    if data.len() < 8 {
        return Err(Error::malformed(format!("{} bytes is too short for LSF", data.len())));
    }
    let mut cursor = Cursor::new(data);

    let mut magic = [0u8; 4];
    cursor.read_exact(&mut magic)?;
    if magic != LSF_MAGIC {
        return Err(Error::malformed(format!("invalid LSF magic {magic:?}")));
    }

    let version = LsfVersion::from_u32(cursor.read_u32::<LittleEndian>()?)?;
    if data.len() < header_len(version) {
        return Err(Error::malformed(format!(
            "{} bytes is too short for an LSF v{} header",
            data.len(),
            version.as_u32()
        )));
    }

    let engine = if version >= LsfVersion::Bg3ExtendedHeader {
        Metadata::unpack_v64(cursor.read_i64::<LittleEndian>()? as u64)
    } else {
        Metadata::unpack_v32(cursor.read_i32::<LittleEndian>()? as u32)
    };

    let strings = read_segment_size(&mut cursor)?;
    if version >= LsfVersion::Bg3AdditionalBlob {
        let blob = cursor.read_u64::<LittleEndian>()?;
        if blob != 0 {
            tracing::debug!("Ignoring LSF metadata blob {blob:#018x}");
        }
    }
    let nodes = read_segment_size(&mut cursor)?;
    let attributes = read_segment_size(&mut cursor)?;
    let values = read_segment_size(&mut cursor)?;

    let compression_flags = cursor.read_u8()?;
    let _unknown2 = cursor.read_u8()?;
    let _unknown3 = cursor.read_u16::<LittleEndian>()?;
    let metadata_format = LsfMetadataFormat::from(cursor.read_u32::<LittleEndian>()?);

    let header = LsfHeader {
        version,
        engine,
        strings,
        nodes,
        attributes,
        values,
        compression_flags,
        metadata_format,
    };
    let method = header.compression()?;
    let extended = header.has_sibling_data();
    // Nodes and attributes switched to frame compression in v2
    let chunked = version >= LsfVersion::ChunkedCompress;

    tracing::debug!(
        "LSF v{}, engine {}, compression {}, sibling data {extended}",
        version.as_u32(),
        engine.version_string(),
        method.as_str()
    );

    let strings_data = read_segment(&mut cursor, strings, method, false)?;
    let nodes_data = read_segment(&mut cursor, nodes, method, chunked)?;
    let attributes_data = read_segment(&mut cursor, attributes, method, chunked)?;
    let values_data = read_segment(&mut cursor, values, method, false)?;

    let names = StringTable::from_bytes(&strings_data)?;
    let nodes = parse_nodes(&nodes_data, extended)?;
    let attributes = parse_attributes(&attributes_data, extended)?;

    tracing::debug!(
        "LSF segments: {} names, {} nodes, {} attributes, {} value bytes",
        names.len(),
        nodes.len(),
        attributes.len(),
        values_data.len()
    );

    Ok(LsfDocument {
        header,
        names,
        nodes,
        attributes,
        values: values_data,
    })
}

fn read_segment(
    cursor: &mut Cursor<&[u8]>,
    size: SegmentSize,
    method: CompressionMethod,
    chunked: bool,
) -> Result<Vec<u8>> {
    let uncompressed = size.uncompressed as usize;
    if size.on_disk == 0 {
        return read_bytes(cursor, uncompressed);
    }
    let raw = read_bytes(cursor, size.on_disk as usize)?;
    decompress(&raw, method, uncompressed, chunked)
}

fn record_count(data: &[u8], record_size: usize, what: &str) -> Result<usize> {
    if data.len() % record_size != 0 {
        return Err(Error::malformed(format!(
            "{what} segment of {} bytes is not a multiple of {record_size}",
            data.len()
        )));
    }
    Ok(data.len() / record_size)
}

fn parse_nodes(data: &[u8], extended: bool) -> Result<Vec<LsfNode>> {
    let count = record_count(data, if extended { 16 } else { 12 }, "node")?;
    let mut cursor = Cursor::new(data);
    let mut nodes = Vec::with_capacity(count);

    for index in 0..count {
        let name = cursor.read_u32::<LittleEndian>()?;
        let node = if extended {
            let parent = cursor.read_i32::<LittleEndian>()?;
            let next_sibling = cursor.read_i32::<LittleEndian>()?;
            let first_attribute = cursor.read_i32::<LittleEndian>()?;
            LsfNode {
                name,
                parent: optional_index(parent),
                next_sibling: optional_index(next_sibling),
                first_attribute: optional_index(first_attribute),
            }
        } else {
            let first_attribute = cursor.read_i32::<LittleEndian>()?;
            let parent = cursor.read_i32::<LittleEndian>()?;
            LsfNode {
                name,
                parent: optional_index(parent),
                next_sibling: None,
                first_attribute: optional_index(first_attribute),
            }
        };

        // Parents always precede their children
        if let Some(parent) = node.parent.filter(|&parent| parent >= index) {
            return Err(Error::structure(format!(
                "node {index} has parent {parent}, which does not precede it"
            )));
        }
        nodes.push(node);
    }

    Ok(nodes)
}

fn parse_attributes(data: &[u8], extended: bool) -> Result<Vec<LsfAttribute>> {
    let count = record_count(data, if extended { 16 } else { 12 }, "attribute")?;
    let mut cursor = Cursor::new(data);
    let mut attributes = Vec::with_capacity(count);

    if extended {
        for _ in 0..count {
            let name = cursor.read_u32::<LittleEndian>()?;
            let (type_id, length) = unpack_type_and_length(cursor.read_u32::<LittleEndian>()?);
            let next_attribute = optional_index(cursor.read_i32::<LittleEndian>()?);
            let offset = cursor.read_u32::<LittleEndian>()? as usize;
            attributes.push(LsfAttribute {
                name,
                type_id,
                length,
                next_attribute,
                offset,
            });
        }
        return Ok(attributes);
    }

    // Old shape: values are packed in record order and attributes of one
    // node are chained by their shared owner index.
    let mut last_of_node: HashMap<i32, usize> = HashMap::new();
    let mut offset = 0usize;
    for index in 0..count {
        let name = cursor.read_u32::<LittleEndian>()?;
        let (type_id, length) = unpack_type_and_length(cursor.read_u32::<LittleEndian>()?);
        let owner = cursor.read_i32::<LittleEndian>()?;

        if let Some(previous) = last_of_node.insert(owner, index) {
            attributes[previous].next_attribute = Some(index);
        }
        attributes.push(LsfAttribute {
            name,
            type_id,
            length,
            next_attribute: None,
            offset,
        });
        offset += length;
    }

    Ok(attributes)
}

impl LsfDocument {
    /// Materialize the resource tree.
    ///
    /// Each root node becomes a region named after it.
    ///
    /// # Errors
    /// Returns an error for unresolved names, broken attribute chains or
    /// undecodable values.
    pub fn to_resource(&self) -> Result<Resource> {
        let layout = localization_layout(self.header.version);

        let mut metadata = self.header.engine;
        if metadata.major_version == 0 {
            tracing::warn!("LSF engine version is zero, reporting 4.0.9.0");
            metadata = Metadata::new(4, 0, 9, 0);
        }

        let count = self.nodes.len();
        let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); count];
        let mut depths: Vec<usize> = vec![0; count];
        let mut roots = Vec::new();
        for (index, node) in self.nodes.iter().enumerate() {
            match node.parent {
                Some(parent) if parent < index => {
                    depths[index] = depths[parent] + 1;
                    check_node_depth(depths[index])?;
                    children_of[parent].push(index);
                }
                Some(parent) => {
                    return Err(Error::structure(format!(
                        "node {index} has parent {parent}, which does not precede it"
                    )));
                }
                None => roots.push(index),
            }
        }

        // Children always follow their parent, so building back to front
        // finishes every child before its parent needs it.
        let mut slots: Vec<Option<Node>> = vec![None; count];
        for index in (0..count).rev() {
            let mut node = Node::new(self.name(self.nodes[index].name)?);
            for attribute_index in self.attributes_of(index)? {
                let attribute = &self.attributes[attribute_index];
                let ty = AttributeType::from_id(attribute.type_id)?;
                let mut cursor = Cursor::new(self.value_bytes(attribute)?);
                let value = read_value(&mut cursor, ty, ValueFraming::Record, layout)?;
                node.set_attribute(self.name(attribute.name)?, value);
            }
            for &child in &children_of[index] {
                if let Some(child) = slots[child].take() {
                    node.append_child(child);
                }
            }
            slots[index] = Some(node);
        }

        let mut resource = Resource::new(metadata);
        for root in roots {
            if let Some(node) = slots[root].take() {
                resource.add_region(node.name.clone(), node)?;
            }
        }
        Ok(resource)
    }
}
