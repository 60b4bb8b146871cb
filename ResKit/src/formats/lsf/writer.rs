//! LSF writing
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2015 Norbyte (`LSLib`, MIT)
//!
//! SPDX-License-Identifier: MIT

#![allow(clippy::cast_possible_wrap)]

use super::document::{
    LSF_MAGIC, LsfAttribute, LsfDocument, LsfHeader, LsfMetadataFormat, LsfNode, SegmentSize,
    localization_layout, pack_type_and_length, raw_index,
};
use super::string_table::StringTable;
use crate::compression::{CompressionLevel, CompressionMethod, compress, make_compression_flags};
use crate::config::{LsfVersion, LsfWriteOptions};
use crate::error::{Error, Result};
use crate::formats::common::{ValueFraming, write_value};
use crate::resource::{AttributeType, Node, Resource, check_node_depth};
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

/// Write a resource to a stream as LSF.
///
/// # Errors
/// Returns an error if serialization fails or the stream cannot be written.
pub fn write_lsf<W: Write>(resource: &Resource, writer: &mut W, options: &LsfWriteOptions) -> Result<()> {
    let bytes = serialize_lsf(resource, options)?;
    writer.write_all(&bytes)?;
    Ok(())
}

/// Serialize a resource to LSF bytes.
///
/// # Errors
/// Returns an error if a name or value does not fit its field, or
/// compression fails.
pub fn serialize_lsf(resource: &Resource, options: &LsfWriteOptions) -> Result<Vec<u8>> {
    let document = build_document(resource, options)?;
    encode_document(&document, options.level)
}

/// Flatten a resource into LSF records without compressing anything.
///
/// Nodes are emitted depth first: a node record, its attribute records and
/// values, then its children. Names are interned in the same order.
///
/// # Errors
/// Returns an error if a name or value does not fit its field.
pub fn build_document(resource: &Resource, options: &LsfWriteOptions) -> Result<LsfDocument> {
    let version = options.version;
    let mut sibling_data = options.encode_sibling_data;
    if sibling_data && version < LsfVersion::ExtendedNodes {
        tracing::warn!(
            "LSF v{} cannot carry sibling data, writing parent-indexed records",
            version.as_u32()
        );
        sibling_data = false;
    }
    let layout = localization_layout(version);

    let mut names = StringTable::new();
    let mut nodes: Vec<LsfNode> = Vec::with_capacity(resource.node_count());
    let mut attributes: Vec<LsfAttribute> = Vec::new();
    let mut values = Vec::new();
    // Most recent child of each emitted node, for sibling chaining
    let mut last_child: Vec<Option<usize>> = Vec::with_capacity(nodes.capacity());

    for (region, root) in &resource.regions {
        if *region != root.name {
            tracing::warn!(
                "LSF stores no region names, region '{region}' will read back as '{}'",
                root.name
            );
        }
        let mut stack: Vec<(&Node, Option<usize>, usize)> = vec![(root, None, 0)];
        while let Some((node, parent, depth)) = stack.pop() {
            check_node_depth(depth)?;
            let index = nodes.len();
            let name = names.intern(&node.name)?;

            let first_attribute = (!node.attributes.is_empty()).then_some(attributes.len());
            let attribute_count = node.attributes.len();
            for (position, (attr_name, attr)) in node.attributes.iter().enumerate() {
                let name = names.intern(attr_name)?;
                let offset = values.len();
                let length = write_value(&mut values, attr, ValueFraming::Record, layout)?;
                // Validate the packed field now rather than at encode time
                pack_type_and_length(attr.type_id(), length)?;
                let next_attribute = (position + 1 < attribute_count).then_some(attributes.len() + 1);
                attributes.push(LsfAttribute {
                    name,
                    type_id: attr.type_id().id(),
                    length,
                    next_attribute,
                    offset,
                });
            }

            nodes.push(LsfNode {
                name,
                parent,
                next_sibling: None,
                first_attribute,
            });
            last_child.push(None);

            // Regions are never chained to one another
            if let Some(parent) = parent {
                if let Some(previous) = last_child[parent].filter(|_| sibling_data) {
                    nodes[previous].next_sibling = Some(index);
                }
                last_child[parent] = Some(index);
            }

            let children: Vec<&Node> = node.child_nodes().collect();
            stack.extend(children.into_iter().rev().map(|child| (child, Some(index), depth + 1)));
        }
    }

    let header = LsfHeader {
        version,
        engine: resource.metadata,
        strings: SegmentSize::default(),
        nodes: SegmentSize::default(),
        attributes: SegmentSize::default(),
        values: SegmentSize::default(),
        compression_flags: make_compression_flags(options.compression, options.level),
        metadata_format: if sibling_data {
            LsfMetadataFormat::KeysAndAdjacency
        } else {
            LsfMetadataFormat::None
        },
    };

    Ok(LsfDocument {
        header,
        names,
        nodes,
        attributes,
        values,
    })
}

fn encode_nodes(document: &LsfDocument, extended: bool) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(document.nodes.len() * 16);
    for node in &document.nodes {
        output.write_u32::<LittleEndian>(node.name)?;
        if extended {
            output.write_i32::<LittleEndian>(raw_index(node.parent)?)?;
            output.write_i32::<LittleEndian>(raw_index(node.next_sibling)?)?;
            output.write_i32::<LittleEndian>(raw_index(node.first_attribute)?)?;
        } else {
            output.write_i32::<LittleEndian>(raw_index(node.first_attribute)?)?;
            output.write_i32::<LittleEndian>(raw_index(node.parent)?)?;
        }
    }
    Ok(output)
}

fn encode_attributes(document: &LsfDocument, extended: bool) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(document.attributes.len() * 16);

    if extended {
        for attribute in &document.attributes {
            output.write_u32::<LittleEndian>(attribute.name)?;
            output.write_u32::<LittleEndian>(packed_field(attribute)?)?;
            output.write_i32::<LittleEndian>(raw_index(attribute.next_attribute)?)?;
            output.write_u32::<LittleEndian>(
                u32::try_from(attribute.offset).map_err(|_| Error::ValueTooLarge {
                    length: attribute.offset,
                })?,
            )?;
        }
        return Ok(output);
    }

    // Old shape records name their owner; offsets are implied by order
    let mut owners = vec![None; document.attributes.len()];
    for node in 0..document.nodes.len() {
        for attribute in document.attributes_of(node)? {
            owners[attribute] = Some(node);
        }
    }
    for (attribute, owner) in document.attributes.iter().zip(owners) {
        output.write_u32::<LittleEndian>(attribute.name)?;
        output.write_u32::<LittleEndian>(packed_field(attribute)?)?;
        output.write_i32::<LittleEndian>(raw_index(owner)?)?;
    }
    Ok(output)
}

fn packed_field(attribute: &LsfAttribute) -> Result<u32> {
    let ty = AttributeType::from_id(attribute.type_id)?;
    pack_type_and_length(ty, attribute.length)
}

struct EncodedSegment {
    size: SegmentSize,
    bytes: Vec<u8>,
}

fn encode_segment(
    data: Vec<u8>,
    method: CompressionMethod,
    level: CompressionLevel,
    chunked: bool,
) -> Result<EncodedSegment> {
    let uncompressed = u32::try_from(data.len()).map_err(|_| Error::ValueTooLarge { length: data.len() })?;
    if method == CompressionMethod::None || data.is_empty() {
        return Ok(EncodedSegment {
            size: SegmentSize {
                uncompressed,
                on_disk: 0,
            },
            bytes: data,
        });
    }

    let bytes = compress(&data, method, level, chunked)?;
    let on_disk = u32::try_from(bytes.len()).map_err(|_| Error::ValueTooLarge { length: bytes.len() })?;
    Ok(EncodedSegment {
        size: SegmentSize {
            uncompressed,
            on_disk,
        },
        bytes,
    })
}

fn write_segment_size(output: &mut Vec<u8>, size: SegmentSize) -> Result<()> {
    output.write_u32::<LittleEndian>(size.uncompressed)?;
    output.write_u32::<LittleEndian>(size.on_disk)?;
    Ok(())
}

/// Encode a document: header, then the compressed Strings, Nodes,
/// Attributes and Values segments.
///
/// The compression method comes from the header flags.
///
/// # Errors
/// Returns an error if a field overflows or compression fails.
pub fn encode_document(document: &LsfDocument, level: CompressionLevel) -> Result<Vec<u8>> {
    let header = &document.header;
    let version = header.version;
    let method = header.compression()?;
    let extended = header.has_sibling_data();
    let chunked = version >= LsfVersion::ChunkedCompress;

    let strings = encode_segment(document.names.to_bytes()?, method, level, false)?;
    let nodes = encode_segment(encode_nodes(document, extended)?, method, level, chunked)?;
    let attributes = encode_segment(encode_attributes(document, extended)?, method, level, chunked)?;
    let values = encode_segment(document.values.clone(), method, level, false)?;

    let mut output = Vec::new();
    output.extend_from_slice(&LSF_MAGIC);
    output.write_u32::<LittleEndian>(version.as_u32())?;
    if version >= LsfVersion::Bg3ExtendedHeader {
        output.write_i64::<LittleEndian>(header.engine.pack_v64() as i64)?;
    } else {
        output.write_i32::<LittleEndian>(header.engine.pack_v32() as i32)?;
    }

    write_segment_size(&mut output, strings.size)?;
    if version >= LsfVersion::Bg3AdditionalBlob {
        output.write_u64::<LittleEndian>(0)?;
    }
    write_segment_size(&mut output, nodes.size)?;
    write_segment_size(&mut output, attributes.size)?;
    write_segment_size(&mut output, values.size)?;
    output.write_u8(header.compression_flags)?;
    output.write_u8(0)?;
    output.write_u16::<LittleEndian>(0)?;
    output.write_u32::<LittleEndian>(header.metadata_format.as_u32())?;

    for segment in [&strings, &nodes, &attributes, &values] {
        output.extend_from_slice(&segment.bytes);
    }

    tracing::debug!(
        "LSF v{}: {} names, {} nodes, {} attributes, {} bytes ({})",
        version.as_u32(),
        document.names.len(),
        document.nodes.len(),
        document.attributes.len(),
        output.len(),
        method.as_str()
    );
    Ok(output)
}
