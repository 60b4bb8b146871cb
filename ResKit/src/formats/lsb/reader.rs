//! LSB reading
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2015 Norbyte (`LSLib`, MIT)
//!
//! SPDX-License-Identifier: MIT

#![allow(clippy::cast_possible_truncation)]

use super::HEADER_SIZE;
use crate::config::LsbFamily;
use crate::error::{Error, Result};
use crate::formats::common::value::{ensure_remaining, read_bytes, read_u32};
use crate::formats::common::{LocalizationLayout, ValueFraming, read_value};
use crate::resource::{AttributeType, Metadata, Node, Resource, check_node_depth};
use byteorder::{LittleEndian, ReadBytesExt};
use std::collections::HashMap;
use std::io::{Cursor, Read};

struct LsbReader<'a> {
    cursor: Cursor<&'a [u8]>,
    strings: HashMap<u32, String>,
    layout: LocalizationLayout,
}

/// Read an LSB resource from a stream.
///
/// # Errors
/// Returns an error if the stream cannot be read or is not valid LSB.
pub fn read_lsb<R: Read>(reader: &mut R) -> Result<Resource> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    parse_lsb_bytes(&data)
}

/// Parse an LSB resource from bytes.
///
/// # Errors
/// Returns [`Error::MalformedHeader`] for a bad signature, size or byte
/// order, and the value codec's errors for corrupt records.
pub fn parse_lsb_bytes(data: &[u8]) -> Result<Resource> {
    if data.len() < HEADER_SIZE {
        return Err(Error::malformed(format!(
            "{} bytes is too short for an LSB header",
            data.len()
        )));
    }

    let mut cursor = Cursor::new(data);
    let signature = cursor.read_u32::<LittleEndian>()?;
    let total_size = cursor.read_u32::<LittleEndian>()?;
    let big_endian = cursor.read_u32::<LittleEndian>()?;
    let _unknown = cursor.read_u32::<LittleEndian>()?;

    let family = LsbFamily::from_signature(signature)
        .ok_or_else(|| Error::malformed(format!("unknown LSB signature {signature:#010x}")))?;
    if total_size as usize != data.len() {
        return Err(Error::malformed(format!(
            "header declares {total_size} bytes, stream has {}",
            data.len()
        )));
    }
    if big_endian != 0 {
        return Err(Error::malformed("big-endian LSB files are not supported"));
    }

    let metadata = Metadata {
        timestamp: cursor.read_u64::<LittleEndian>()?,
        major_version: cursor.read_u32::<LittleEndian>()?,
        minor_version: cursor.read_u32::<LittleEndian>()?,
        revision: cursor.read_u32::<LittleEndian>()?,
        build_number: cursor.read_u32::<LittleEndian>()?,
    };
    tracing::debug!(
        "LSB {family:?}, engine {}, {total_size} bytes",
        metadata.version_string()
    );

    let mut reader = LsbReader {
        cursor,
        strings: HashMap::new(),
        layout: family.localization_layout(),
    };
    reader.read_static_strings()?;

    let region_count = read_u32(&mut reader.cursor)? as usize;
    ensure_remaining(&reader.cursor, region_count.saturating_mul(8))?;
    let mut directory = Vec::with_capacity(region_count);
    for _ in 0..region_count {
        let name_id = reader.cursor.read_u32::<LittleEndian>()?;
        let offset = reader.cursor.read_u32::<LittleEndian>()?;
        directory.push((name_id, offset));
    }

    let mut resource = Resource::new(metadata);
    for (name_id, offset) in directory {
        let name = reader.string(name_id)?.to_string();
        if offset as usize >= data.len() {
            return Err(Error::TruncatedData {
                needed: offset as usize,
                remaining: data.len(),
            });
        }
        reader.cursor.set_position(u64::from(offset));
        let root = reader.read_node(0)?;
        resource.add_region(name, root)?;
    }

    Ok(resource)
}

impl LsbReader<'_> {
    fn read_static_strings(&mut self) -> Result<()> {
        let count = read_u32(&mut self.cursor)? as usize;
        // Each entry is at least a length and an id
        ensure_remaining(&self.cursor, count.saturating_mul(8))?;
        self.strings.reserve(count);

        for _ in 0..count {
            let len = read_u32(&mut self.cursor)? as usize;
            let bytes = read_bytes(&mut self.cursor, len)?;
            let id = read_u32(&mut self.cursor)?;
            if self.strings.insert(id, String::from_utf8(bytes)?).is_some() {
                return Err(Error::malformed(format!("string id {id} declared twice")));
            }
        }

        tracing::debug!("LSB string table: {count} entries");
        Ok(())
    }

    fn string(&self, id: u32) -> Result<&str> {
        self.strings
            .get(&id)
            .map(String::as_str)
            .ok_or(Error::UnresolvedStringId(id))
    }

    fn read_node(&mut self, depth: usize) -> Result<Node> {
        check_node_depth(depth)?;

        let name_id = read_u32(&mut self.cursor)?;
        let attribute_count = read_u32(&mut self.cursor)? as usize;
        let child_count = read_u32(&mut self.cursor)? as usize;
        // Smallest attribute is 8 bytes, smallest child 12
        ensure_remaining(
            &self.cursor,
            attribute_count
                .saturating_mul(8)
                .saturating_add(child_count.saturating_mul(12)),
        )?;

        let mut node = Node::new(self.string(name_id)?);
        for _ in 0..attribute_count {
            let attr_id = read_u32(&mut self.cursor)?;
            let attr_name = self.string(attr_id)?.to_string();
            let ty = AttributeType::from_id(read_u32(&mut self.cursor)?)?;
            let value = read_value(&mut self.cursor, ty, ValueFraming::Prefixed, self.layout)?;
            node.set_attribute(attr_name, value);
        }

        for _ in 0..child_count {
            let child = self.read_node(depth + 1)?;
            node.append_child(child);
        }

        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::lsb::LSB_SIGNATURE_LEGACY;
    use byteorder::WriteBytesExt;

    fn header(signature: u32, total_size: u32, big_endian: u32) -> Vec<u8> {
        let mut data = Vec::new();
        data.write_u32::<LittleEndian>(signature).unwrap();
        data.write_u32::<LittleEndian>(total_size).unwrap();
        data.write_u32::<LittleEndian>(big_endian).unwrap();
        data.write_u32::<LittleEndian>(0).unwrap();
        data.write_u64::<LittleEndian>(0).unwrap();
        for v in [3u32, 1, 0, 0] {
            data.write_u32::<LittleEndian>(v).unwrap();
        }
        data
    }

    fn empty_document(total_size: u32, big_endian: u32) -> Vec<u8> {
        let mut data = header(LSB_SIGNATURE_LEGACY, total_size, big_endian);
        data.write_u32::<LittleEndian>(0).unwrap(); // strings
        data.write_u32::<LittleEndian>(0).unwrap(); // regions
        data
    }

    #[test]
    fn test_empty_document() {
        let data = empty_document(48, 0);
        let resource = parse_lsb_bytes(&data).unwrap();
        assert!(resource.regions.is_empty());
        assert_eq!(resource.metadata.major_version, 3);
    }

    #[test]
    fn test_total_size_must_match() {
        let data = empty_document(49, 0);
        assert!(matches!(parse_lsb_bytes(&data), Err(Error::MalformedHeader { .. })));
    }

    #[test]
    fn test_big_endian_rejected() {
        let data = empty_document(48, 1);
        assert!(matches!(parse_lsb_bytes(&data), Err(Error::MalformedHeader { .. })));
    }

    #[test]
    fn test_bad_signature_and_short_stream() {
        let mut data = empty_document(48, 0);
        data[0] = 0x12;
        assert!(matches!(parse_lsb_bytes(&data), Err(Error::MalformedHeader { .. })));
        assert!(matches!(parse_lsb_bytes(&data[..10]), Err(Error::MalformedHeader { .. })));
    }

    #[test]
    fn test_unresolved_region_name() {
        let mut data = header(LSB_SIGNATURE_LEGACY, 0, 0);
        data.write_u32::<LittleEndian>(0).unwrap(); // no strings
        data.write_u32::<LittleEndian>(1).unwrap(); // one region
        data.write_u32::<LittleEndian>(7).unwrap(); // name id 7
        data.write_u32::<LittleEndian>(56).unwrap();
        let len = data.len() as u32;
        data[4..8].copy_from_slice(&len.to_le_bytes());
        assert!(matches!(parse_lsb_bytes(&data), Err(Error::UnresolvedStringId(7))));
    }

    #[test]
    fn test_duplicate_string_id_rejected() {
        let mut data = header(LSB_SIGNATURE_LEGACY, 0, 0);
        data.write_u32::<LittleEndian>(2).unwrap(); // two strings, same id
        for name in [b"Root", b"Node"] {
            data.write_u32::<LittleEndian>(4).unwrap();
            data.extend_from_slice(name);
            data.write_u32::<LittleEndian>(1).unwrap();
        }
        data.write_u32::<LittleEndian>(0).unwrap(); // regions
        let len = data.len() as u32;
        data[4..8].copy_from_slice(&len.to_le_bytes());
        assert!(matches!(parse_lsb_bytes(&data), Err(Error::MalformedHeader { .. })));
    }

    #[test]
    fn test_attribute_names_resolved() {
        let mut data = header(LSB_SIGNATURE_LEGACY, 0, 0);
        data.write_u32::<LittleEndian>(2).unwrap();
        for (name, id) in [(&b"Root"[..], 0u32), (&b"Count"[..], 1)] {
            data.write_u32::<LittleEndian>(name.len() as u32).unwrap();
            data.extend_from_slice(name);
            data.write_u32::<LittleEndian>(id).unwrap();
        }
        data.write_u32::<LittleEndian>(1).unwrap(); // one region
        data.write_u32::<LittleEndian>(0).unwrap();
        let node_offset = data.len() as u32 + 4;
        data.write_u32::<LittleEndian>(node_offset).unwrap();
        // node: name, one attribute, no children
        data.write_u32::<LittleEndian>(0).unwrap();
        data.write_u32::<LittleEndian>(1).unwrap();
        data.write_u32::<LittleEndian>(0).unwrap();
        data.write_u32::<LittleEndian>(1).unwrap(); // "Count"
        data.write_u32::<LittleEndian>(AttributeType::Int32.id()).unwrap();
        data.write_i32::<LittleEndian>(-5).unwrap();
        let len = data.len() as u32;
        data[4..8].copy_from_slice(&len.to_le_bytes());

        let resource = parse_lsb_bytes(&data).unwrap();
        let root = resource.region("Root").unwrap();
        assert_eq!(root.attribute("Count"), Some(&crate::resource::NodeAttribute::Int32(-5)));
    }
}
