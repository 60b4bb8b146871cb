//! LSB writing
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2015 Norbyte (`LSLib`, MIT)
//!
//! SPDX-License-Identifier: MIT

use super::HEADER_SIZE;
use crate::config::LsbWriteOptions;
use crate::error::{Error, Result};
use crate::formats::common::{LocalizationLayout, ValueFraming, write_value};
use crate::resource::{Node, Resource, check_node_depth};
use byteorder::{LittleEndian, WriteBytesExt};
use indexmap::IndexSet;
use std::io::Write;

/// Write a resource to a stream as LSB.
///
/// # Errors
/// Returns an error if serialization fails or the stream cannot be written.
pub fn write_lsb<W: Write>(resource: &Resource, writer: &mut W, options: &LsbWriteOptions) -> Result<()> {
    let bytes = serialize_lsb(resource, options)?;
    writer.write_all(&bytes)?;
    Ok(())
}

/// Serialize a resource to LSB bytes.
///
/// # Errors
/// Returns an error if a value cannot be encoded or the file would exceed
/// 4 GiB.
pub fn serialize_lsb(resource: &Resource, options: &LsbWriteOptions) -> Result<Vec<u8>> {
    let strings = collect_strings(resource)?;

    let mut output = Vec::new();
    output.resize(HEADER_SIZE, 0);

    output.write_u32::<LittleEndian>(u32_field(strings.len())?)?;
    for (id, s) in strings.iter().enumerate() {
        output.write_u32::<LittleEndian>(u32_field(s.len())?)?;
        output.extend_from_slice(s.as_bytes());
        output.write_u32::<LittleEndian>(u32_field(id)?)?;
    }

    output.write_u32::<LittleEndian>(u32_field(resource.regions.len())?)?;
    let directory_start = output.len();
    for name in resource.regions.keys() {
        output.write_u32::<LittleEndian>(string_id(&strings, name)?)?;
        output.write_u32::<LittleEndian>(0)?; // patched below
    }

    let writer = LsbWriter {
        strings: &strings,
        layout: options.family.localization_layout(),
    };
    for (i, root) in resource.regions.values().enumerate() {
        let offset = u32_field(output.len())?;
        patch_u32(&mut output, directory_start + i * 8 + 4, offset);
        writer.write_node(&mut output, root, 0)?;
    }

    let total_size = u32_field(output.len())?;
    let metadata = &resource.metadata;
    let mut header = Vec::with_capacity(HEADER_SIZE);
    header.write_u32::<LittleEndian>(options.family.signature())?;
    header.write_u32::<LittleEndian>(total_size)?;
    header.write_u32::<LittleEndian>(0)?; // little-endian
    header.write_u32::<LittleEndian>(0)?;
    header.write_u64::<LittleEndian>(metadata.timestamp)?;
    header.write_u32::<LittleEndian>(metadata.major_version)?;
    header.write_u32::<LittleEndian>(metadata.minor_version)?;
    header.write_u32::<LittleEndian>(metadata.revision)?;
    header.write_u32::<LittleEndian>(metadata.build_number)?;
    output[..HEADER_SIZE].copy_from_slice(&header);

    tracing::debug!(
        "LSB {:?}: {} strings, {} regions, {total_size} bytes",
        options.family,
        strings.len(),
        resource.regions.len()
    );
    Ok(output)
}

struct LsbWriter<'a> {
    strings: &'a IndexSet<String>,
    layout: LocalizationLayout,
}

impl LsbWriter<'_> {
    fn write_node(&self, output: &mut Vec<u8>, node: &Node, depth: usize) -> Result<()> {
        check_node_depth(depth)?;

        output.write_u32::<LittleEndian>(string_id(self.strings, &node.name)?)?;
        output.write_u32::<LittleEndian>(u32_field(node.attributes.len())?)?;
        output.write_u32::<LittleEndian>(u32_field(node.child_count())?)?;

        for (name, attr) in &node.attributes {
            output.write_u32::<LittleEndian>(string_id(self.strings, name)?)?;
            output.write_u32::<LittleEndian>(attr.type_id().id())?;
            write_value(output, attr, ValueFraming::Prefixed, self.layout)?;
        }

        for child in node.child_nodes() {
            self.write_node(output, child, depth + 1)?;
        }
        Ok(())
    }
}

/// Every name in pre-order: region name, then per node its name, its
/// attribute names and its children. Ids are positions in the set.
fn collect_strings(resource: &Resource) -> Result<IndexSet<String>> {
    let mut strings = IndexSet::new();
    for (region, root) in &resource.regions {
        strings.insert(region.clone());
        let mut stack = vec![(root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            check_node_depth(depth)?;
            strings.insert(node.name.clone());
            for name in node.attributes.keys() {
                strings.insert(name.clone());
            }
            let children: Vec<&Node> = node.child_nodes().collect();
            stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
        }
    }
    Ok(strings)
}

fn string_id(strings: &IndexSet<String>, s: &str) -> Result<u32> {
    let index = strings.get_index_of(s).ok_or(Error::UnresolvedStringId(u32::MAX))?;
    u32_field(index)
}

fn u32_field(value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::ValueTooLarge { length: value })
}

fn patch_u32(output: &mut [u8], position: usize, value: u32) {
    output[position..position + 4].copy_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LsbFamily;
    use crate::formats::lsb::parse_lsb_bytes;
    use crate::resource::{Metadata, NodeAttribute, TranslatedString};

    fn sample() -> Resource {
        let mut resource = Resource::new(Metadata::new(3, 1, 2, 40));
        let root = Node::new("root")
            .with_attribute("Name", NodeAttribute::FixedString("Camp".into()))
            .with_child(
                Node::new("child").with_attribute("Name", NodeAttribute::LSString("Tent".into())),
            )
            .with_child(Node::new("leaf"));
        resource.add_region("Config", root).unwrap();
        resource
    }

    #[test]
    fn test_string_ids_in_preorder() {
        let strings = collect_strings(&sample()).unwrap();
        let names: Vec<&str> = strings.iter().map(String::as_str).collect();
        assert_eq!(names, ["Config", "root", "Name", "child", "leaf"]);
    }

    #[test]
    fn test_header_and_directory_backpatched() {
        let bytes = serialize_lsb(&sample(), &LsbWriteOptions::default()).unwrap();
        assert_eq!(&bytes[..4], b"LSFM");
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()) as usize, bytes.len());

        let resource = parse_lsb_bytes(&bytes).unwrap();
        assert_eq!(resource, sample());
    }

    #[test]
    fn test_legacy_translated_string_is_inline() {
        let mut resource = Resource::new(Metadata::default());
        let attr = NodeAttribute::TranslatedString(TranslatedString::literal("h123", "Hello"));
        resource
            .add_region("r", Node::new("r").with_attribute("Text", attr.clone()))
            .unwrap();

        for family in [LsbFamily::Legacy, LsbFamily::Bg3] {
            let options = LsbWriteOptions::default().with_family(family);
            let parsed = parse_lsb_bytes(&serialize_lsb(&resource, &options).unwrap()).unwrap();
            assert_eq!(parsed.regions["r"].attribute("Text"), Some(&attr), "{family:?}");
        }
    }
}
