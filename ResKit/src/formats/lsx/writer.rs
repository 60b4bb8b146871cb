//! LSX writing
//!
//! `LSLib`'s metadata output purposefully maintained as an homage.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2015 Norbyte (`LSLib`, MIT)
//!
//! SPDX-License-Identifier: MIT

use super::UNIT_SEPARATOR;
use crate::config::{LsxVersion, LsxWriteOptions};
use crate::error::Result;
use crate::formats::common::format_value;
use crate::resource::{
    AttributeType, Node, NodeAttribute, Resource, TranslatedFsString, check_node_depth,
};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use std::io::Write;

/// Write a resource to a stream as LSX.
///
/// # Errors
/// Returns an error if serialization or writing fails.
pub fn write_lsx<W: Write>(resource: &Resource, writer: &mut W, options: &LsxWriteOptions) -> Result<()> {
    let xml = serialize_lsx(resource, options)?;
    writer.write_all(xml.as_bytes())?;
    Ok(())
}

/// Serialize a resource to an LSX string (with a leading BOM).
///
/// # Errors
/// Returns an error if XML serialization fails.
pub fn serialize_lsx(resource: &Resource, options: &LsxWriteOptions) -> Result<String> {
    let mut output = Vec::new();

    // Write UTF-8 BOM
    output.extend_from_slice(&[0xEF, 0xBB, 0xBF]);

    let mut writer = if options.pretty_print {
        Writer::new_with_indent(&mut output, b'\t', 1)
    } else {
        Writer::new(&mut output)
    };

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("save")))?;

    let metadata = &resource.metadata;
    let bswap_guids = metadata.major_version >= 4;
    let mut version = BytesStart::new("version");
    version.push_attribute(("major", metadata.major_version.to_string().as_str()));
    version.push_attribute(("minor", metadata.minor_version.to_string().as_str()));
    version.push_attribute(("revision", metadata.revision.to_string().as_str()));
    version.push_attribute(("build", metadata.build_number.to_string().as_str()));
    version.push_attribute(("lslib_meta", if bswap_guids { "v1,bswap_guids" } else { "v1" }));
    writer.write_event(Event::Empty(version))?;

    let lsx = LsxWriter {
        version: options.version,
        bswap_guids,
    };
    for (id, root) in &resource.regions {
        let mut region = BytesStart::new("region");
        region.push_attribute(("id", id.as_str()));
        writer.write_event(Event::Start(region))?;
        lsx.write_node(&mut writer, root, 0)?;
        writer.write_event(Event::End(BytesEnd::new("region")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("save")))?;

    let xml = String::from_utf8(output)?;
    // Fix spacing before self-closing tags
    let xml = xml.replace("/>", " />");
    tracing::debug!(
        "LSX v{}: {} regions, {} bytes",
        options.version as u32,
        resource.regions.len(),
        xml.len()
    );
    Ok(xml)
}

struct LsxWriter {
    version: LsxVersion,
    bswap_guids: bool,
}

impl LsxWriter {
    fn type_name(&self, ty: AttributeType) -> String {
        match self.version {
            LsxVersion::V3 => ty.id().to_string(),
            LsxVersion::V4 => ty.name().to_string(),
        }
    }

    fn write_node<W: Write>(&self, writer: &mut Writer<W>, node: &Node, depth: usize) -> Result<()> {
        check_node_depth(depth)?;
        let mut node_start = BytesStart::new("node");
        node_start.push_attribute(("id", node.name.as_str()));

        if node.attributes.is_empty() && node.children.is_empty() {
            writer.write_event(Event::Empty(node_start))?;
            return Ok(());
        }
        writer.write_event(Event::Start(node_start))?;

        for (id, attr) in &node.attributes {
            self.write_attribute(writer, id, attr)?;
        }

        if !node.children.is_empty() {
            writer.write_event(Event::Start(BytesStart::new("children")))?;
            for child in node.child_nodes() {
                self.write_node(writer, child, depth + 1)?;
            }
            writer.write_event(Event::End(BytesEnd::new("children")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("node")))?;
        Ok(())
    }

    fn write_attribute<W: Write>(&self, writer: &mut Writer<W>, id: &str, attr: &NodeAttribute) -> Result<()> {
        let type_name = self.type_name(attr.type_id());
        let mut tag = BytesStart::new("attribute");
        tag.push_attribute(("id", id));
        tag.push_attribute(("type", type_name.as_str()));

        match attr {
            NodeAttribute::TranslatedString(ts) => {
                tag.push_attribute(("handle", ts.handle.as_str()));
                match &ts.value {
                    Some(value) => tag.push_attribute(("value", value.as_str())),
                    None => tag.push_attribute(("version", ts.version.to_string().as_str())),
                }
                writer.write_event(Event::Empty(tag))?;
            }
            NodeAttribute::TranslatedFSString(fs) => {
                push_fs_header(&mut tag, fs);
                write_fs_body(writer, tag, fs, "attribute")?;
            }
            _ => {
                let value = format_value(attr, self.bswap_guids).replace(UNIT_SEPARATOR, "");
                tag.push_attribute(("value", value.as_str()));
                writer.write_event(Event::Empty(tag))?;
            }
        }
        Ok(())
    }
}

fn push_fs_header(tag: &mut BytesStart, fs: &TranslatedFsString) {
    match &fs.value {
        Some(value) => tag.push_attribute(("value", value.as_str())),
        None => tag.push_attribute(("version", fs.version.to_string().as_str())),
    }
    tag.push_attribute(("handle", fs.handle.as_str()));
    tag.push_attribute(("arguments", fs.arguments.len().to_string().as_str()));
}

/// Emit `tag` (already carrying the string header) and its argument list.
fn write_fs_body<W: Write>(
    writer: &mut Writer<W>,
    tag: BytesStart,
    fs: &TranslatedFsString,
    element: &str,
) -> Result<()> {
    if fs.arguments.is_empty() {
        writer.write_event(Event::Empty(tag))?;
        return Ok(());
    }

    writer.write_event(Event::Start(tag))?;
    writer.write_event(Event::Start(BytesStart::new("arguments")))?;
    for argument in &fs.arguments {
        let mut argument_tag = BytesStart::new("argument");
        argument_tag.push_attribute(("key", argument.key.as_str()));
        argument_tag.push_attribute(("value", argument.value.as_str()));
        writer.write_event(Event::Start(argument_tag))?;

        let mut string_tag = BytesStart::new("string");
        push_fs_header(&mut string_tag, &argument.string);
        write_fs_body(writer, string_tag, &argument.string, "string")?;

        writer.write_event(Event::End(BytesEnd::new("argument")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("arguments")))?;
    writer.write_event(Event::End(BytesEnd::new(element)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Metadata, TranslatedString};

    fn sample(major: u32) -> Resource {
        let mut resource = Resource::new(Metadata::new(major, 0, 9, 331));
        let root = Node::new("Config")
            .with_attribute("Name", NodeAttribute::FixedString("a\u{1f}b".into()))
            .with_attribute("Count", NodeAttribute::Int32(7))
            .with_attribute("Title", NodeAttribute::TranslatedString(TranslatedString::late("h1", 2)))
            .with_child(Node::new("Empty"));
        resource.add_region("Config", root).unwrap();
        resource
    }

    #[test]
    fn test_header_and_layout() {
        let xml = serialize_lsx(&sample(4), &LsxWriteOptions::default()).unwrap();
        assert!(xml.starts_with('\u{feff}'));
        assert!(xml.contains(r#"<version major="4" minor="0" revision="9" build="331" lslib_meta="v1,bswap_guids" />"#));
        assert!(xml.contains("\n\t<region id=\"Config\">"));
        assert!(xml.contains(r#"<node id="Empty" />"#));
        assert!(!xml.contains('\r'));
    }

    #[test]
    fn test_type_names_by_version() {
        let v4 = serialize_lsx(&sample(4), &LsxWriteOptions::default()).unwrap();
        assert!(v4.contains(r#"<attribute id="Count" type="int32" value="7" />"#));

        let options = LsxWriteOptions::default().with_version(LsxVersion::V3);
        let v3 = serialize_lsx(&sample(3), &options).unwrap();
        assert!(v3.contains(r#"<attribute id="Count" type="4" value="7" />"#));
        assert!(v3.contains(r#"lslib_meta="v1" />"#));
    }

    #[test]
    fn test_unit_separator_stripped_and_translated_attributes() {
        let xml = serialize_lsx(&sample(4), &LsxWriteOptions::default()).unwrap();
        assert!(xml.contains(r#"id="Name" type="FixedString" value="ab""#));
        assert!(xml.contains(r#"id="Title" type="TranslatedString" handle="h1" version="2""#));
    }

    #[test]
    fn test_compact_output() {
        let options = LsxWriteOptions::default().with_pretty_print(false);
        let xml = serialize_lsx(&sample(4), &options).unwrap();
        assert!(!xml.contains('\n'));
        assert!(!xml.contains('\t'));
    }
}
