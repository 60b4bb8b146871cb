//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2015 Norbyte (`LSLib`, MIT)
//!
//! SPDX-License-Identifier: MIT
//!
//! LSX reading

use crate::error::{Error, Result};
use crate::formats::common::{MAX_FS_STRING_DEPTH, parse_value};
use crate::resource::{
    AttributeType, Metadata, Node, NodeAttribute, Resource, TranslatedFsString,
    TranslatedFsStringArgument, TranslatedString, check_node_depth,
};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::io::Read;

/// Read an LSX resource from a stream.
///
/// # Errors
/// Returns an error if the stream cannot be read, is not UTF-8, or does not
/// hold a valid LSX document.
pub fn read_lsx<R: Read>(reader: &mut R) -> Result<Resource> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    let content = String::from_utf8(data)?;
    parse_lsx(&content)
}

/// Parse LSX from an XML string. A leading BOM is ignored.
///
/// # Errors
/// Returns an error if the XML is malformed or the element tree does not
/// have the LSX shape.
pub fn parse_lsx(content: &str) -> Result<Resource> {
    let content = content.trim_start_matches('\u{feff}');
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut state = LsxReader::default();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => state.start(&e, false)?,
            Event::Empty(e) => state.start(&e, true)?,
            Event::End(e) => state.end(e.name().as_ref())?,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    state.finish()
}

/// An open region: its id and, once closed, its single root node.
struct OpenRegion {
    id: String,
    root: Option<Node>,
}

/// Open element of a `TranslatedFSString` body.
enum Frame {
    /// A string header. `attribute` is set for the outermost string, which
    /// belongs to the `<attribute>` element of the current node.
    String {
        attribute: Option<String>,
        fs: TranslatedFsString,
        declared: usize,
    },
    Argument {
        key: String,
        value: String,
        string: Option<TranslatedFsString>,
    },
}

#[derive(Default)]
struct LsxReader {
    resource: Resource,
    bswap_guids: Option<bool>,
    region: Option<OpenRegion>,
    nodes: Vec<Node>,
    frames: Vec<Frame>,
}

type XmlAttributes = Vec<(String, String)>;

fn xml_attributes(e: &BytesStart) -> Result<XmlAttributes> {
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8(attr.key.as_ref().to_vec())?;
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }
    Ok(attributes)
}

fn get<'a>(attributes: &'a XmlAttributes, key: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn require<'a>(attributes: &'a XmlAttributes, key: &str, element: &str) -> Result<&'a str> {
    get(attributes, key).ok_or_else(|| Error::structure(format!("<{element}> without '{key}'")))
}

fn parse_number<T: std::str::FromStr>(attributes: &XmlAttributes, key: &str) -> Result<Option<T>> {
    get(attributes, key)
        .map(|text| {
            text.trim()
                .parse()
                .map_err(|_| Error::structure(format!("invalid {key} '{text}'")))
        })
        .transpose()
}

fn attribute_type(text: &str) -> Result<AttributeType> {
    // Numeric ids first: V3 documents write "4" rather than "int32"
    if let Ok(id) = text.parse::<u32>() {
        return AttributeType::from_id(id);
    }
    AttributeType::from_name(text)
        .ok_or_else(|| Error::structure(format!("unknown attribute type '{text}'")))
}

/// Version/value header shared by translated strings.
fn localized_header(attributes: &XmlAttributes) -> Result<(u16, Option<String>)> {
    match get(attributes, "value") {
        Some(value) => Ok((0, Some(value.to_string()))),
        None => Ok((parse_number(attributes, "version")?.unwrap_or(0), None)),
    }
}

fn fs_header(attributes: &XmlAttributes, element: &str) -> Result<(TranslatedFsString, usize)> {
    let (version, value) = localized_header(attributes)?;
    let handle = require(attributes, "handle", element)?.to_string();
    let declared = parse_number(attributes, "arguments")?.unwrap_or(0);
    let fs = TranslatedFsString {
        version,
        value,
        handle,
        arguments: Vec::new(),
    };
    Ok((fs, declared))
}

impl LsxReader {
    fn bswap_guids(&self) -> bool {
        self.bswap_guids
            .unwrap_or(self.resource.metadata.major_version >= 4)
    }

    fn start(&mut self, e: &BytesStart, empty: bool) -> Result<()> {
        match e.name().as_ref() {
            b"version" => self.read_version(&xml_attributes(e)?),
            b"region" => {
                let attributes = xml_attributes(e)?;
                if self.region.is_some() {
                    return Err(Error::structure("<region> inside another region"));
                }
                let id = require(&attributes, "id", "region")?.to_string();
                if self.resource.regions.contains_key(&id) {
                    return Err(Error::structure(format!("duplicate region '{id}'")));
                }
                self.region = Some(OpenRegion { id, root: None });
                if empty {
                    self.end(b"region")?;
                }
                Ok(())
            }
            b"node" => {
                let attributes = xml_attributes(e)?;
                if self.region.is_none() {
                    return Err(Error::structure("<node> outside a region"));
                }
                if !self.frames.is_empty() {
                    return Err(Error::structure("<node> inside a translated string"));
                }
                let id = require(&attributes, "id", "node")?;
                check_node_depth(self.nodes.len())?;
                self.nodes.push(Node::new(id));
                if empty {
                    self.close_node()?;
                }
                Ok(())
            }
            b"attribute" => self.start_attribute(&xml_attributes(e)?, empty),
            b"argument" => {
                let attributes = xml_attributes(e)?;
                if !matches!(self.frames.last(), Some(Frame::String { .. })) {
                    return Err(Error::structure("<argument> outside a translated string"));
                }
                self.frames.push(Frame::Argument {
                    key: get(&attributes, "key").unwrap_or_default().to_string(),
                    value: get(&attributes, "value").unwrap_or_default().to_string(),
                    string: None,
                });
                if empty {
                    self.end(b"argument")?;
                }
                Ok(())
            }
            b"string" => {
                let attributes = xml_attributes(e)?;
                if !matches!(self.frames.last(), Some(Frame::Argument { string: None, .. })) {
                    return Err(Error::structure("<string> outside an argument"));
                }
                let (fs, declared) = fs_header(&attributes, "string")?;
                self.push_string_frame(None, fs, declared)?;
                if empty {
                    self.close_string()?;
                }
                Ok(())
            }
            // save, header, children, arguments
            _ => Ok(()),
        }
    }

    fn end(&mut self, name: &[u8]) -> Result<()> {
        match name {
            b"node" => self.close_node(),
            b"region" => {
                let region = self
                    .region
                    .take()
                    .ok_or_else(|| Error::structure("</region> without a region"))?;
                let root = region
                    .root
                    .ok_or_else(|| Error::structure(format!("region '{}' has no root node", region.id)))?;
                self.resource.add_region(region.id, root)
            }
            b"attribute" => {
                if matches!(self.frames.last(), Some(Frame::String { attribute: Some(_), .. })) {
                    self.close_string()?;
                }
                Ok(())
            }
            b"string" => self.close_string(),
            b"argument" => {
                let Some(Frame::Argument { key, value, string }) = self.frames.pop() else {
                    return Err(Error::structure("</argument> outside an argument"));
                };
                let string = string.ok_or_else(|| {
                    Error::structure(format!("argument '{key}' has no <string>"))
                })?;
                match self.frames.last_mut() {
                    Some(Frame::String { fs, .. }) => {
                        fs.arguments.push(TranslatedFsStringArgument { key, string, value });
                        Ok(())
                    }
                    _ => Err(Error::structure("argument outside a translated string")),
                }
            }
            _ => Ok(()),
        }
    }

    fn read_version(&mut self, attributes: &XmlAttributes) -> Result<()> {
        let metadata = &mut self.resource.metadata;
        *metadata = Metadata {
            timestamp: 0,
            major_version: parse_number(attributes, "major")?.unwrap_or(0),
            minor_version: parse_number(attributes, "minor")?.unwrap_or(0),
            revision: parse_number(attributes, "revision")?.unwrap_or(0),
            build_number: parse_number(attributes, "build")?.unwrap_or(0),
        };
        if let Some(meta) = get(attributes, "lslib_meta") {
            self.bswap_guids = Some(meta.split(',').any(|flag| flag.trim() == "bswap_guids"));
        }
        tracing::debug!("LSX engine version {}", self.resource.metadata.version_string());
        Ok(())
    }

    fn close_node(&mut self) -> Result<()> {
        let node = self
            .nodes
            .pop()
            .ok_or_else(|| Error::structure("</node> without a node"))?;
        if let Some(parent) = self.nodes.last_mut() {
            parent.append_child(node);
            return Ok(());
        }

        let region = self
            .region
            .as_mut()
            .ok_or_else(|| Error::structure("<node> outside a region"))?;
        if region.root.is_some() {
            return Err(Error::structure(format!(
                "region '{}' has more than one root node",
                region.id
            )));
        }
        region.root = Some(node);
        Ok(())
    }

    fn start_attribute(&mut self, attributes: &XmlAttributes, empty: bool) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(Error::structure("<attribute> outside a node"));
        }
        let id = require(attributes, "id", "attribute")?.to_string();
        let ty = attribute_type(require(attributes, "type", "attribute")?)?;

        let value = match ty {
            AttributeType::TranslatedString => {
                let (version, value) = localized_header(attributes)?;
                let handle = require(attributes, "handle", "attribute")?.to_string();
                NodeAttribute::TranslatedString(TranslatedString {
                    version,
                    value,
                    handle,
                })
            }
            AttributeType::TranslatedFSString => {
                let (fs, declared) = fs_header(attributes, "attribute")?;
                self.push_string_frame(Some(id), fs, declared)?;
                if empty {
                    self.close_string()?;
                }
                return Ok(());
            }
            _ => {
                let text = get(attributes, "value").unwrap_or_default();
                parse_value(ty, text, self.bswap_guids())?
            }
        };

        if let Some(node) = self.nodes.last_mut() {
            node.set_attribute(id, value);
        }
        Ok(())
    }

    fn push_string_frame(&mut self, attribute: Option<String>, fs: TranslatedFsString, declared: usize) -> Result<()> {
        let depth = self
            .frames
            .iter()
            .filter(|frame| matches!(frame, Frame::String { .. }))
            .count();
        if depth > MAX_FS_STRING_DEPTH {
            return Err(Error::NestingTooDeep {
                limit: MAX_FS_STRING_DEPTH,
            });
        }
        self.frames.push(Frame::String {
            attribute,
            fs,
            declared,
        });
        Ok(())
    }

    fn close_string(&mut self) -> Result<()> {
        let Some(Frame::String {
            attribute,
            fs,
            declared,
        }) = self.frames.pop()
        else {
            return Err(Error::structure("</string> outside a translated string"));
        };

        if fs.arguments.len() != declared {
            return Err(Error::structure(format!(
                "translated string '{}' declares {declared} arguments, found {}",
                fs.handle,
                fs.arguments.len()
            )));
        }

        if let Some(id) = attribute {
            let node = self
                .nodes
                .last_mut()
                .ok_or_else(|| Error::structure("<attribute> outside a node"))?;
            node.set_attribute(id, NodeAttribute::TranslatedFSString(fs));
            return Ok(());
        }

        match self.frames.last_mut() {
            Some(Frame::Argument { string, .. }) => {
                *string = Some(fs);
                Ok(())
            }
            _ => Err(Error::structure("<string> outside an argument")),
        }
    }

    fn finish(self) -> Result<Resource> {
        if self.region.is_some() || !self.nodes.is_empty() || !self.frames.is_empty() {
            return Err(Error::structure("document ends inside an open element"));
        }
        Ok(self.resource)
    }
}
