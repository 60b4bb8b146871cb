//! In-memory resource tree shared by every codec
//!
//! A [`Resource`] owns its regions, each region owns a root [`Node`], and
//! every node owns its children. Nothing points back up the tree; codecs
//! that need a parent index (LSF) derive it from their traversal.

mod attribute;

pub use attribute::{
    AttributeType, MAX_ATTRIBUTE_TYPE, NodeAttribute, TranslatedFsString,
    TranslatedFsStringArgument, TranslatedString,
};

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Engine version and timestamp stored in a document header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub timestamp: u64,
    pub major_version: u32,
    pub minor_version: u32,
    pub revision: u32,
    pub build_number: u32,
}

impl Metadata {
    #[must_use]
    pub fn new(major_version: u32, minor_version: u32, revision: u32, build_number: u32) -> Self {
        Metadata {
            timestamp: 0,
            major_version,
            minor_version,
            revision,
            build_number,
        }
    }

    /// Pack into the 32-bit layout (4/4/8/16 bits) used by old LSF headers.
    #[must_use]
    pub fn pack_v32(&self) -> u32 {
        ((self.major_version & 0x0F) << 28)
            | ((self.minor_version & 0x0F) << 24)
            | ((self.revision & 0xFF) << 16)
            | (self.build_number & 0xFFFF)
    }

    #[must_use]
    pub fn unpack_v32(packed: u32) -> Self {
        Metadata::new(
            (packed >> 28) & 0x0F,
            (packed >> 24) & 0x0F,
            (packed >> 16) & 0xFF,
            packed & 0xFFFF,
        )
    }

    /// Pack into the 64-bit layout (7/8/16/31 bits) used since BG3.
    #[must_use]
    pub fn pack_v64(&self) -> u64 {
        ((u64::from(self.major_version) & 0x7F) << 55)
            | ((u64::from(self.minor_version) & 0xFF) << 47)
            | ((u64::from(self.revision) & 0xFFFF) << 31)
            | (u64::from(self.build_number) & 0x7FFF_FFFF)
    }

    #[must_use]
    pub fn unpack_v64(packed: u64) -> Self {
        Metadata::new(
            ((packed >> 55) & 0x7F) as u32,
            ((packed >> 47) & 0xFF) as u32,
            ((packed >> 31) & 0xFFFF) as u32,
            (packed & 0x7FFF_FFFF) as u32,
        )
    }

    /// Version as a string (e.g., "4.0.9.328")
    #[must_use]
    pub fn version_string(&self) -> String {
        format!(
            "{}.{}.{}.{}",
            self.major_version, self.minor_version, self.revision, self.build_number
        )
    }
}

/// Deepest node nesting any codec reads or writes. Region roots are at
/// depth 0.
pub const MAX_NODE_DEPTH: usize = 512;

pub(crate) fn check_node_depth(depth: usize) -> Result<()> {
    if depth > MAX_NODE_DEPTH {
        return Err(Error::structure(format!(
            "node nesting exceeds {MAX_NODE_DEPTH} levels"
        )));
    }
    Ok(())
}

/// A named element with typed attributes and name-grouped children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub attributes: IndexMap<String, NodeAttribute>,
    /// Children grouped by name; group order is first-insertion order.
    pub children: IndexMap<String, Vec<Node>>,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Node {
            name: name.into(),
            attributes: IndexMap::new(),
            children: IndexMap::new(),
        }
    }

    /// Set an attribute, replacing any previous value under the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: NodeAttribute) {
        self.attributes.insert(name.into(), value);
    }

    /// Builder-style [`Node::set_attribute`].
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: NodeAttribute) -> Self {
        self.set_attribute(name, value);
        self
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&NodeAttribute> {
        self.attributes.get(name)
    }

    /// Append a child to the group keyed by its name.
    pub fn append_child(&mut self, child: Node) {
        self.children.entry(child.name.clone()).or_default().push(child);
    }

    /// Builder-style [`Node::append_child`].
    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.append_child(child);
        self
    }

    /// Children in document order (group by group).
    pub fn child_nodes(&self) -> impl Iterator<Item = &Node> {
        self.children.values().flatten()
    }

    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.values().map(Vec::len).sum()
    }

    /// Number of nodes in this subtree, this node included.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.child_nodes());
        }
        count
    }
}

/// A parsed document: header metadata plus uniquely named regions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub metadata: Metadata,
    /// Region name to region root node.
    pub regions: IndexMap<String, Node>,
}

impl Resource {
    #[must_use]
    pub fn new(metadata: Metadata) -> Self {
        Resource {
            metadata,
            regions: IndexMap::new(),
        }
    }

    /// Add a region.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDocumentStructure`] if a region with the same
    /// name already exists.
    pub fn add_region(&mut self, name: impl Into<String>, root: Node) -> Result<()> {
        let name = name.into();
        if self.regions.contains_key(&name) {
            return Err(Error::structure(format!("duplicate region '{name}'")));
        }
        self.regions.insert(name, root);
        Ok(())
    }

    #[must_use]
    pub fn region(&self, name: &str) -> Option<&Node> {
        self.regions.get(name)
    }

    /// Total node count across all regions.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.regions.values().map(Node::subtree_len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_grouped_by_name() {
        let root = Node::new("root")
            .with_child(Node::new("a"))
            .with_child(Node::new("b"))
            .with_child(Node::new("a"));

        let names: Vec<&str> = root.child_nodes().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["a", "a", "b"]);
        assert_eq!(root.child_count(), 3);
        assert_eq!(root.subtree_len(), 4);
    }

    #[test]
    fn test_duplicate_region_rejected() {
        let mut resource = Resource::default();
        resource.add_region("Config", Node::new("Config")).unwrap();
        assert!(matches!(
            resource.add_region("Config", Node::new("Config")),
            Err(Error::InvalidDocumentStructure(_))
        ));
    }

    #[test]
    fn test_packed_versions() {
        let meta = Metadata::new(4, 0, 9, 328);
        assert_eq!(Metadata::unpack_v64(meta.pack_v64()), meta);
        assert_eq!(Metadata::unpack_v32(meta.pack_v32()), meta);
        assert_eq!(meta.version_string(), "4.0.9.328");

        // Version64 value for 1.0.0.0
        assert_eq!(Metadata::unpack_v64(36028797018963968), Metadata::new(1, 0, 0, 0));
    }
}
