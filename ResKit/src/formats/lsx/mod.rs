//! LSX (XML) resource format
//!
//! `<save>` holds a `<version>` element and one `<region>` per region, each
//! wrapping a single root `<node>`. Child nodes live under `<children>`.

mod reader;
mod writer;

pub use reader::{parse_lsx, read_lsx};
pub use writer::{serialize_lsx, write_lsx};

/// Control character the game leaves in some strings; never written to XML.
pub(crate) const UNIT_SEPARATOR: char = '\u{1f}';
