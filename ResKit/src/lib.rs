//! # ResKit
//!
//! Lossless conversion of Larian resource documents between their three
//! encodings:
//!
//! - **LSB** - versioned binary tree with a global string table
//! - **LSF** - compressed four-segment binary with hashed name table
//! - **LSX** - XML
//!
//! All three read into and write from one in-memory [`Resource`] tree.
//!
//! ## Quick Start
//!
//! ```no_run
//! use reskit::converter::convert;
//! use reskit::config::{ConversionOptions, Game};
//!
//! // Convert LSF (binary) to LSX (XML) using Baldur's Gate 3 versions
//! convert("meta.lsf", "meta.lsx", &ConversionOptions::for_game(Game::BaldursGate3))?;
//! # Ok::<(), reskit::Error>(())
//! ```
//!
//! ### Building a resource by hand
//!
//! ```
//! use reskit::prelude::*;
//!
//! let mut resource = Resource::new(Metadata::new(4, 0, 9, 331));
//! let root = Node::new("Config").with_attribute("Enabled", NodeAttribute::Bool(true));
//! resource.add_region("Config", root)?;
//!
//! let bytes = serialize_lsf(&resource, &LsfWriteOptions::default())?;
//! assert_eq!(parse_lsf_bytes(&bytes)?, resource);
//! # Ok::<(), reskit::Error>(())
//! ```

pub mod compression;
pub mod config;
pub mod converter;
pub mod error;
pub mod formats;
pub mod resource;

// Re-exports for convenience
pub use error::{Error, Result};
pub use resource::{Metadata, Node, NodeAttribute, Resource};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::{
        ConversionOptions, Game, LsbFamily, LsbWriteOptions, LsfVersion, LsfWriteOptions,
        LsxVersion, LsxWriteOptions,
    };
    pub use crate::converter::{ResourceFormat, convert, read_resource, write_resource};
    pub use crate::error::{Error, Result};
    pub use crate::formats::{
        LsfDocument, parse_lsb_bytes, parse_lsf_bytes, parse_lsx, read_lsb, read_lsf, read_lsx,
        serialize_lsb, serialize_lsf, serialize_lsx, write_lsb, write_lsf, write_lsx,
    };
    pub use crate::resource::{
        AttributeType, Metadata, Node, NodeAttribute, Resource, TranslatedFsString,
        TranslatedFsStringArgument, TranslatedString,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
