//! LSF (Larian Story Format) binary format module
//!
//! Four segments (strings, nodes, attributes, values), each optionally
//! compressed. [`LsfDocument`] exposes the decoded records for callers
//! that need the raw node order or the sibling chain.

mod document;
mod reader;
mod string_table;
mod writer;

// Public API
pub use document::{
    LSF_MAGIC, LsfAttribute, LsfDocument, LsfHeader, LsfMetadataFormat, LsfNode, SegmentSize,
    pack_type_and_length, unpack_type_and_length,
};
pub use reader::{parse_lsf_bytes, parse_lsf_document, read_lsf};
pub use string_table::{STRING_HASH_BUCKETS, StringTable, bucket_of, split_id};
pub use writer::{build_document, encode_document, serialize_lsf, write_lsf};
