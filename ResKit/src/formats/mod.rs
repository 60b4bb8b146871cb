//! Resource codecs
//!
//! Every codec reads into and writes from the shared
//! [`Resource`](crate::resource::Resource) tree.

pub mod common;
pub mod lsb;
pub mod lsf;
pub mod lsx;

pub use lsb::{parse_lsb_bytes, read_lsb, serialize_lsb, write_lsb};
pub use lsf::{LsfDocument, parse_lsf_bytes, read_lsf, serialize_lsf, write_lsf};
pub use lsx::{parse_lsx, read_lsx, serialize_lsx, write_lsx};
