//! Value codecs shared by the binary and text formats

pub mod text;
pub mod value;

pub use text::{format_value, parse_value, swap_guid_tail};
pub use value::{LocalizationLayout, MAX_FS_STRING_DEPTH, ValueFraming, read_value, write_value};
