//! Error types for `ResKit`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `ResKit` operations.
///
/// Every variant is fatal: readers never hand back a partially built
/// [`Resource`](crate::Resource).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from stream or file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Structural Errors ====================
    /// Bad signature, size or endianness in a binary header.
    #[error("malformed header: {message}")]
    MalformedHeader {
        /// What was wrong with the header.
        message: String,
    },

    /// The format version cannot be read or written by this codec.
    #[error("unsupported {format} version: {version}")]
    UnsupportedVersion {
        /// Format name (`LSB`, `LSF`, `LSX`).
        format: &'static str,
        /// The offending version number.
        version: u32,
    },

    /// A string id was referenced but never declared in the string table.
    #[error("unresolved string id: {0:#x}")]
    UnresolvedStringId(u32),

    /// An attribute type tag is out of range.
    #[error("unsupported attribute type: {0}")]
    UnsupportedAttributeType(u32),

    /// A declared length runs past the end of the available bytes.
    #[error("truncated data: need {needed} bytes, {remaining} remaining")]
    TruncatedData {
        /// Bytes the record declared.
        needed: usize,
        /// Bytes actually left.
        remaining: usize,
    },

    /// A null-terminated string is missing its terminator.
    #[error("null-terminated string is missing its terminator")]
    InvalidTerminator,

    /// The document tree is not shaped the way the format requires.
    #[error("invalid document structure: {0}")]
    InvalidDocumentStructure(String),

    /// A textual attribute value could not be parsed for its type.
    #[error("invalid {type_name} value: {value:?}")]
    InvalidAttributeValue {
        /// Type name of the attribute.
        type_name: &'static str,
        /// The text that failed to parse.
        value: String,
    },

    /// `TranslatedFSString` arguments nest deeper than the codec allows.
    #[error("translated string arguments nested deeper than {limit} levels")]
    NestingTooDeep {
        /// The nesting limit.
        limit: usize,
    },

    /// A name does not fit the u16 length field of the LSF string table.
    #[error("string too long for string table: {length} bytes")]
    StringTooLong {
        /// UTF-8 length of the string.
        length: usize,
    },

    /// A value payload does not fit its 26-bit length field.
    #[error("attribute value too large: {length} bytes")]
    ValueTooLarge {
        /// Encoded value length.
        length: usize,
    },

    // ==================== Compression/Decompression Errors ====================
    /// Decompression of a segment failed.
    #[error("decompression failed: {0}")]
    DecompressionError(String),

    /// Compression of a segment failed.
    #[error("compression failed: {0}")]
    CompressionError(String),

    // ==================== Parsing Errors ====================
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// XML attribute error.
    #[error("XML attribute error: {0}")]
    XmlAttrError(String),

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    /// JSON parsing or serialization error (conversion options).
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ==================== File System Errors ====================
    /// The file extension does not name a resource format.
    #[error("unknown resource format: {0}")]
    UnknownFormat(PathBuf),
}

impl Error {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedHeader {
            message: message.into(),
        }
    }

    pub(crate) fn structure(message: impl Into<String>) -> Self {
        Error::InvalidDocumentStructure(message.into())
    }
}

// Add conversion from quick_xml::events::attributes::AttrError
impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttrError(err.to_string())
    }
}

/// A specialized Result type for `ResKit` operations.
pub type Result<T> = std::result::Result<T, Error>;
