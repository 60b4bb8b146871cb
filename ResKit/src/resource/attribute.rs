//! Attribute type tags and typed attribute values
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2015 Norbyte (`LSLib`, MIT)
//!
//! SPDX-License-Identifier: MIT

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wire type tag of a node attribute.
///
/// The numeric values are shared by LSB, LSF and numeric LSX type ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum AttributeType {
    None = 0,
    UInt8 = 1,
    Int16 = 2,
    UInt16 = 3,
    Int32 = 4,
    UInt32 = 5,
    Float = 6,
    Double = 7,
    IVec2 = 8,
    IVec3 = 9,
    IVec4 = 10,
    Vec2 = 11,
    Vec3 = 12,
    Vec4 = 13,
    Mat2 = 14,
    Mat3 = 15,
    Mat3x4 = 16,
    Mat4x3 = 17,
    Mat4 = 18,
    Bool = 19,
    String = 20,
    Path = 21,
    FixedString = 22,
    LSString = 23,
    UInt64 = 24,
    ScratchBuffer = 25,
    /// Legacy 64-bit integer (`old_int64`)
    Long = 26,
    Int8 = 27,
    TranslatedString = 28,
    WString = 29,
    LSWString = 30,
    Uuid = 31,
    Int64 = 32,
    TranslatedFSString = 33,
}

/// Highest type tag any codec understands.
pub const MAX_ATTRIBUTE_TYPE: u32 = AttributeType::TranslatedFSString as u32;

const ALL_TYPES: [AttributeType; 34] = [
    AttributeType::None,
    AttributeType::UInt8,
    AttributeType::Int16,
    AttributeType::UInt16,
    AttributeType::Int32,
    AttributeType::UInt32,
    AttributeType::Float,
    AttributeType::Double,
    AttributeType::IVec2,
    AttributeType::IVec3,
    AttributeType::IVec4,
    AttributeType::Vec2,
    AttributeType::Vec3,
    AttributeType::Vec4,
    AttributeType::Mat2,
    AttributeType::Mat3,
    AttributeType::Mat3x4,
    AttributeType::Mat4x3,
    AttributeType::Mat4,
    AttributeType::Bool,
    AttributeType::String,
    AttributeType::Path,
    AttributeType::FixedString,
    AttributeType::LSString,
    AttributeType::UInt64,
    AttributeType::ScratchBuffer,
    AttributeType::Long,
    AttributeType::Int8,
    AttributeType::TranslatedString,
    AttributeType::WString,
    AttributeType::LSWString,
    AttributeType::Uuid,
    AttributeType::Int64,
    AttributeType::TranslatedFSString,
];

impl AttributeType {
    /// Every type tag, in id order.
    #[must_use]
    pub fn all() -> &'static [AttributeType] {
        &ALL_TYPES
    }

    /// Resolve a numeric type tag.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedAttributeType`] for tags above
    /// [`MAX_ATTRIBUTE_TYPE`].
    pub fn from_id(id: u32) -> Result<Self> {
        ALL_TYPES
            .get(id as usize)
            .copied()
            .ok_or(Error::UnsupportedAttributeType(id))
    }

    #[must_use]
    pub fn id(self) -> u32 {
        self as u32
    }

    /// Symbolic name used by LSX v4 documents.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            AttributeType::None => "None",
            AttributeType::UInt8 => "uint8",
            AttributeType::Int16 => "int16",
            AttributeType::UInt16 => "uint16",
            AttributeType::Int32 => "int32",
            AttributeType::UInt32 => "uint32",
            AttributeType::Float => "float",
            AttributeType::Double => "double",
            AttributeType::IVec2 => "ivec2",
            AttributeType::IVec3 => "ivec3",
            AttributeType::IVec4 => "ivec4",
            AttributeType::Vec2 => "fvec2",
            AttributeType::Vec3 => "fvec3",
            AttributeType::Vec4 => "fvec4",
            AttributeType::Mat2 => "mat2x2",
            AttributeType::Mat3 => "mat3x3",
            AttributeType::Mat3x4 => "mat3x4",
            AttributeType::Mat4x3 => "mat4x3",
            AttributeType::Mat4 => "mat4x4",
            AttributeType::Bool => "bool",
            AttributeType::String => "string",
            AttributeType::Path => "path",
            AttributeType::FixedString => "FixedString",
            AttributeType::LSString => "LSString",
            AttributeType::UInt64 => "uint64",
            AttributeType::ScratchBuffer => "ScratchBuffer",
            AttributeType::Long => "old_int64",
            AttributeType::Int8 => "int8",
            AttributeType::TranslatedString => "TranslatedString",
            AttributeType::WString => "WString",
            AttributeType::LSWString => "LSWString",
            AttributeType::Uuid => "guid",
            AttributeType::Int64 => "int64",
            AttributeType::TranslatedFSString => "TranslatedFSString",
        }
    }

    /// Resolve a symbolic LSX type name (including the legacy aliases).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name {
            "None" => AttributeType::None,
            "uint8" | "Byte" => AttributeType::UInt8,
            "int16" | "Short" => AttributeType::Int16,
            "uint16" | "UShort" => AttributeType::UInt16,
            "int32" | "Int" => AttributeType::Int32,
            "uint32" | "UInt" => AttributeType::UInt32,
            "float" | "Float" => AttributeType::Float,
            "double" | "Double" => AttributeType::Double,
            "ivec2" | "IVec2" => AttributeType::IVec2,
            "ivec3" | "IVec3" => AttributeType::IVec3,
            "ivec4" | "IVec4" => AttributeType::IVec4,
            "fvec2" | "Vec2" => AttributeType::Vec2,
            "fvec3" | "Vec3" => AttributeType::Vec3,
            "fvec4" | "Vec4" => AttributeType::Vec4,
            "mat2x2" | "Mat2" => AttributeType::Mat2,
            "mat3x3" | "Mat3" => AttributeType::Mat3,
            "mat3x4" | "Mat3x4" => AttributeType::Mat3x4,
            "mat4x3" | "Mat4x3" => AttributeType::Mat4x3,
            "mat4x4" | "Mat4" => AttributeType::Mat4,
            "bool" | "Bool" => AttributeType::Bool,
            "string" | "String" => AttributeType::String,
            "path" | "Path" => AttributeType::Path,
            "FixedString" => AttributeType::FixedString,
            "LSString" => AttributeType::LSString,
            "uint64" | "ULongLong" => AttributeType::UInt64,
            "ScratchBuffer" => AttributeType::ScratchBuffer,
            "old_int64" | "Long" => AttributeType::Long,
            "int8" | "Int8" => AttributeType::Int8,
            "TranslatedString" => AttributeType::TranslatedString,
            "WString" => AttributeType::WString,
            "LSWString" => AttributeType::LSWString,
            "guid" | "UUID" => AttributeType::Uuid,
            "int64" | "Int64" => AttributeType::Int64,
            "TranslatedFSString" => AttributeType::TranslatedFSString,
            _ => return None,
        };
        Some(ty)
    }

    /// Byte size of fixed-width payloads, `None` for variable-length types.
    #[must_use]
    pub fn fixed_size(self) -> Option<usize> {
        let size = match self {
            AttributeType::None => 0,
            AttributeType::UInt8 | AttributeType::Int8 | AttributeType::Bool => 1,
            AttributeType::Int16 | AttributeType::UInt16 => 2,
            AttributeType::Int32 | AttributeType::UInt32 | AttributeType::Float => 4,
            AttributeType::Double
            | AttributeType::UInt64
            | AttributeType::Long
            | AttributeType::Int64
            | AttributeType::IVec2
            | AttributeType::Vec2 => 8,
            AttributeType::IVec3 | AttributeType::Vec3 => 12,
            AttributeType::IVec4 | AttributeType::Vec4 | AttributeType::Mat2 | AttributeType::Uuid => 16,
            AttributeType::Mat3 => 36,
            AttributeType::Mat3x4 | AttributeType::Mat4x3 => 48,
            AttributeType::Mat4 => 64,
            AttributeType::String
            | AttributeType::Path
            | AttributeType::FixedString
            | AttributeType::LSString
            | AttributeType::WString
            | AttributeType::LSWString
            | AttributeType::ScratchBuffer
            | AttributeType::TranslatedString
            | AttributeType::TranslatedFSString => return None,
        };
        Some(size)
    }
}

/// A localizable string: a stable handle plus either a literal or a
/// late-bound version number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedString {
    pub version: u16,
    /// Literal text; `None` when the string is resolved at runtime.
    pub value: Option<String>,
    pub handle: String,
}

impl TranslatedString {
    /// A late-localized string carrying only handle and version.
    #[must_use]
    pub fn late(handle: impl Into<String>, version: u16) -> Self {
        TranslatedString {
            version,
            value: None,
            handle: handle.into(),
        }
    }

    /// A string with inline literal text.
    #[must_use]
    pub fn literal(handle: impl Into<String>, value: impl Into<String>) -> Self {
        TranslatedString {
            version: 0,
            value: Some(value.into()),
            handle: handle.into(),
        }
    }
}

/// A runtime-formattable localizable string with named arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedFsString {
    pub version: u16,
    pub value: Option<String>,
    pub handle: String,
    pub arguments: Vec<TranslatedFsStringArgument>,
}

/// One named argument slot of a [`TranslatedFsString`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedFsStringArgument {
    pub key: String,
    pub string: TranslatedFsString,
    pub value: String,
}

/// A typed attribute value. The variant is the type tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeAttribute {
    None,
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Float(f32),
    Double(f64),
    IVec2([i32; 2]),
    IVec3([i32; 3]),
    IVec4([i32; 4]),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat2([f32; 4]),
    Mat3([f32; 9]),
    Mat3x4([f32; 12]),
    Mat4x3([f32; 12]),
    Mat4([f32; 16]),
    Bool(bool),
    String(String),
    Path(String),
    FixedString(String),
    LSString(String),
    UInt64(u64),
    /// Opaque bytes, never interpreted (compiled story bytecode lives here).
    ScratchBuffer(Vec<u8>),
    Long(i64),
    Int8(i8),
    TranslatedString(TranslatedString),
    WString(String),
    LSWString(String),
    Uuid(Uuid),
    Int64(i64),
    TranslatedFSString(TranslatedFsString),
}

impl NodeAttribute {
    #[must_use]
    pub fn type_id(&self) -> AttributeType {
        match self {
            NodeAttribute::None => AttributeType::None,
            NodeAttribute::UInt8(_) => AttributeType::UInt8,
            NodeAttribute::Int16(_) => AttributeType::Int16,
            NodeAttribute::UInt16(_) => AttributeType::UInt16,
            NodeAttribute::Int32(_) => AttributeType::Int32,
            NodeAttribute::UInt32(_) => AttributeType::UInt32,
            NodeAttribute::Float(_) => AttributeType::Float,
            NodeAttribute::Double(_) => AttributeType::Double,
            NodeAttribute::IVec2(_) => AttributeType::IVec2,
            NodeAttribute::IVec3(_) => AttributeType::IVec3,
            NodeAttribute::IVec4(_) => AttributeType::IVec4,
            NodeAttribute::Vec2(_) => AttributeType::Vec2,
            NodeAttribute::Vec3(_) => AttributeType::Vec3,
            NodeAttribute::Vec4(_) => AttributeType::Vec4,
            NodeAttribute::Mat2(_) => AttributeType::Mat2,
            NodeAttribute::Mat3(_) => AttributeType::Mat3,
            NodeAttribute::Mat3x4(_) => AttributeType::Mat3x4,
            NodeAttribute::Mat4x3(_) => AttributeType::Mat4x3,
            NodeAttribute::Mat4(_) => AttributeType::Mat4,
            NodeAttribute::Bool(_) => AttributeType::Bool,
            NodeAttribute::String(_) => AttributeType::String,
            NodeAttribute::Path(_) => AttributeType::Path,
            NodeAttribute::FixedString(_) => AttributeType::FixedString,
            NodeAttribute::LSString(_) => AttributeType::LSString,
            NodeAttribute::UInt64(_) => AttributeType::UInt64,
            NodeAttribute::ScratchBuffer(_) => AttributeType::ScratchBuffer,
            NodeAttribute::Long(_) => AttributeType::Long,
            NodeAttribute::Int8(_) => AttributeType::Int8,
            NodeAttribute::TranslatedString(_) => AttributeType::TranslatedString,
            NodeAttribute::WString(_) => AttributeType::WString,
            NodeAttribute::LSWString(_) => AttributeType::LSWString,
            NodeAttribute::Uuid(_) => AttributeType::Uuid,
            NodeAttribute::Int64(_) => AttributeType::Int64,
            NodeAttribute::TranslatedFSString(_) => AttributeType::TranslatedFSString,
        }
    }

    /// Text of the string-like variants.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            NodeAttribute::String(s)
            | NodeAttribute::Path(s)
            | NodeAttribute::FixedString(s)
            | NodeAttribute::LSString(s)
            | NodeAttribute::WString(s)
            | NodeAttribute::LSWString(s) => Some(s),
            _ => None,
        }
    }
}
