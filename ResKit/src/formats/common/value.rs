//! Binary attribute value codec shared by LSB and LSF
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2015 Norbyte (`LSLib`, MIT)
//!
//! SPDX-License-Identifier: MIT

use crate::error::{Error, Result};
use crate::resource::{
    AttributeType, NodeAttribute, TranslatedFsString, TranslatedFsStringArgument, TranslatedString,
};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Seek, SeekFrom};
use uuid::Uuid;

/// Deepest `TranslatedFSString` argument nesting accepted on read or write.
pub const MAX_FS_STRING_DEPTH: usize = 64;

// Smallest possible argument: key length, nested header (u16 version,
// handle length, argument count) and value length.
const MIN_ARGUMENT_SIZE: usize = 4 + 2 + 4 + 4 + 4;

/// Where the length of a variable-size value lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFraming {
    /// The value carries its own u32 length prefix (LSB).
    Prefixed,
    /// The enclosing record holds the length; the cursor spans exactly one
    /// value (LSF).
    Record,
}

/// Wire shape of the `TranslatedString` / `TranslatedFSString` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalizationLayout {
    /// Literal text, version always 0.
    Inline,
    /// u16 version only; the literal is never stored.
    Late,
    /// Version when the literal is unset, otherwise the literal. Reading
    /// tells the two apart by peeking at the bytes after the version.
    Sniffed,
}

pub(crate) fn remaining(cursor: &Cursor<&[u8]>) -> usize {
    (cursor.get_ref().len() as u64).saturating_sub(cursor.position()) as usize
}

pub(crate) fn ensure_remaining(cursor: &Cursor<&[u8]>, needed: usize) -> Result<()> {
    let remaining = remaining(cursor);
    if needed > remaining {
        return Err(Error::TruncatedData { needed, remaining });
    }
    Ok(())
}

pub(crate) fn read_bytes(cursor: &mut Cursor<&[u8]>, len: usize) -> Result<Vec<u8>> {
    ensure_remaining(cursor, len)?;
    let mut bytes = vec![0u8; len];
    cursor.read_exact(&mut bytes)?;
    Ok(bytes)
}

pub(crate) fn read_u32(cursor: &mut Cursor<&[u8]>) -> Result<u32> {
    ensure_remaining(cursor, 4)?;
    Ok(cursor.read_u32::<LittleEndian>()?)
}

fn read_u16(cursor: &mut Cursor<&[u8]>) -> Result<u16> {
    ensure_remaining(cursor, 2)?;
    Ok(cursor.read_u16::<LittleEndian>()?)
}

/// Decode `bytes` whose last byte is the terminator.
///
/// Trailing NULs inside the declared length are stripped first; when that
/// happens a non-zero terminator is tolerated.
pub(crate) fn decode_terminated(bytes: &[u8]) -> Result<String> {
    let Some((&terminator, content)) = bytes.split_last() else {
        return Ok(String::new());
    };
    let text_len = content.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1);
    let cleaned = text_len < content.len();
    if terminator != 0 && !cleaned {
        return Err(Error::InvalidTerminator);
    }
    Ok(String::from_utf8(content[..text_len].to_vec())?)
}

fn decode_wide_terminated(bytes: &[u8]) -> Result<String> {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    let Some((&terminator, content)) = units.split_last() else {
        return Ok(String::new());
    };
    let text_len = content.iter().rposition(|&u| u != 0).map_or(0, |p| p + 1);
    if terminator != 0 && text_len == content.len() {
        return Err(Error::InvalidTerminator);
    }
    String::from_utf16(&content[..text_len]).map_err(|_| Error::InvalidAttributeValue {
        type_name: AttributeType::WString.name(),
        value: String::from_utf16_lossy(&content[..text_len]),
    })
}

/// Read a u32-length-prefixed, null-terminated UTF-8 string.
pub(crate) fn read_prefixed_string(cursor: &mut Cursor<&[u8]>) -> Result<String> {
    let len = read_u32(cursor)? as usize;
    let bytes = read_bytes(cursor, len)?;
    decode_terminated(&bytes)
}

fn read_string(cursor: &mut Cursor<&[u8]>, framing: ValueFraming) -> Result<String> {
    match framing {
        ValueFraming::Prefixed => read_prefixed_string(cursor),
        ValueFraming::Record => {
            let bytes = read_bytes(cursor, remaining(cursor))?;
            decode_terminated(&bytes)
        }
    }
}

fn read_wide_string(cursor: &mut Cursor<&[u8]>, framing: ValueFraming) -> Result<String> {
    let byte_len = match framing {
        ValueFraming::Prefixed => {
            let units = read_u32(cursor)? as usize;
            units.checked_mul(2).ok_or_else(|| Error::TruncatedData {
                needed: usize::MAX,
                remaining: remaining(cursor),
            })?
        }
        ValueFraming::Record => remaining(cursor),
    };
    let bytes = read_bytes(cursor, byte_len)?;
    decode_wide_terminated(&bytes)
}

fn read_i32s<const N: usize>(cursor: &mut Cursor<&[u8]>) -> Result<[i32; N]> {
    let mut out = [0i32; N];
    for v in &mut out {
        *v = cursor.read_i32::<LittleEndian>()?;
    }
    Ok(out)
}

fn read_f32s<const N: usize>(cursor: &mut Cursor<&[u8]>) -> Result<[f32; N]> {
    let mut out = [0f32; N];
    for v in &mut out {
        *v = cursor.read_f32::<LittleEndian>()?;
    }
    Ok(out)
}

fn read_localized_header(
    cursor: &mut Cursor<&[u8]>,
    layout: LocalizationLayout,
) -> Result<(u16, Option<String>)> {
    match layout {
        LocalizationLayout::Inline => Ok((0, Some(read_prefixed_string(cursor)?))),
        LocalizationLayout::Late => Ok((read_u16(cursor)?, None)),
        LocalizationLayout::Sniffed => {
            let version = read_u16(cursor)?;
            let peek = read_u16(cursor)?;
            if peek == 0 {
                // The u16 we took for a version was the low half of a literal's length
                cursor.seek(SeekFrom::Current(-4))?;
                Ok((0, Some(read_prefixed_string(cursor)?)))
            } else {
                cursor.seek(SeekFrom::Current(-2))?;
                Ok((version, None))
            }
        }
    }
}

fn read_translated_string(
    cursor: &mut Cursor<&[u8]>,
    layout: LocalizationLayout,
) -> Result<TranslatedString> {
    let (version, value) = read_localized_header(cursor, layout)?;
    let handle = read_prefixed_string(cursor)?;
    Ok(TranslatedString {
        version,
        value,
        handle,
    })
}

fn read_fs_string(
    cursor: &mut Cursor<&[u8]>,
    layout: LocalizationLayout,
    depth: usize,
) -> Result<TranslatedFsString> {
    if depth > MAX_FS_STRING_DEPTH {
        return Err(Error::NestingTooDeep {
            limit: MAX_FS_STRING_DEPTH,
        });
    }

    let (version, value) = read_localized_header(cursor, layout)?;
    let handle = read_prefixed_string(cursor)?;
    let count = read_u32(cursor)? as usize;
    ensure_remaining(cursor, count.saturating_mul(MIN_ARGUMENT_SIZE))?;

    let mut arguments = Vec::with_capacity(count);
    for _ in 0..count {
        let key = read_prefixed_string(cursor)?;
        let string = read_fs_string(cursor, layout, depth + 1)?;
        let value = read_prefixed_string(cursor)?;
        arguments.push(TranslatedFsStringArgument { key, string, value });
    }

    Ok(TranslatedFsString {
        version,
        value,
        handle,
        arguments,
    })
}

/// Decode one attribute value of type `ty` at the cursor.
///
/// # Errors
/// Returns [`Error::TruncatedData`] when a fixed-size value or a declared
/// length runs past the buffer, [`Error::InvalidTerminator`] for a string
/// missing its terminator.
pub fn read_value(
    cursor: &mut Cursor<&[u8]>,
    ty: AttributeType,
    framing: ValueFraming,
    layout: LocalizationLayout,
) -> Result<NodeAttribute> {
    if let Some(size) = ty.fixed_size() {
        ensure_remaining(cursor, size)?;
    }

    Ok(match ty {
        AttributeType::None => NodeAttribute::None,
        AttributeType::UInt8 => NodeAttribute::UInt8(cursor.read_u8()?),
        AttributeType::Int8 => NodeAttribute::Int8(cursor.read_i8()?),
        AttributeType::Int16 => NodeAttribute::Int16(cursor.read_i16::<LittleEndian>()?),
        AttributeType::UInt16 => NodeAttribute::UInt16(cursor.read_u16::<LittleEndian>()?),
        AttributeType::Int32 => NodeAttribute::Int32(cursor.read_i32::<LittleEndian>()?),
        AttributeType::UInt32 => NodeAttribute::UInt32(cursor.read_u32::<LittleEndian>()?),
        AttributeType::Float => NodeAttribute::Float(cursor.read_f32::<LittleEndian>()?),
        AttributeType::Double => NodeAttribute::Double(cursor.read_f64::<LittleEndian>()?),
        AttributeType::UInt64 => NodeAttribute::UInt64(cursor.read_u64::<LittleEndian>()?),
        AttributeType::Long => NodeAttribute::Long(cursor.read_i64::<LittleEndian>()?),
        AttributeType::Int64 => NodeAttribute::Int64(cursor.read_i64::<LittleEndian>()?),
        AttributeType::Bool => NodeAttribute::Bool(cursor.read_u8()? != 0),
        AttributeType::IVec2 => NodeAttribute::IVec2(read_i32s(cursor)?),
        AttributeType::IVec3 => NodeAttribute::IVec3(read_i32s(cursor)?),
        AttributeType::IVec4 => NodeAttribute::IVec4(read_i32s(cursor)?),
        AttributeType::Vec2 => NodeAttribute::Vec2(read_f32s(cursor)?),
        AttributeType::Vec3 => NodeAttribute::Vec3(read_f32s(cursor)?),
        AttributeType::Vec4 => NodeAttribute::Vec4(read_f32s(cursor)?),
        AttributeType::Mat2 => NodeAttribute::Mat2(read_f32s(cursor)?),
        AttributeType::Mat3 => NodeAttribute::Mat3(read_f32s(cursor)?),
        AttributeType::Mat3x4 => NodeAttribute::Mat3x4(read_f32s(cursor)?),
        AttributeType::Mat4x3 => NodeAttribute::Mat4x3(read_f32s(cursor)?),
        AttributeType::Mat4 => NodeAttribute::Mat4(read_f32s(cursor)?),
        AttributeType::Uuid => {
            let mut raw = [0u8; 16];
            cursor.read_exact(&mut raw)?;
            NodeAttribute::Uuid(Uuid::from_bytes_le(raw))
        }
        AttributeType::String => NodeAttribute::String(read_string(cursor, framing)?),
        AttributeType::Path => NodeAttribute::Path(read_string(cursor, framing)?),
        AttributeType::FixedString => NodeAttribute::FixedString(read_string(cursor, framing)?),
        AttributeType::LSString => NodeAttribute::LSString(read_string(cursor, framing)?),
        AttributeType::WString => NodeAttribute::WString(read_wide_string(cursor, framing)?),
        AttributeType::LSWString => NodeAttribute::LSWString(read_wide_string(cursor, framing)?),
        AttributeType::ScratchBuffer => {
            let len = match framing {
                ValueFraming::Prefixed => read_u32(cursor)? as usize,
                ValueFraming::Record => remaining(cursor),
            };
            NodeAttribute::ScratchBuffer(read_bytes(cursor, len)?)
        }
        AttributeType::TranslatedString => {
            NodeAttribute::TranslatedString(read_translated_string(cursor, layout)?)
        }
        AttributeType::TranslatedFSString => {
            NodeAttribute::TranslatedFSString(read_fs_string(cursor, layout, 0)?)
        }
    })
}

// ============================================================================
// SERIALIZATION
// ============================================================================

fn length_field(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::ValueTooLarge { length: len })
}

/// Write a u32-length-prefixed, null-terminated UTF-8 string.
pub(crate) fn write_prefixed_string(buffer: &mut Vec<u8>, s: &str) -> Result<()> {
    buffer.write_u32::<LittleEndian>(length_field(s.len() + 1)?)?;
    buffer.extend_from_slice(s.as_bytes());
    buffer.push(0);
    Ok(())
}

fn write_string(buffer: &mut Vec<u8>, s: &str, framing: ValueFraming) -> Result<()> {
    match framing {
        ValueFraming::Prefixed => write_prefixed_string(buffer, s),
        ValueFraming::Record => {
            buffer.extend_from_slice(s.as_bytes());
            buffer.push(0);
            Ok(())
        }
    }
}

fn write_wide_string(buffer: &mut Vec<u8>, s: &str, framing: ValueFraming) -> Result<()> {
    let units: Vec<u16> = s.encode_utf16().collect();
    if framing == ValueFraming::Prefixed {
        buffer.write_u32::<LittleEndian>(length_field(units.len() + 1)?)?;
    }
    for unit in units {
        buffer.write_u16::<LittleEndian>(unit)?;
    }
    buffer.write_u16::<LittleEndian>(0)?;
    Ok(())
}

fn write_i32s(buffer: &mut Vec<u8>, values: &[i32]) -> Result<()> {
    for &v in values {
        buffer.write_i32::<LittleEndian>(v)?;
    }
    Ok(())
}

fn write_f32s(buffer: &mut Vec<u8>, values: &[f32]) -> Result<()> {
    for &v in values {
        buffer.write_f32::<LittleEndian>(v)?;
    }
    Ok(())
}

fn write_localized_header(
    buffer: &mut Vec<u8>,
    version: u16,
    value: Option<&str>,
    handle: &str,
    layout: LocalizationLayout,
) -> Result<()> {
    match (layout, value) {
        (LocalizationLayout::Inline, value) => write_prefixed_string(buffer, value.unwrap_or("")),
        (LocalizationLayout::Late, Some(_)) => {
            tracing::warn!("Dropping literal of translated string {handle}: format stores versions only");
            Ok(buffer.write_u16::<LittleEndian>(version)?)
        }
        (LocalizationLayout::Sniffed, Some(value)) => write_prefixed_string(buffer, value),
        (LocalizationLayout::Late | LocalizationLayout::Sniffed, None) => {
            Ok(buffer.write_u16::<LittleEndian>(version)?)
        }
    }
}

fn write_fs_string(
    buffer: &mut Vec<u8>,
    fs: &TranslatedFsString,
    layout: LocalizationLayout,
    depth: usize,
) -> Result<()> {
    if depth > MAX_FS_STRING_DEPTH {
        return Err(Error::NestingTooDeep {
            limit: MAX_FS_STRING_DEPTH,
        });
    }

    write_localized_header(buffer, fs.version, fs.value.as_deref(), &fs.handle, layout)?;
    write_prefixed_string(buffer, &fs.handle)?;
    buffer.write_u32::<LittleEndian>(length_field(fs.arguments.len())?)?;
    for argument in &fs.arguments {
        write_prefixed_string(buffer, &argument.key)?;
        write_fs_string(buffer, &argument.string, layout, depth + 1)?;
        write_prefixed_string(buffer, &argument.value)?;
    }
    Ok(())
}

/// Encode one attribute value, returning the number of bytes written.
pub fn write_value(
    buffer: &mut Vec<u8>,
    attr: &NodeAttribute,
    framing: ValueFraming,
    layout: LocalizationLayout,
) -> Result<usize> {
    let start = buffer.len();

    match attr {
        NodeAttribute::None => {}
        NodeAttribute::UInt8(v) => buffer.push(*v),
        NodeAttribute::Int8(v) => buffer.write_i8(*v)?,
        NodeAttribute::Int16(v) => buffer.write_i16::<LittleEndian>(*v)?,
        NodeAttribute::UInt16(v) => buffer.write_u16::<LittleEndian>(*v)?,
        NodeAttribute::Int32(v) => buffer.write_i32::<LittleEndian>(*v)?,
        NodeAttribute::UInt32(v) => buffer.write_u32::<LittleEndian>(*v)?,
        NodeAttribute::Float(v) => buffer.write_f32::<LittleEndian>(*v)?,
        NodeAttribute::Double(v) => buffer.write_f64::<LittleEndian>(*v)?,
        NodeAttribute::UInt64(v) => buffer.write_u64::<LittleEndian>(*v)?,
        NodeAttribute::Long(v) | NodeAttribute::Int64(v) => buffer.write_i64::<LittleEndian>(*v)?,
        NodeAttribute::Bool(v) => buffer.push(u8::from(*v)),
        NodeAttribute::IVec2(v) => write_i32s(buffer, v)?,
        NodeAttribute::IVec3(v) => write_i32s(buffer, v)?,
        NodeAttribute::IVec4(v) => write_i32s(buffer, v)?,
        NodeAttribute::Vec2(v) => write_f32s(buffer, v)?,
        NodeAttribute::Vec3(v) => write_f32s(buffer, v)?,
        NodeAttribute::Vec4(v) | NodeAttribute::Mat2(v) => write_f32s(buffer, v)?,
        NodeAttribute::Mat3(v) => write_f32s(buffer, v)?,
        NodeAttribute::Mat3x4(v) | NodeAttribute::Mat4x3(v) => write_f32s(buffer, v)?,
        NodeAttribute::Mat4(v) => write_f32s(buffer, v)?,
        NodeAttribute::Uuid(v) => buffer.extend_from_slice(&v.to_bytes_le()),
        NodeAttribute::String(s)
        | NodeAttribute::Path(s)
        | NodeAttribute::FixedString(s)
        | NodeAttribute::LSString(s) => write_string(buffer, s, framing)?,
        NodeAttribute::WString(s) | NodeAttribute::LSWString(s) => {
            write_wide_string(buffer, s, framing)?;
        }
        NodeAttribute::ScratchBuffer(bytes) => {
            if framing == ValueFraming::Prefixed {
                buffer.write_u32::<LittleEndian>(length_field(bytes.len())?)?;
            }
            buffer.extend_from_slice(bytes);
        }
        NodeAttribute::TranslatedString(ts) => {
            write_localized_header(buffer, ts.version, ts.value.as_deref(), &ts.handle, layout)?;
            write_prefixed_string(buffer, &ts.handle)?;
        }
        NodeAttribute::TranslatedFSString(fs) => write_fs_string(buffer, fs, layout, 0)?,
    }

    Ok(buffer.len() - start)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8], ty: AttributeType, layout: LocalizationLayout) -> Result<NodeAttribute> {
        let mut cursor = Cursor::new(bytes);
        read_value(&mut cursor, ty, ValueFraming::Prefixed, layout)
    }

    #[test]
    fn test_sniffed_literal_shape() {
        // u32 length 3, "Hi\0", then handle "h1"
        let bytes = [0x03, 0x00, 0x00, 0x00, b'H', b'i', 0x00, 0x03, 0x00, 0x00, 0x00, b'h', b'1', 0x00];
        let value = decode(&bytes, AttributeType::TranslatedString, LocalizationLayout::Sniffed).unwrap();
        assert_eq!(
            value,
            NodeAttribute::TranslatedString(TranslatedString::literal("h1", "Hi"))
        );
    }

    #[test]
    fn test_sniffed_version_shape() {
        // u16 version 5, then handle length 3 (peeked u16 = 3)
        let bytes = [0x05, 0x00, 0x03, 0x00, 0x00, 0x00, b'h', b'1', 0x00];
        let value = decode(&bytes, AttributeType::TranslatedString, LocalizationLayout::Sniffed).unwrap();
        assert_eq!(
            value,
            NodeAttribute::TranslatedString(TranslatedString::late("h1", 5))
        );
    }

    #[test]
    fn test_sniffed_peek_one() {
        let bytes = [0x05, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00];
        let value = decode(&bytes, AttributeType::TranslatedString, LocalizationLayout::Sniffed).unwrap();
        assert_eq!(value, NodeAttribute::TranslatedString(TranslatedString::late("", 5)));
    }

    #[test]
    fn test_trailing_nul_cleanup() {
        assert_eq!(decode_terminated(b"abc\0").unwrap(), "abc");
        // Encoder defect: padding NULs inside the declared length
        assert_eq!(decode_terminated(b"abc\0\0\0").unwrap(), "abc");
        // Cleanup triggered, so the bad terminator is tolerated
        assert_eq!(decode_terminated(b"abc\0x").unwrap(), "abc");
        assert!(matches!(decode_terminated(b"abcd"), Err(Error::InvalidTerminator)));
        assert_eq!(decode_terminated(b"").unwrap(), "");
    }

    #[test]
    fn test_truncated_length_rejected() {
        // Declares 200 bytes, only 3 present
        let bytes = [200, 0, 0, 0, b'a', b'b', 0];
        assert!(matches!(
            decode(&bytes, AttributeType::FixedString, LocalizationLayout::Inline),
            Err(Error::TruncatedData { needed: 200, remaining: 3 })
        ));
        assert!(matches!(
            decode(&[1, 2, 3], AttributeType::Int32, LocalizationLayout::Inline),
            Err(Error::TruncatedData { needed: 4, remaining: 3 })
        ));
    }

    #[test]
    fn test_wide_string_units() {
        let mut buffer = Vec::new();
        let attr = NodeAttribute::WString("Grüße".into());
        let written = write_value(&mut buffer, &attr, ValueFraming::Prefixed, LocalizationLayout::Inline).unwrap();
        // length prefix + 5 units + terminator
        assert_eq!(written, 4 + 6 * 2);
        assert_eq!(&buffer[..4], &[6, 0, 0, 0]);
        assert_eq!(decode(&buffer, AttributeType::WString, LocalizationLayout::Inline).unwrap(), attr);
    }

    #[test]
    fn test_record_framing_uses_cursor_extent() {
        let mut buffer = Vec::new();
        let attr = NodeAttribute::ScratchBuffer(vec![9, 8, 7]);
        assert_eq!(write_value(&mut buffer, &attr, ValueFraming::Record, LocalizationLayout::Late).unwrap(), 3);
        let mut cursor = Cursor::new(buffer.as_slice());
        let read = read_value(&mut cursor, AttributeType::ScratchBuffer, ValueFraming::Record, LocalizationLayout::Late).unwrap();
        assert_eq!(read, attr);
    }

    #[test]
    fn test_fs_string_nesting() {
        let inner = TranslatedFsString {
            version: 2,
            value: None,
            handle: "inner".into(),
            arguments: Vec::new(),
        };
        let outer = TranslatedFsString {
            version: 1,
            value: None,
            handle: "outer".into(),
            arguments: vec![TranslatedFsStringArgument {
                key: "Name".into(),
                string: inner,
                value: "Gale".into(),
            }],
        };
        let attr = NodeAttribute::TranslatedFSString(outer);

        let mut buffer = Vec::new();
        write_value(&mut buffer, &attr, ValueFraming::Record, LocalizationLayout::Late).unwrap();
        let mut cursor = Cursor::new(buffer.as_slice());
        let read = read_value(&mut cursor, AttributeType::TranslatedFSString, ValueFraming::Record, LocalizationLayout::Late).unwrap();
        assert_eq!(read, attr);
    }

    #[test]
    fn test_fs_string_argument_count_bounded() {
        let mut buffer = Vec::new();
        buffer.write_u16::<LittleEndian>(1).unwrap();
        write_prefixed_string(&mut buffer, "h").unwrap();
        buffer.write_u32::<LittleEndian>(u32::MAX).unwrap();
        assert!(matches!(
            decode(&buffer, AttributeType::TranslatedFSString, LocalizationLayout::Late),
            Err(Error::TruncatedData { .. })
        ));
    }

    #[test]
    fn test_fs_string_depth_limit() {
        let mut fs = TranslatedFsString::default();
        for _ in 0..=MAX_FS_STRING_DEPTH {
            fs = TranslatedFsString {
                arguments: vec![TranslatedFsStringArgument {
                    key: "k".into(),
                    string: fs,
                    value: String::new(),
                }],
                ..TranslatedFsString::default()
            };
        }
        let mut buffer = Vec::new();
        assert!(matches!(
            write_value(&mut buffer, &NodeAttribute::TranslatedFSString(fs), ValueFraming::Record, LocalizationLayout::Late),
            Err(Error::NestingTooDeep { .. })
        ));
    }
}
