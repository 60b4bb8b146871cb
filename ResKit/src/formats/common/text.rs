//! Textual attribute values as written in LSX `value="..."` attributes

use crate::error::{Error, Result};
use crate::resource::{AttributeType, NodeAttribute, TranslatedFsString, TranslatedString};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;

fn join<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Swap each byte pair of the last 8 bytes of a GUID.
///
/// Documents from engine major 4 onward store the tail this way in text.
#[must_use]
pub fn swap_guid_tail(uuid: &Uuid) -> Uuid {
    let mut bytes = *uuid.as_bytes();
    for i in (8..16).step_by(2) {
        bytes.swap(i, i + 1);
    }
    Uuid::from_bytes(bytes)
}

/// Render a value the way LSX stores it.
///
/// Translated strings render their literal (empty when unset); their handle
/// and version are separate XML attributes.
#[must_use]
pub fn format_value(attr: &NodeAttribute, bswap_guids: bool) -> String {
    match attr {
        NodeAttribute::None => String::new(),
        NodeAttribute::UInt8(v) => v.to_string(),
        NodeAttribute::Int8(v) => v.to_string(),
        NodeAttribute::Int16(v) => v.to_string(),
        NodeAttribute::UInt16(v) => v.to_string(),
        NodeAttribute::Int32(v) => v.to_string(),
        NodeAttribute::UInt32(v) => v.to_string(),
        NodeAttribute::UInt64(v) => v.to_string(),
        NodeAttribute::Long(v) | NodeAttribute::Int64(v) => v.to_string(),
        NodeAttribute::Float(v) => v.to_string(),
        NodeAttribute::Double(v) => v.to_string(),
        NodeAttribute::Bool(v) => if *v { "True" } else { "False" }.to_string(),
        NodeAttribute::IVec2(v) => join(v),
        NodeAttribute::IVec3(v) => join(v),
        NodeAttribute::IVec4(v) => join(v),
        NodeAttribute::Vec2(v) => join(v),
        NodeAttribute::Vec3(v) => join(v),
        NodeAttribute::Vec4(v) | NodeAttribute::Mat2(v) => join(v),
        NodeAttribute::Mat3(v) => join(v),
        NodeAttribute::Mat3x4(v) | NodeAttribute::Mat4x3(v) => join(v),
        NodeAttribute::Mat4(v) => join(v),
        NodeAttribute::String(s)
        | NodeAttribute::Path(s)
        | NodeAttribute::FixedString(s)
        | NodeAttribute::LSString(s)
        | NodeAttribute::WString(s)
        | NodeAttribute::LSWString(s) => s.clone(),
        NodeAttribute::ScratchBuffer(bytes) => BASE64.encode(bytes),
        NodeAttribute::Uuid(uuid) => {
            let uuid = if bswap_guids { swap_guid_tail(uuid) } else { *uuid };
            uuid.hyphenated().to_string()
        }
        NodeAttribute::TranslatedString(ts) => ts.value.clone().unwrap_or_default(),
        NodeAttribute::TranslatedFSString(fs) => fs.value.clone().unwrap_or_default(),
    }
}

fn invalid(ty: AttributeType, text: &str) -> Error {
    Error::InvalidAttributeValue {
        type_name: ty.name(),
        value: text.to_string(),
    }
}

fn parse_scalar<T: FromStr>(ty: AttributeType, text: &str) -> Result<T> {
    text.trim().parse().map_err(|_| invalid(ty, text))
}

fn parse_array<T: FromStr + Default + Copy, const N: usize>(
    ty: AttributeType,
    text: &str,
) -> Result<[T; N]> {
    let mut out = [T::default(); N];
    let mut parts = text.split_whitespace();
    for slot in &mut out {
        let part = parts.next().ok_or_else(|| invalid(ty, text))?;
        *slot = part.parse().map_err(|_| invalid(ty, text))?;
    }
    if parts.next().is_some() {
        return Err(invalid(ty, text));
    }
    Ok(out)
}

/// Parse an LSX value string for the given type.
///
/// # Errors
/// Returns [`Error::InvalidAttributeValue`] when the text does not fit the type.
pub fn parse_value(ty: AttributeType, text: &str, bswap_guids: bool) -> Result<NodeAttribute> {
    Ok(match ty {
        AttributeType::None => NodeAttribute::None,
        AttributeType::UInt8 => NodeAttribute::UInt8(parse_scalar(ty, text)?),
        AttributeType::Int8 => NodeAttribute::Int8(parse_scalar(ty, text)?),
        AttributeType::Int16 => NodeAttribute::Int16(parse_scalar(ty, text)?),
        AttributeType::UInt16 => NodeAttribute::UInt16(parse_scalar(ty, text)?),
        AttributeType::Int32 => NodeAttribute::Int32(parse_scalar(ty, text)?),
        AttributeType::UInt32 => NodeAttribute::UInt32(parse_scalar(ty, text)?),
        AttributeType::UInt64 => NodeAttribute::UInt64(parse_scalar(ty, text)?),
        AttributeType::Long => NodeAttribute::Long(parse_scalar(ty, text)?),
        AttributeType::Int64 => NodeAttribute::Int64(parse_scalar(ty, text)?),
        AttributeType::Float => NodeAttribute::Float(parse_scalar(ty, text)?),
        AttributeType::Double => NodeAttribute::Double(parse_scalar(ty, text)?),
        AttributeType::Bool => NodeAttribute::Bool(match text.trim() {
            "True" | "true" | "1" => true,
            "False" | "false" | "0" => false,
            _ => return Err(invalid(ty, text)),
        }),
        AttributeType::IVec2 => NodeAttribute::IVec2(parse_array(ty, text)?),
        AttributeType::IVec3 => NodeAttribute::IVec3(parse_array(ty, text)?),
        AttributeType::IVec4 => NodeAttribute::IVec4(parse_array(ty, text)?),
        AttributeType::Vec2 => NodeAttribute::Vec2(parse_array(ty, text)?),
        AttributeType::Vec3 => NodeAttribute::Vec3(parse_array(ty, text)?),
        AttributeType::Vec4 => NodeAttribute::Vec4(parse_array(ty, text)?),
        AttributeType::Mat2 => NodeAttribute::Mat2(parse_array(ty, text)?),
        AttributeType::Mat3 => NodeAttribute::Mat3(parse_array(ty, text)?),
        AttributeType::Mat3x4 => NodeAttribute::Mat3x4(parse_array(ty, text)?),
        AttributeType::Mat4x3 => NodeAttribute::Mat4x3(parse_array(ty, text)?),
        AttributeType::Mat4 => NodeAttribute::Mat4(parse_array(ty, text)?),
        AttributeType::String => NodeAttribute::String(text.to_string()),
        AttributeType::Path => NodeAttribute::Path(text.to_string()),
        AttributeType::FixedString => NodeAttribute::FixedString(text.to_string()),
        AttributeType::LSString => NodeAttribute::LSString(text.to_string()),
        AttributeType::WString => NodeAttribute::WString(text.to_string()),
        AttributeType::LSWString => NodeAttribute::LSWString(text.to_string()),
        AttributeType::ScratchBuffer => NodeAttribute::ScratchBuffer(
            BASE64
                .decode(text.trim())
                .map_err(|_| invalid(ty, text))?,
        ),
        AttributeType::Uuid => {
            let uuid = Uuid::parse_str(text.trim()).map_err(|_| invalid(ty, text))?;
            NodeAttribute::Uuid(if bswap_guids { swap_guid_tail(&uuid) } else { uuid })
        }
        AttributeType::TranslatedString => NodeAttribute::TranslatedString(TranslatedString {
            value: Some(text.to_string()),
            ..TranslatedString::default()
        }),
        AttributeType::TranslatedFSString => {
            NodeAttribute::TranslatedFSString(TranslatedFsString {
                value: Some(text.to_string()),
                ..TranslatedFsString::default()
            })
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars_and_vectors() {
        assert_eq!(format_value(&NodeAttribute::Bool(true), false), "True");
        assert_eq!(parse_value(AttributeType::Bool, "False", false).unwrap(), NodeAttribute::Bool(false));
        assert_eq!(format_value(&NodeAttribute::Vec3([1.0, -2.5, 0.125]), false), "1 -2.5 0.125");
        assert_eq!(
            parse_value(AttributeType::IVec2, "3 -4", false).unwrap(),
            NodeAttribute::IVec2([3, -4])
        );
        assert!(matches!(
            parse_value(AttributeType::IVec2, "3", false),
            Err(Error::InvalidAttributeValue { type_name: "ivec2", .. })
        ));
        assert!(parse_value(AttributeType::UInt8, "256", false).is_err());
    }

    #[test]
    fn test_float_text_round_trip() {
        for v in [0.1f32, 1.0e-7, 3.402_823_5e38, -0.0] {
            let text = format_value(&NodeAttribute::Float(v), false);
            assert_eq!(parse_value(AttributeType::Float, &text, false).unwrap(), NodeAttribute::Float(v));
        }
    }

    #[test]
    fn test_scratch_buffer_base64() {
        let attr = NodeAttribute::ScratchBuffer(vec![0, 1, 2, 250]);
        let text = format_value(&attr, false);
        assert_eq!(text, "AAEC+g==");
        assert_eq!(parse_value(AttributeType::ScratchBuffer, &text, false).unwrap(), attr);
    }

    #[test]
    fn test_guid_byte_swap() {
        let uuid = Uuid::parse_str("01234567-89ab-cdef-0123-456789abcdef").unwrap();
        let attr = NodeAttribute::Uuid(uuid);
        assert_eq!(format_value(&attr, false), "01234567-89ab-cdef-0123-456789abcdef");
        assert_eq!(format_value(&attr, true), "01234567-89ab-cdef-2301-6745ab89efcd");
        let parsed = parse_value(AttributeType::Uuid, "01234567-89ab-cdef-2301-6745ab89efcd", true).unwrap();
        assert_eq!(parsed, attr);
    }
}
