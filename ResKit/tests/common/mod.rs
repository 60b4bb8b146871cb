//! Shared fixtures for the integration tests

#![allow(dead_code)]

use reskit::prelude::*;
use uuid::Uuid;

/// How translated strings are populated in a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Localized {
    /// Inline literal text, version 0.
    Literal,
    /// Version only, no literal.
    Late,
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn translated(handle: &str, mode: Localized) -> TranslatedString {
    match mode {
        Localized::Literal => TranslatedString::literal(handle, "Lae'zel"),
        Localized::Late => TranslatedString::late(handle, 3),
    }
}

fn fs_string(handle: &str, mode: Localized, arguments: Vec<TranslatedFsStringArgument>) -> TranslatedFsString {
    let header = translated(handle, mode);
    TranslatedFsString {
        version: header.version,
        value: header.value,
        handle: header.handle,
        arguments,
    }
}

/// One attribute of every type tag, in tag order.
pub fn every_type_attributes(mode: Localized) -> Vec<(&'static str, NodeAttribute)> {
    let nested = fs_string(
        "h2c9e5a1fg4b6dg4f0dg8a3egb1f2d7c9e0a4",
        mode,
        vec![TranslatedFsStringArgument {
            key: "Damage".into(),
            string: fs_string("h00000000g0000g0000g0000g000000000001", mode, Vec::new()),
            value: "12".into(),
        }],
    );

    vec![
        ("None", NodeAttribute::None),
        ("UInt8", NodeAttribute::UInt8(200)),
        ("Int16", NodeAttribute::Int16(-12_345)),
        ("UInt16", NodeAttribute::UInt16(54_321)),
        ("Int32", NodeAttribute::Int32(-2_000_000_000)),
        ("UInt32", NodeAttribute::UInt32(4_000_000_000)),
        ("Float", NodeAttribute::Float(0.1)),
        ("Double", NodeAttribute::Double(-1234.5678)),
        ("IVec2", NodeAttribute::IVec2([1, -2])),
        ("IVec3", NodeAttribute::IVec3([1, -2, 3])),
        ("IVec4", NodeAttribute::IVec4([1, -2, 3, -4])),
        ("Vec2", NodeAttribute::Vec2([0.5, -0.25])),
        ("Vec3", NodeAttribute::Vec3([1.5, 2.0, -3.75])),
        ("Vec4", NodeAttribute::Vec4([0.0, 1.0, 0.0, 1.0])),
        ("Mat2", NodeAttribute::Mat2([1.0, 0.0, 0.0, 1.0])),
        ("Mat3", NodeAttribute::Mat3([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0])),
        ("Mat3x4", NodeAttribute::Mat3x4([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0])),
        ("Mat4x3", NodeAttribute::Mat4x3([12.0, 11.0, 10.0, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0])),
        (
            "Mat4",
            NodeAttribute::Mat4([
                1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 10.0, 20.0, 30.0, 1.0,
            ]),
        ),
        ("Bool", NodeAttribute::Bool(true)),
        ("String", NodeAttribute::String("Hello <world> & \"friends\"".into())),
        ("Path", NodeAttribute::Path("Public/Shared/Assets/tree.gr2".into())),
        ("FixedString", NodeAttribute::FixedString("S_Player_ShadowHeart".into())),
        ("LSString", NodeAttribute::LSString(String::new())),
        ("UInt64", NodeAttribute::UInt64(u64::MAX)),
        ("ScratchBuffer", NodeAttribute::ScratchBuffer(vec![0, 1, 2, 3, 0xFF, 0x80])),
        ("Long", NodeAttribute::Long(i64::MIN)),
        ("Int8", NodeAttribute::Int8(-128)),
        (
            "TranslatedString",
            NodeAttribute::TranslatedString(translated("h1a2b3c4dg5e6fg4a7bg8c9dge0f1a2b3c4d5", mode)),
        ),
        ("WString", NodeAttribute::WString("Grüße, 世界".into())),
        ("LSWString", NodeAttribute::LSWString("Astarion 🦇".into())),
        (
            "UUID",
            NodeAttribute::Uuid(Uuid::parse_str("c7c13742-bacd-460a-8f65-f864fe41f255").unwrap()),
        ),
        ("Int64", NodeAttribute::Int64(-9_000_000_000)),
        ("TranslatedFSString", NodeAttribute::TranslatedFSString(nested)),
    ]
}

/// A two-region resource holding every attribute type plus a few levels of
/// repeated and distinct child names.
///
/// Region names equal their root node names and the timestamp is 0, so the
/// fixture survives every codec unchanged.
pub fn sample_resource(mode: Localized) -> Resource {
    let mut resource = Resource::new(Metadata::new(4, 0, 9, 331));

    let mut everything = Node::new("Everything");
    for (name, value) in every_type_attributes(mode) {
        everything.set_attribute(name, value);
    }

    let templates = Node::new("Templates")
        .with_attribute("Version", NodeAttribute::Int32(2))
        .with_child(everything)
        .with_child(
            Node::new("GameObjects")
                .with_attribute("MapKey", NodeAttribute::FixedString("a".into()))
                .with_child(Node::new("Tags").with_child(Node::new("Tag")))
                .with_child(Node::new("Scripts")),
        )
        .with_child(Node::new("GameObjects").with_attribute("MapKey", NodeAttribute::FixedString("b".into())))
        .with_child(Node::new("Empty"));
    resource.add_region("Templates", templates).unwrap();

    let config = Node::new("Config").with_attribute("Enabled", NodeAttribute::Bool(false));
    resource.add_region("Config", config).unwrap();

    resource
}
