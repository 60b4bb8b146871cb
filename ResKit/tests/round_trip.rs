//! Every attribute type through every codec and version

mod common;

use common::{Localized, init_tracing, sample_resource};
use pretty_assertions::assert_eq;
use reskit::compression::{CompressionLevel, CompressionMethod};
use reskit::prelude::*;

#[test]
fn test_lsb_bg3_round_trip() {
    init_tracing();
    let options = LsbWriteOptions::for_game(Game::BaldursGate3);
    for mode in [Localized::Literal, Localized::Late] {
        let resource = sample_resource(mode);
        let bytes = serialize_lsb(&resource, &options).unwrap();
        assert_eq!(parse_lsb_bytes(&bytes).unwrap(), resource, "{mode:?}");
    }
}

#[test]
fn test_lsb_legacy_round_trip() {
    let resource = sample_resource(Localized::Literal);
    let options = LsbWriteOptions::for_game(Game::DivinityOriginalSin2DE);
    let bytes = serialize_lsb(&resource, &options).unwrap();
    assert_eq!(&bytes[..4], &0x4000_0000u32.to_le_bytes());
    assert_eq!(parse_lsb_bytes(&bytes).unwrap(), resource);
}

#[test]
fn test_lsb_keeps_timestamp() {
    let mut resource = sample_resource(Localized::Late);
    resource.metadata.timestamp = 0x0123_4567_89AB_CDEF;
    let bytes = serialize_lsb(&resource, &LsbWriteOptions::default()).unwrap();
    assert_eq!(parse_lsb_bytes(&bytes).unwrap().metadata.timestamp, 0x0123_4567_89AB_CDEF);
}

#[test]
fn test_lsf_round_trip_every_version() {
    init_tracing();
    for raw in 1..=6 {
        let version = LsfVersion::from_u32(raw).unwrap();
        // Translated literals only exist before v4
        let mode = if version >= LsfVersion::Bg3 {
            Localized::Late
        } else {
            Localized::Literal
        };
        let resource = sample_resource(mode);

        for sibling_data in [false, true] {
            let options = LsfWriteOptions::default()
                .with_version(version)
                .with_sibling_data(sibling_data);
            let bytes = serialize_lsf(&resource, &options).unwrap();
            assert_eq!(
                parse_lsf_bytes(&bytes).unwrap(),
                resource,
                "v{raw} sibling_data={sibling_data}"
            );
        }
    }
}

#[test]
fn test_lsf_compression_round_trip() {
    let resource = sample_resource(Localized::Late);
    for method in [CompressionMethod::None, CompressionMethod::Zlib, CompressionMethod::Lz4] {
        for level in [CompressionLevel::Fast, CompressionLevel::Default, CompressionLevel::Max] {
            let options = LsfWriteOptions::default()
                .with_compression(method)
                .with_level(level);
            let bytes = serialize_lsf(&resource, &options).unwrap();
            assert_eq!(parse_lsf_bytes(&bytes).unwrap(), resource, "{method:?} {level:?}");
        }
    }
}

#[test]
fn test_lsx_round_trip() {
    init_tracing();
    for version in [LsxVersion::V3, LsxVersion::V4] {
        for pretty_print in [true, false] {
            for mode in [Localized::Literal, Localized::Late] {
                let resource = sample_resource(mode);
                let options = LsxWriteOptions::default()
                    .with_version(version)
                    .with_pretty_print(pretty_print);
                let xml = serialize_lsx(&resource, &options).unwrap();
                assert_eq!(
                    parse_lsx(&xml).unwrap(),
                    resource,
                    "{version:?} pretty={pretty_print} {mode:?}"
                );
            }
        }
    }
}

#[test]
fn test_lsx_without_guid_swap() {
    let mut resource = sample_resource(Localized::Literal);
    resource.metadata = Metadata::new(3, 1, 6, 12);
    let options = LsxWriteOptions::for_game(Game::DivinityOriginalSin);
    let xml = serialize_lsx(&resource, &options).unwrap();
    assert!(xml.contains(r#"value="c7c13742-bacd-460a-8f65-f864fe41f255""#));
    assert_eq!(parse_lsx(&xml).unwrap(), resource);
}

#[test]
fn test_stream_entry_points() {
    let resource = sample_resource(Localized::Late);

    let mut lsb = Vec::new();
    write_lsb(&resource, &mut lsb, &LsbWriteOptions::default()).unwrap();
    assert_eq!(read_lsb(&mut lsb.as_slice()).unwrap(), resource);

    let mut lsf = Vec::new();
    write_lsf(&resource, &mut lsf, &LsfWriteOptions::default()).unwrap();
    assert_eq!(read_lsf(&mut lsf.as_slice()).unwrap(), resource);

    let mut lsx = Vec::new();
    write_lsx(&resource, &mut lsx, &LsxWriteOptions::default()).unwrap();
    assert_eq!(read_lsx(&mut lsx.as_slice()).unwrap(), resource);
}
