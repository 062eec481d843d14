use crate::cache::CacheGeometry;
use crate::codec::{AddressCodec, DecodedAddress};

fn codec(set_count: u32, block_size_in_bytes: u32) -> AddressCodec {
    *CacheGeometry::new(1, set_count, block_size_in_bytes).unwrap().codec()
}

#[test]
fn derived_constants() {
    let codec = codec(64, 32);
    assert_eq!(codec.offset_bit_count(), 5);
    assert_eq!(codec.offset_mask(), 0x1F);
    assert_eq!(codec.set_index_bit_count(), 6);
    assert_eq!(codec.set_index_mask(), 0x3F);
}

#[test]
fn decode_splits_offset_set_and_tag() {
    let codec = codec(64, 32);
    let decoded = codec.decode(0x1234_5678);
    assert_eq!(decoded, DecodedAddress {
        word_offset: 0b110,
        set_index: 0b110011,
        tag: 0b100100011010001010,
    });
    assert_eq!(codec.encode(decoded.word_offset, decoded.set_index, decoded.tag), 0x1234_5678);
}

#[test]
fn byte_within_word_is_ignored() {
    let codec = codec(64, 32);
    assert_eq!(codec.decode(0x1234_567B), codec.decode(0x1234_5678));
}

#[test]
fn single_set_has_no_index_bits() {
    let codec = codec(1, 16);
    let decoded = codec.decode(0xFFFF_FFF4);
    assert_eq!(decoded, DecodedAddress { word_offset: 1, set_index: 0, tag: 0x0FFF_FFFF });
    assert_eq!(codec.encode(1, 0, 0x0FFF_FFFF), 0xFFFF_FFF4);
}

#[test]
fn single_word_blocks_have_no_word_offset() {
    let codec = codec(4, 4);
    let decoded = codec.decode(0x0000_001C);
    assert_eq!(decoded, DecodedAddress { word_offset: 0, set_index: 3, tag: 1 });
}

#[test]
fn block_base_clears_the_offset() {
    let codec = codec(8, 64);
    assert_eq!(codec.block_base(0x0000_12FF), 0x0000_12C0);
    assert_eq!(codec.block_base(0x0000_12C0), 0x0000_12C0);
}

#[test]
fn largest_geometry_keeps_one_tag_bit() {
    let codec = AddressCodec::new(1 << 29, 4);
    let decoded = codec.decode(0xFFFF_FFFC);
    assert_eq!(decoded, DecodedAddress { word_offset: 0, set_index: (1 << 29) - 1, tag: 1 });
    assert_eq!(codec.encode(decoded.word_offset, decoded.set_index, decoded.tag), 0xFFFF_FFFC);
}

#[test]
#[should_panic(expected = "leave no tag bits")]
fn codec_without_tag_bits_is_refused() {
    AddressCodec::new(1 << 30, 4);
}
