/// The three fields of an address as seen by the cache
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DecodedAddress {
    /// Index of the word within the block
    pub word_offset: u32,
    pub set_index: u32,
    pub tag: u32,
}

/// Splits addresses into (word offset, set index, tag) and puts them back together.
///
/// All masks and bit counts are derived once from the geometry. The codec assumes both
/// `set_count` and `block_size_in_bytes` are powers of two, which is enforced by
/// [`CacheGeometry::new`](crate::cache::CacheGeometry::new) before a codec is ever built.
///
/// The two low bits of an address select a byte within a word and are dropped by
/// [`decode`](Self::decode), so `encode(decode(a)) == a` holds for word-aligned addresses.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AddressCodec {
    offset_bit_count: u32,
    offset_mask: u32,
    set_index_bit_count: u32,
    set_index_mask: u32,
}

impl AddressCodec {
    /// Panics if the geometry leaves no tag bits, as `encode` would then shift a `u32` by 32
    pub(crate) fn new(set_count: u32, block_size_in_bytes: u32) -> Self {
        debug_assert!(set_count.is_power_of_two());
        debug_assert!(block_size_in_bytes.is_power_of_two() && block_size_in_bytes >= 4);
        assert!(
            block_size_in_bytes.trailing_zeros() + set_count.trailing_zeros() < u32::BITS,
            "{set_count} sets of {block_size_in_bytes} byte blocks leave no tag bits"
        );
        Self {
            offset_bit_count: block_size_in_bytes.trailing_zeros(),
            offset_mask: block_size_in_bytes - 1,
            set_index_bit_count: set_count.trailing_zeros(),
            set_index_mask: set_count - 1,
        }
    }

    pub fn decode(&self, address: u32) -> DecodedAddress {
        let word_offset = (address & self.offset_mask) >> 2;
        let line = address >> self.offset_bit_count;
        DecodedAddress {
            word_offset,
            set_index: line & self.set_index_mask,
            // Geometry validation guarantees at least one tag bit, so this never shifts by 32
            tag: line >> self.set_index_bit_count,
        }
    }

    pub fn encode(&self, word_offset: u32, set_index: u32, tag: u32) -> u32 {
        (tag << (self.offset_bit_count + self.set_index_bit_count))
            | (set_index << self.offset_bit_count)
            | (word_offset << 2)
    }

    /// Address of the first word of the block containing `address`
    pub fn block_base(&self, address: u32) -> u32 {
        address & !self.offset_mask
    }

    pub fn offset_bit_count(&self) -> u32 {
        self.offset_bit_count
    }

    pub fn offset_mask(&self) -> u32 {
        self.offset_mask
    }

    pub fn set_index_bit_count(&self) -> u32 {
        self.set_index_bit_count
    }

    pub fn set_index_mask(&self) -> u32 {
        self.set_index_mask
    }
}
