use log::{debug, trace};
use crate::codec::{AddressCodec, DecodedAddress};
use crate::error::ConfigError;
use crate::memory::BackingStore;
use crate::replacement_policies::{RandomVictims, ReplacementPolicy, VictimSource};

/// Cycles charged for an access which has to go to the backing store
pub const CACHE_MISS_CYCLE: u32 = 50;

/// Cycles charged for an access served by the cache
pub const CACHE_HIT_CYCLE: u32 = 0;

/// The shape of a cache: ways per set, number of sets, and words per block.
///
/// Can only be built through [`CacheGeometry::new`], which rejects anything the address arithmetic
/// can't handle, so every cache is constructed from a valid geometry
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CacheGeometry {
    way_count: usize,
    set_count: u32,
    block_size_in_words: u32,
    codec: AddressCodec,
}

impl CacheGeometry {
    /// Validates a geometry
    ///
    /// # Arguments
    ///
    /// * `way_count`: Blocks per set, at least 1
    /// * `set_count`: Number of sets, a power of two
    /// * `block_size_in_bytes`: Bytes per block, a power of two and at least one word
    ///
    /// returns: Result<CacheGeometry, ConfigError>
    pub fn new(way_count: usize, set_count: u32, block_size_in_bytes: u32) -> Result<Self, ConfigError> {
        if way_count == 0 {
            return Err(ConfigError::NoWays);
        }
        if !set_count.is_power_of_two() {
            return Err(ConfigError::SetCountNotPowerOfTwo(set_count));
        }
        if !block_size_in_bytes.is_power_of_two() {
            return Err(ConfigError::BlockSizeNotPowerOfTwo(block_size_in_bytes));
        }
        if block_size_in_bytes < 4 {
            return Err(ConfigError::BlockSmallerThanWord(block_size_in_bytes));
        }
        let offset_bits = block_size_in_bytes.trailing_zeros();
        let set_index_bits = set_count.trailing_zeros();
        if offset_bits + set_index_bits >= u32::BITS {
            return Err(ConfigError::NoTagBits { offset_bits, set_index_bits });
        }
        Ok(Self {
            way_count,
            set_count,
            block_size_in_words: block_size_in_bytes / 4,
            codec: AddressCodec::new(set_count, block_size_in_bytes),
        })
    }

    pub fn way_count(&self) -> usize {
        self.way_count
    }

    pub fn set_count(&self) -> u32 {
        self.set_count
    }

    pub fn block_size_in_words(&self) -> u32 {
        self.block_size_in_words
    }

    pub fn block_size_in_bytes(&self) -> u32 {
        self.block_size_in_words * 4
    }

    pub fn codec(&self) -> &AddressCodec {
        &self.codec
    }
}

/// One cache line
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Block {
    valid: bool,
    dirty: bool,
    tag: u32,
    data: Vec<u32>,
}

impl Block {
    fn new(block_size_in_words: u32) -> Self {
        Self {
            valid: false,
            dirty: false,
            tag: 0,
            data: vec![0; block_size_in_words as usize],
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn tag(&self) -> u32 {
        self.tag
    }

    pub fn data(&self) -> &[u32] {
        &self.data
    }

    // Storing the value already held must not dirty a clean block
    fn store(&mut self, word_offset: usize, value: u32) -> bool {
        if self.data[word_offset] == value {
            return false;
        }
        self.data[word_offset] = value;
        self.dirty = true;
        true
    }
}

/// Running totals for a cache
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct CacheStats {
    pub reads: u64,
    pub writes: u64,
    pub hits: u64,
    pub misses: u64,
    /// Dirty blocks written back on eviction
    pub write_backs: u64,
    pub cycles: u64,
}

enum Lookup {
    Hit(usize),
    /// Miss, with the first invalid way of the set
    Invalid(usize),
    /// Miss in a set where every way is valid
    Full,
}

/// A set-associative write-back cache in front of a [`BackingStore`].
///
/// Each set is a vector of exactly `way_count` blocks. Under LRU the position of a block in its
/// set is its recency, 0 being the most recently used. The cache is the only thing that talks to
/// its backing store: a miss first writes back a dirty victim word by word, then refills the
/// victim word by word, both in ascending address order
pub struct Cache<M: BackingStore, V: VictimSource = RandomVictims> {
    geometry: CacheGeometry,
    policy: ReplacementPolicy,
    sets: Vec<Vec<Block>>,
    memory: M,
    victims: V,
    stats: CacheStats,
}

impl<M: BackingStore> Cache<M> {
    /// Creates a cache with all blocks invalid. Random victims are seeded from the OS
    pub fn new(geometry: CacheGeometry, policy: ReplacementPolicy, memory: M) -> Self {
        Self::with_victims(geometry, policy, memory, RandomVictims::from_entropy())
    }

    /// Validates the geometry and creates a cache from it
    pub fn create(
        way_count: usize,
        set_count: u32,
        block_size_in_bytes: u32,
        policy: ReplacementPolicy,
        memory: M,
    ) -> Result<Self, ConfigError> {
        let geometry = CacheGeometry::new(way_count, set_count, block_size_in_bytes)?;
        Ok(Self::new(geometry, policy, memory))
    }
}

impl<M: BackingStore, V: VictimSource> Cache<M, V> {
    /// Creates a cache which draws random victims from `victims`
    pub fn with_victims(geometry: CacheGeometry, policy: ReplacementPolicy, memory: M, victims: V) -> Self {
        let set = vec![Block::new(geometry.block_size_in_words); geometry.way_count];
        Self {
            geometry,
            policy,
            sets: vec![set; geometry.set_count as usize],
            memory,
            victims,
            stats: CacheStats::default(),
        }
    }

    /// Whether `address` is currently cached. Doesn't touch recency, statistics, or memory
    pub fn probe(&self, address: u32) -> bool {
        let decoded = self.geometry.codec.decode(address);
        matches!(self.lookup(decoded.set_index, decoded.tag), Lookup::Hit(_))
    }

    /// Reads the word at `address`, returning (cycles, value)
    pub fn read(&mut self, address: u32) -> (u32, u32) {
        let decoded = self.geometry.codec.decode(address);
        let (way, cycles) = self.resolve(address, decoded);
        let set = &mut self.sets[decoded.set_index as usize];
        let value = set[way].data[decoded.word_offset as usize];
        self.policy.touch(set, way);
        self.stats.reads += 1;
        (cycles, value)
    }

    /// Writes `value` to the word at `address`, returning the cycles taken
    pub fn write(&mut self, address: u32, value: u32) -> u32 {
        let decoded = self.geometry.codec.decode(address);
        let (way, cycles) = self.resolve(address, decoded);
        let set = &mut self.sets[decoded.set_index as usize];
        if set[way].store(decoded.word_offset as usize, value) {
            trace!("Block in set {}, way {way} is dirty after writing {address:#010x}", decoded.set_index);
        }
        self.policy.touch(set, way);
        self.stats.writes += 1;
        cycles
    }

    fn lookup(&self, set_index: u32, tag: u32) -> Lookup {
        let mut first_invalid = None;
        for (way, block) in self.sets[set_index as usize].iter().enumerate() {
            if block.valid {
                if block.tag == tag {
                    return Lookup::Hit(way);
                }
            } else if first_invalid.is_none() {
                first_invalid = Some(way);
            }
        }
        first_invalid.map_or(Lookup::Full, Lookup::Invalid)
    }

    /// Finds the block for an access, evicting and refilling on a miss.
    ///
    /// returns: (way of the resolved block, cycles)
    fn resolve(&mut self, address: u32, decoded: DecodedAddress) -> (usize, u32) {
        let DecodedAddress { set_index, tag, .. } = decoded;
        let way = match self.lookup(set_index, tag) {
            Lookup::Hit(way) => {
                trace!("Hit for {address:#010x} in set {set_index}, way {way}");
                self.stats.hits += 1;
                self.stats.cycles += CACHE_HIT_CYCLE as u64;
                return (way, CACHE_HIT_CYCLE);
            }
            Lookup::Invalid(way) => way,
            Lookup::Full => self.policy.choose_victim(self.geometry.way_count, &mut self.victims),
        };
        self.stats.misses += 1;
        self.stats.cycles += CACHE_MISS_CYCLE as u64;

        let codec = self.geometry.codec;
        let block = &mut self.sets[set_index as usize][way];
        if block.valid && block.dirty {
            debug!(
                "Writing back block {:#010x} from set {set_index}, way {way}",
                codec.encode(0, set_index, block.tag)
            );
            for (word_offset, word) in block.data.iter().enumerate() {
                self.memory.write_word(codec.encode(word_offset as u32, set_index, block.tag), *word);
            }
            self.stats.write_backs += 1;
        }

        let base = codec.block_base(address);
        debug!("Miss for {address:#010x}, filling set {set_index}, way {way} from {base:#010x}");
        block.valid = true;
        block.dirty = false;
        block.tag = tag;
        for (word_offset, word) in block.data.iter_mut().enumerate() {
            *word = self.memory.read_word(base + ((word_offset as u32) << 2));
        }
        (way, CACHE_MISS_CYCLE)
    }

    pub fn geometry(&self) -> &CacheGeometry {
        &self.geometry
    }

    pub fn policy(&self) -> ReplacementPolicy {
        self.policy
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// The blocks of a set, in recency order under LRU
    pub fn set(&self, set_index: u32) -> &[Block] {
        &self.sets[set_index as usize]
    }

    /// Number of blocks which have never been filled. Useful for analysing how much of the cache a
    /// workload touches
    pub fn invalid_line_count(&self) -> usize {
        self.sets.iter().flatten().filter(|block| !block.valid).count()
    }

    /// Number of valid blocks holding data not yet written back
    pub fn dirty_line_count(&self) -> usize {
        self.sets.iter().flatten().filter(|block| block.valid && block.dirty).count()
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    /// Drops the cache, handing back its backing store. Dirty blocks are not written back
    pub fn into_memory(self) -> M {
        self.memory
    }
}
