use std::collections::VecDeque;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The replacement policy of a cache.
///
/// The two policies only differ in how a victim is picked when a set has no invalid block left,
/// and in whether an access reorders the set, so a plain enum is enough here
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ReplacementPolicy {
    /// Sets are kept in recency order, position 0 is the most recently used block and the last
    /// position is the victim
    LeastRecentlyUsed,
    /// Victims are picked uniformly at random by a [`VictimSource`], set order carries no meaning
    Random,
}

impl ReplacementPolicy {
    /// Picks the way to evict from a set in which every block is valid
    pub fn choose_victim<V: VictimSource>(&self, way_count: usize, victims: &mut V) -> usize {
        match self {
            ReplacementPolicy::LeastRecentlyUsed => way_count - 1,
            ReplacementPolicy::Random => victims.pick(way_count),
        }
    }

    /// Records an access to `way`, called after every resolved read or write
    ///
    /// For LRU this is a stable move-to-front: the accessed block lands at position 0 and the
    /// blocks that were in front of it each shift back one slot, keeping their relative order.
    /// Returns the new position of the accessed block
    pub fn touch<T>(&self, ways: &mut [T], way: usize) -> usize {
        match self {
            ReplacementPolicy::LeastRecentlyUsed => {
                ways[..=way].rotate_right(1);
                0
            }
            ReplacementPolicy::Random => way,
        }
    }
}

/// Source of way indices for the random replacement policy.
///
/// Kept behind a trait so tests can force particular victims
pub trait VictimSource {
    /// Returns a way index in `0..way_count`
    fn pick(&mut self, way_count: usize) -> usize;
}

/// Uniformly random victims, backed by any `rand` generator
pub struct RandomVictims<R: Rng = StdRng> {
    rng: R,
}

impl RandomVictims {
    /// Reproducible victims, the same seed always gives the same eviction sequence
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomVictims<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> VictimSource for RandomVictims<R> {
    fn pick(&mut self, way_count: usize) -> usize {
        self.rng.gen_range(0..way_count)
    }
}

/// Replays a fixed list of way indices, wrapping around when the list runs out.
///
/// Picks larger than the set are reduced modulo `way_count`, an empty script always picks way 0
#[derive(Debug, Clone, Default)]
pub struct ScriptedVictims {
    script: VecDeque<usize>,
}

impl ScriptedVictims {
    pub fn new(script: impl IntoIterator<Item = usize>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl VictimSource for ScriptedVictims {
    fn pick(&mut self, way_count: usize) -> usize {
        match self.script.pop_front() {
            Some(way) => {
                self.script.push_back(way);
                way % way_count
            }
            None => 0,
        }
    }
}
