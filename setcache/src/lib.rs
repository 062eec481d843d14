//! # SetCache
//!
//! SetCache is a library for simulating a single set-associative, write-back cache
//!
//! It provides a cache which models hits and misses, LRU or random replacement, and write-back of
//! dirty blocks to a pluggable backing store, plus a simulator which replays textual traces
//! against a configured cache
//!
//! All cache traffic to memory goes through the [`memory::BackingStore`] trait, so tests can
//! record and assert on the exact order of reads and writes

/// Contains the implementation of the cache and its geometry
pub mod cache;

/// Splits addresses into word offset, set index and tag, and back
pub mod codec;

/// Contains definitions for the JSON configuration format
pub mod config;

/// Error types for configuration and trace handling
pub mod error;

/// Reading trace files from disk
pub mod io;

/// The backing store trait, with a sparse main memory and a recording wrapper
pub mod memory;

/// Contains the replacement policies, and the source of victims for random replacement
pub mod replacement_policies;

/// Contains the simulator used to replay a trace with a given cache configuration
pub mod simulator;

/// Parsing of the trace format
pub mod trace;

#[cfg(test)]
mod test;

/// Contains utilities for running tests and benchmarks.
pub mod util;

pub use cache::{Cache, CacheGeometry, CACHE_HIT_CYCLE, CACHE_MISS_CYCLE};
pub use memory::BackingStore;
pub use replacement_policies::ReplacementPolicy;
