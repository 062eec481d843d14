use std::num::ParseIntError;
use thiserror::Error;

/// A cache geometry which the address arithmetic can't work with
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("a cache needs at least one way per set")]
    NoWays,
    #[error("set count {0} is not a power of two")]
    SetCountNotPowerOfTwo(u32),
    #[error("block size of {0} bytes is not a power of two")]
    BlockSizeNotPowerOfTwo(u32),
    #[error("block size of {0} bytes is smaller than a word")]
    BlockSmallerThanWord(u32),
    #[error("{offset_bits} offset bits and {set_index_bits} set index bits leave no tag bits in a 32-bit address")]
    NoTagBits {
        offset_bits: u32,
        set_index_bits: u32,
    },
}

/// Failure while reading or parsing a trace
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("line {line}: unrecognised trace entry {text:?}")]
    Malformed { line: usize, text: String },
    #[error("line {line}: {text:?} is not a 32-bit hex number")]
    BadNumber {
        line: usize,
        text: String,
        #[source]
        source: ParseIntError,
    },
    #[error("couldn't read the trace: {0}")]
    Io(#[from] std::io::Error),
}
