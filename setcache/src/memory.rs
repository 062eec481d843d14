use std::collections::HashMap;

/// The memory behind a cache, and the only I/O boundary of the simulator.
///
/// The cache calls these synchronously and treats them as infallible. Every call is made at a
/// 4-byte-aligned address inside the block being written back or filled, in ascending order
/// within that block, and all write-backs for a miss happen before the fill reads
pub trait BackingStore {
    fn read_word(&mut self, address: u32) -> u32;

    fn write_word(&mut self, address: u32, value: u32);
}

impl<B: BackingStore + ?Sized> BackingStore for &mut B {
    fn read_word(&mut self, address: u32) -> u32 {
        (**self).read_word(address)
    }

    fn write_word(&mut self, address: u32, value: u32) {
        (**self).write_word(address, value)
    }
}

/// Word-addressed main memory which only stores the words that have been written.
///
/// Words which were never written read as the fill value
#[derive(Debug, Clone, Default)]
pub struct SparseMemory {
    words: HashMap<u32, u32>,
    fill: u32,
}

impl SparseMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fill(fill: u32) -> Self {
        Self {
            words: HashMap::new(),
            fill,
        }
    }

    /// Reads a word without going through the cache. Used to inspect what has been written back
    pub fn peek(&self, address: u32) -> u32 {
        *self.words.get(&(address & !3)).unwrap_or(&self.fill)
    }

    pub fn written_word_count(&self) -> usize {
        self.words.len()
    }
}

impl BackingStore for SparseMemory {
    fn read_word(&mut self, address: u32) -> u32 {
        self.peek(address)
    }

    fn write_word(&mut self, address: u32, value: u32) {
        self.words.insert(address & !3, value);
    }
}

/// A single call made to a backing store
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MemoryOp {
    Read { address: u32, value: u32 },
    Write { address: u32, value: u32 },
}

/// Wraps a backing store and records every call made to it, in order
#[derive(Debug, Clone, Default)]
pub struct RecordingMemory<M: BackingStore> {
    inner: M,
    log: Vec<MemoryOp>,
}

impl<M: BackingStore> RecordingMemory<M> {
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            log: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[MemoryOp] {
        &self.log
    }

    /// Returns the recorded calls, leaving the log empty
    pub fn take_ops(&mut self) -> Vec<MemoryOp> {
        std::mem::take(&mut self.log)
    }

    pub fn read_addresses(&self) -> Vec<u32> {
        self.log.iter().filter_map(|op| match op {
            MemoryOp::Read { address, .. } => Some(*address),
            MemoryOp::Write { .. } => None,
        }).collect()
    }

    pub fn write_addresses(&self) -> Vec<u32> {
        self.log.iter().filter_map(|op| match op {
            MemoryOp::Write { address, .. } => Some(*address),
            MemoryOp::Read { .. } => None,
        }).collect()
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn into_inner(self) -> M {
        self.inner
    }
}

impl<M: BackingStore> BackingStore for RecordingMemory<M> {
    fn read_word(&mut self, address: u32) -> u32 {
        let value = self.inner.read_word(address);
        self.log.push(MemoryOp::Read { address, value });
        value
    }

    fn write_word(&mut self, address: u32, value: u32) {
        self.inner.write_word(address, value);
        self.log.push(MemoryOp::Write { address, value });
    }
}
