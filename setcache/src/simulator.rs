use std::io::BufRead;
use std::time::{Duration, Instant};
use log::info;
use serde::{Deserialize, Serialize};
use crate::cache::Cache;
use crate::config::CacheConfig;
use crate::error::{ConfigError, TraceError};
use crate::memory::SparseMemory;
use crate::replacement_policies::RandomVictims;
use crate::trace::{TraceOp, TraceOps};

/// The simulator replays traces against a single cache backed by a sparse main memory, and
/// collects results.
///
/// It supports calling simulate multiple times, and will update the time taken to simulate and the
/// results accordingly
pub struct Simulator {
    cache: Cache<SparseMemory, RandomVictims>,
    result: SimulationResult,
    simulation_time: Duration,
}

/// The result of a simulation. Can be serialised to the output format
#[derive(Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct SimulationResult {
    pub name: String,
    pub reads: u64,
    pub writes: u64,
    pub hits: u64,
    pub misses: u64,
    pub write_backs: u64,
    pub cycles: u64,
    /// Words read from main memory to fill blocks
    pub memory_reads: u64,
    /// Words written to main memory by write-backs
    pub memory_writes: u64,
    /// Dirty blocks still in the cache at the end of the trace
    pub dirty_lines: u64,
}

impl Simulator {
    /// Creates a new simulator for a given configuration
    ///
    /// # Arguments
    ///
    /// * `config`: A cache configuration, usually resulting from parsing JSON
    ///
    /// returns: Result<Simulator, ConfigError>
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        let cache = Cache::with_victims(
            config.geometry()?,
            config.replacement_policy.into(),
            SparseMemory::new(),
            config.victims(),
        );
        Ok(Self {
            cache,
            result: SimulationResult {
                name: config.name.clone(),
                ..Default::default()
            },
            simulation_time: Duration::new(0, 0),
        })
    }

    /// Applies a single access to the cache
    pub fn apply(&mut self, op: TraceOp) {
        match op {
            TraceOp::Read { address } => {
                self.cache.read(address);
            }
            TraceOp::Write { address, value } => {
                self.cache.write(address, value);
            }
        }
    }

    /// Simulates the cache on a textual trace, one access per line.
    ///
    /// Stops at the first malformed line. Accesses before it have already been applied and are
    /// reflected in later results
    ///
    /// # Arguments
    ///
    /// * `reader`: The trace
    ///
    /// returns: Result<&SimulationResult, TraceError>
    pub fn simulate<R: BufRead>(&mut self, reader: R) -> Result<&SimulationResult, TraceError> {
        let start = Instant::now();
        let outcome = TraceOps::new(reader).try_for_each(|op| op.map(|op| self.apply(op)));
        self.simulation_time += start.elapsed();
        self.update_result();
        outcome?;
        info!("Simulated {} accesses for {}", self.result.reads + self.result.writes, self.result.name);
        Ok(&self.result)
    }

    fn update_result(&mut self) {
        let stats = self.cache.stats();
        let words = self.cache.geometry().block_size_in_words() as u64;
        self.result.reads = stats.reads;
        self.result.writes = stats.writes;
        self.result.hits = stats.hits;
        self.result.misses = stats.misses;
        self.result.write_backs = stats.write_backs;
        self.result.cycles = stats.cycles;
        self.result.memory_reads = stats.misses * words;
        self.result.memory_writes = stats.write_backs * words;
        self.result.dirty_lines = self.cache.dirty_line_count() as u64;
    }

    pub fn result(&self) -> &SimulationResult {
        &self.result
    }

    pub fn cache(&self) -> &Cache<SparseMemory, RandomVictims> {
        &self.cache
    }

    /// Gets the wall-clock execution time for processing
    pub fn get_execution_time(&self) -> &Duration {
        &self.simulation_time
    }

    /// Gets the number of blocks which were never filled
    pub fn get_invalid_line_count(&self) -> usize {
        self.cache.invalid_line_count()
    }
}
