use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use crate::config::CacheConfig;
use crate::error::TraceError;
use crate::io::{open_trace, TraceSource};
use crate::simulator::{SimulationResult, Simulator};
use crate::util::{generate_trace, get_configs};

fn config(json: &str) -> CacheConfig {
    serde_json::from_str(json).unwrap()
}

#[test]
fn run_all_samples() -> Result<(), Box<dyn Error>> {
    let samples = get_configs()?;
    assert!(!samples.is_empty(), "no samples found");
    for test in samples {
        println!("Running test for {}", test.output);
        // Get input files
        let config_file = File::open(&test.config)?;
        // Read expected output
        let expected_output_file = File::open(&test.output)?;
        let expected_output: SimulationResult = serde_json::from_reader(BufReader::new(expected_output_file))?;
        // Simulate!
        let config: CacheConfig = serde_json::from_reader(BufReader::new(config_file))?;
        let mut simulator = Simulator::new(&config)?;
        let result = simulator.simulate(open_trace(&test.trace)?)?;
        assert_eq!(*result, expected_output, "mismatch for {}", test.output);
    }
    Ok(())
}

#[test]
fn config_defaults_to_lru_and_a_generic_name() {
    let config = config(r#"{"way_count": 2, "set_count": 4, "block_size_in_bytes": 16}"#);
    assert_eq!(config.name, "cache");
    assert!(matches!(config.replacement_policy, crate::config::ReplacementPolicyConfig::LeastRecentlyUsed));
    assert_eq!(config.seed, None);
}

#[test]
fn invalid_geometry_is_rejected_by_the_simulator() {
    let config = config(r#"{"way_count": 2, "set_count": 6, "block_size_in_bytes": 16}"#);
    assert!(Simulator::new(&config).is_err());
}

#[test]
fn repeated_simulation_accumulates() {
    let config = config(r#"{"way_count": 1, "set_count": 2, "block_size_in_bytes": 8}"#);
    let mut simulator = Simulator::new(&config).unwrap();
    simulator.simulate("R 0\nR 4\n".as_bytes()).unwrap();
    let result = simulator.simulate("W 4 9\nR 8\n".as_bytes()).unwrap();
    assert_eq!(result.reads, 3);
    assert_eq!(result.writes, 1);
    assert_eq!(result.hits, 2);
    assert_eq!(result.misses, 2);
    assert_eq!(result.memory_reads, 4);
    assert_eq!(result.dirty_lines, 1);
}

#[test]
fn malformed_line_reports_its_number() {
    let config = config(r#"{"way_count": 1, "set_count": 2, "block_size_in_bytes": 8}"#);
    let mut simulator = Simulator::new(&config).unwrap();
    let err = simulator.simulate("# header\nR 0\nX 4\n".as_bytes()).unwrap_err();
    assert!(matches!(err, TraceError::Malformed { line: 3, .. }), "{err}");
    // Accesses before the bad line still count
    assert_eq!(simulator.result().reads, 1);
}

#[test]
fn generated_trace_accounting_is_consistent() {
    let config = config(r#"{"way_count": 4, "set_count": 8, "block_size_in_bytes": 32, "replacement_policy": "random", "seed": 3}"#);
    let mut simulator = Simulator::new(&config).unwrap();
    let trace = generate_trace(2_000, 1 << 14, 11);
    let result = simulator.simulate(trace.as_bytes()).unwrap();
    assert_eq!(result.reads + result.writes, 2_000);
    assert_eq!(result.hits + result.misses, 2_000);
    assert_eq!(result.cycles, result.misses * 50);
    assert_eq!(result.memory_reads, result.misses * 8);
    assert_eq!(result.memory_writes, result.write_backs * 8);
    assert!(result.write_backs <= result.misses);
    assert!(simulator.get_invalid_line_count() < 32);
}

#[test]
fn traces_open_mapped_or_buffered() -> Result<(), Box<dyn Error>> {
    let samples = get_configs()?;
    let sample = open_trace(&samples[0].trace)?;
    if cfg!(unix) {
        assert!(matches!(sample, TraceSource::Mapped(_)));
    }

    // Empty traces can't be mapped, and simulate to nothing
    let empty = std::env::temp_dir().join(format!("setcache-empty-{}.trace", std::process::id()));
    File::create(&empty)?;
    let source = open_trace(&empty)?;
    assert!(matches!(source, TraceSource::Buffered(_)));
    let mut simulator = Simulator::new(&config(r#"{"way_count": 1, "set_count": 1, "block_size_in_bytes": 4}"#))?;
    assert_eq!(simulator.simulate(source)?.reads, 0);
    std::fs::remove_file(&empty)?;

    assert!(matches!(open_trace("/nonexistent/setcache.trace"), Err(TraceError::Io(_))));
    Ok(())
}
