use std::fs::File;
use std::io::BufReader;
use std::time::Instant;
use clap::Parser;
use log::info;
use setcache::config::CacheConfig;
use setcache::io::open_trace;
use setcache::simulator::Simulator;

#[cfg(debug_assertions)]
const DEBUG_DEFAULT: bool = true;

#[cfg(not(debug_assertions))]
const DEBUG_DEFAULT: bool = false;

#[derive(Parser, Debug)]
#[command(about = String::from("Set-associative write-back cache simulator"))]
struct Args {
    /// JSON cache configuration
    config: String,
    /// Trace of `R <address>` and `W <address> <value>` lines
    trace: String,

    #[arg(short, long)]
    performance: bool,

    #[arg(short, long, default_value_t = DEBUG_DEFAULT)]
    debug: bool,
}

fn main() -> Result<(), String> {
    env_logger::init();
    let start = Instant::now();
    let args = Args::parse();
    let config_file = File::open(&args.config).map_err(|e| format!("Couldn't open the config file at path {}: {e}", args.config))?;
    let config: CacheConfig = serde_json::from_reader(BufReader::new(config_file)).map_err(|e| format!("Couldn't parse the config file: {e}"))?;
    let mut simulator = Simulator::new(&config).map_err(|e| format!("Invalid cache configuration: {e}"))?;
    info!("Simulating {} with {:?}", args.trace, config);
    let trace_reader = open_trace(&args.trace).map_err(|e| format!("Couldn't open the trace file at path {}: {e}", args.trace))?;
    let result = simulator.simulate(trace_reader).map_err(|e| format!("Simulation failed: {e}"))?;
    println!("{}", serde_json::to_string_pretty(result).map_err(|e| format!("Couldn't serialise the output {e}"))?);
    if args.performance {
        let end = Instant::now();
        let simulation_time = simulator.get_execution_time();
        let total_time = end - start;
        println!("Simulation time: {}s", simulation_time.as_nanos() as f64 / 1e9);
        println!("Total execution time (includes initial parsing, configuration, and output): {}s", total_time.as_nanos() as f64 / 1e9)
    }
    if args.debug {
        #[cfg(debug_assertions)]
        println!("Running the debug binary, debug mode is enabled by default. If benchmarking, do not use this binary, re-compile with the --release argument when using cargo run");
        println!("Parsed input configuration: {config:?}");
        let geometry = simulator.cache().geometry();
        let total_lines = geometry.way_count() * geometry.set_count() as usize;
        println!("Uninitialised cache lines: {} of {total_lines}", simulator.get_invalid_line_count());
        println!("Dirty cache lines: {}", simulator.cache().dirty_line_count());
    }
    Ok(())
}
