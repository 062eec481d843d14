use std::error::Error;
use std::fmt::Write;
use std::fs;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;

pub const SAMPLE_INPUTS_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/samples/inputs");
pub const SAMPLE_OUTPUTS_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/samples/outputs");
pub const TRACE_FILES_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/samples/traces");

pub struct TestCasePaths {
    pub config: String,
    pub trace: String,
    pub output: String
}

/// Finds every sample with an expected output, named `output-<trace>-<config>.json`
pub fn get_configs() -> Result<Vec<TestCasePaths>, Box<dyn Error>> {
    let mut out = Vec::new();
    let output_file_directory = fs::read_dir(SAMPLE_OUTPUTS_PATH)?;
    let output_pattern = Regex::new(r"output-(?P<trace>[0-9a-zA-Z_]+)-(?P<config>[0-9a-zA-Z_]+)\.json")?;
    let mut files = output_file_directory
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter(|a| a.file_name().to_str().map_or(false, |name| output_pattern.is_match(name)))
        .collect::<Vec<_>>();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    for file in files {
        // Get file name
        let file_name = file.file_name().into_string().map_err(|e| format!("Can't convert OS string ({e:?}) to standard string"))?;
        // Get components of name
        let tokens = output_pattern.captures(&file_name).ok_or("Couldn't parse the file name".to_string())?;
        let trace_file_path = tokens.name("trace").ok_or("Couldn't get the trace file from the output file name".to_string())?.as_str();
        let config_file_path = tokens.name("config").ok_or("Couldn't get the config file from the output file name".to_string())?.as_str();
        out.push(TestCasePaths {
            config: format!("{SAMPLE_INPUTS_PATH}/{config_file_path}.json"),
            trace: format!("{TRACE_FILES_PATH}/{trace_file_path}.trace"),
            output: format!("{SAMPLE_OUTPUTS_PATH}/{file_name}"),
        })
    }
    Ok(out)
}

/// Generates a reproducible trace of `length` accesses in the trace text format.
///
/// Addresses are word-aligned and drawn from `0..address_span`, roughly a third of the accesses are
/// writes, and values come from a small range so some writes store what is already there
pub fn generate_trace(length: usize, address_span: u32, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = String::with_capacity(length * 24);
    for _ in 0..length {
        let address = rng.gen_range(0..address_span.max(4)) & !3;
        let line = if rng.gen_ratio(1, 3) {
            writeln!(out, "W {address:#010x} {:#x}", rng.gen_range(0..16u32))
        } else {
            writeln!(out, "R {address:#010x}")
        };
        line.expect("writing to a String can't fail");
    }
    out
}
