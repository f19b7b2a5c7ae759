use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_INPUT: &str = "measurements.txt";

#[derive(Debug, Parser)]
#[command(version, about = "Per-key min/mean/max over a `key;value` file", long_about = None)]
struct Args {
    /// Input file, one `key;value` record per line
    #[arg(default_value = DEFAULT_INPUT)]
    path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    /// Size of the worker pool, and the number of segments aimed for.
    pub workers: usize,
}

impl Config {
    pub fn from_args() -> Config {
        Config::with_input(Args::parse().path)
    }

    pub fn with_input(input: impl Into<PathBuf>) -> Config {
        Config {
            input: input.into(),
            workers: available_workers(),
        }
    }
}

fn available_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}
