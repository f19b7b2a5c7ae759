//! Per-key min/mean/max over a large `key;value` file.
//!
//! The file is memory mapped, cut into line-aligned segments, scanned in
//! parallel into private tables, tree-reduced into one table and rendered
//! as a single sorted line.

pub mod aggregate;
pub mod config;
pub mod mmap;
pub mod registry;
pub mod report;
pub mod scan;
pub mod segment;

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::aggregate::{merge_tables, AggregateTable};
use crate::config::Config;
use crate::mmap::Mmap;
use crate::registry::KeyRegistry;

/// Runs the whole pipeline and returns the rendered report.
///
/// Nothing is returned unless every step succeeded.
pub fn run(config: &Config) -> Result<Vec<u8>> {
    let map = Mmap::open(&config.input)?;
    let bytes = map.as_slice();
    debug!(path = %config.input.display(), len = bytes.len(), "mapped input");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()
        .context("couldn't build worker pool")?;

    let (table, registry) = pool.install(|| aggregate(bytes, config.workers));
    debug!(keys = table.len(), "merged segment tables");

    report::render(&table, &registry)
}

/// Segments `bytes`, scans each segment on the current rayon pool and
/// reduces the partial tables.
pub fn aggregate(bytes: &[u8], workers: usize) -> (AggregateTable, KeyRegistry) {
    let registry = KeyRegistry::new();
    let ranges = segment::partition(bytes, workers);
    debug!(segments = ranges.len(), "partitioned input");

    let table = ranges
        .par_iter()
        .map(|range| {
            let table = scan::scan_segment(range.slice(bytes), &registry);
            trace!(
                offset = range.offset,
                length = range.length,
                keys = table.len(),
                "scanned segment"
            );
            table
        })
        .reduce(AggregateTable::default, merge_tables);

    (table, registry)
}
