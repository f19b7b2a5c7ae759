use std::io::Write;

use anyhow::{anyhow, Result};

use crate::aggregate::{AggregateEntry, AggregateTable};
use crate::registry::KeyRegistry;

/// Rounds to one decimal, ties away from zero. Negative zero becomes zero.
pub fn round_tenths(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Renders `{key=min/mean/max, ...}\n`, keys in ascending byte order.
pub fn render(table: &AggregateTable, registry: &KeyRegistry) -> Result<Vec<u8>> {
    let mut rows: Vec<(Box<[u8]>, &AggregateEntry)> = Vec::with_capacity(table.len());
    for (id, entry) in table.iter() {
        let name = registry
            .get(*id)
            .ok_or_else(|| anyhow!("no key text registered for {id:?}"))?;
        rows.push((name, entry));
    }
    rows.sort_unstable_by(|a, b| a.0.cmp(&b.0));

    let mut out = Vec::with_capacity(2 + rows.len() * 32);
    out.push(b'{');
    for (idx, (name, stats)) in rows.iter().enumerate() {
        if idx > 0 {
            out.extend_from_slice(b", ");
        }
        out.extend_from_slice(name);
        write!(
            out,
            "={:.1}/{:.1}/{:.1}",
            round_tenths(stats.min),
            round_tenths(stats.mean()),
            round_tenths(stats.max)
        )?;
    }
    out.extend_from_slice(b"}\n");
    Ok(out)
}
