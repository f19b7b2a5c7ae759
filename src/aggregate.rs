use halfbrown::HashMap;

use crate::scan::KeyId;

/// Running min/max/sum/count for one key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateEntry {
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub count: u64,
}

impl Default for AggregateEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl AggregateEntry {
    /// Neutral element of [`merge`](Self::merge).
    pub const EMPTY: AggregateEntry = AggregateEntry {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
        sum: 0.0,
        count: 0,
    };

    #[inline]
    pub fn observe(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
        self.count += 1;
    }

    pub fn merge(self, other: AggregateEntry) -> AggregateEntry {
        AggregateEntry {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
            sum: self.sum + other.sum,
            count: self.count + other.count,
        }
    }

    /// Only meaningful once at least one value has been observed.
    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

pub type AggregateTable = HashMap<KeyId, AggregateEntry>;

/// Combines two tables key by key. Absent keys merge with [`AggregateEntry::EMPTY`].
pub fn merge_tables(global: AggregateTable, local: AggregateTable) -> AggregateTable {
    // Fold the smaller table into the larger one.
    let (mut into, from) = if global.len() >= local.len() {
        (global, local)
    } else {
        (local, global)
    };
    for (id, entry) in from {
        if let Some(acc) = into.get_mut(&id) {
            *acc = acc.merge(entry);
        } else {
            into.insert(id, entry);
        }
    }
    into
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    fn entry_of(values: &[f64]) -> AggregateEntry {
        let mut entry = AggregateEntry::default();
        for v in values {
            entry.observe(*v);
        }
        entry
    }

    fn sorted(table: &AggregateTable) -> Vec<(KeyId, AggregateEntry)> {
        let mut rows: Vec<_> = table.iter().map(|(k, v)| (*k, *v)).collect();
        rows.sort_by_key(|(k, _)| *k);
        rows
    }

    #[test]
    fn observe_tracks_min_max_sum_count() {
        let entry = entry_of(&[1.0, -4.5, 3.0]);
        assert_eq!(entry.min, -4.5);
        assert_eq!(entry.max, 3.0);
        assert_eq!(entry.sum, -0.5);
        assert_eq!(entry.count, 3);
    }

    #[test]
    fn empty_is_neutral() {
        let entry = entry_of(&[2.0, 7.0]);
        assert_eq!(entry.merge(AggregateEntry::EMPTY), entry);
        assert_eq!(AggregateEntry::EMPTY.merge(entry), entry);
    }

    #[test]
    fn merge_is_commutative_and_associative() {
        let a = entry_of(&[1.0, 2.0]);
        let b = entry_of(&[-3.0]);
        let c = entry_of(&[10.0, 0.0, 4.0]);
        assert_eq!(a.merge(b), b.merge(a));
        assert_eq!(a.merge(b).merge(c), a.merge(b.merge(c)));
        assert_eq!(a.merge(b).merge(c), entry_of(&[1.0, 2.0, -3.0, 10.0, 0.0, 4.0]));
    }

    #[test]
    fn merge_tables_combines_shared_and_distinct_keys() {
        let mut left = AggregateTable::default();
        left.insert(KeyId(1), entry_of(&[1.0]));
        left.insert(KeyId(2), entry_of(&[5.0]));
        let mut right = AggregateTable::default();
        right.insert(KeyId(2), entry_of(&[-5.0]));
        right.insert(KeyId(3), entry_of(&[9.0]));

        let merged = merge_tables(left, right);
        assert_eq!(
            sorted(&merged),
            vec![
                (KeyId(1), entry_of(&[1.0])),
                (KeyId(2), entry_of(&[5.0, -5.0])),
                (KeyId(3), entry_of(&[9.0])),
            ]
        );
    }

    #[test]
    fn merge_order_does_not_change_exact_results() {
        let mut rng = StdRng::seed_from_u64(42);
        // Whole-number values keep every partial sum exact.
        let segments: Vec<Vec<(KeyId, f64)>> = (0..24)
            .map(|_| {
                (0..rng.gen_range(1..200))
                    .map(|_| (KeyId(rng.gen_range(0..40)), rng.gen_range(-99..=99) as f64))
                    .collect()
            })
            .collect();
        let build = |observations: &Vec<(KeyId, f64)>| {
            let mut table = AggregateTable::default();
            for (id, value) in observations {
                if let Some(entry) = table.get_mut(id) {
                    entry.observe(*value);
                } else {
                    table.insert(*id, entry_of(&[*value]));
                }
            }
            table
        };

        let baseline = segments
            .iter()
            .map(build)
            .fold(AggregateTable::default(), merge_tables);

        for _ in 0..20 {
            let mut order: Vec<&Vec<(KeyId, f64)>> = segments.iter().collect();
            order.shuffle(&mut rng);
            let mut shuffled: Vec<AggregateTable> = order.into_iter().map(build).collect();
            // Pairwise tree reduction over a shuffled order.
            while shuffled.len() > 1 {
                let mut next = Vec::with_capacity(shuffled.len() / 2 + 1);
                let mut iter = shuffled.into_iter();
                while let Some(a) = iter.next() {
                    match iter.next() {
                        Some(b) => next.push(merge_tables(b, a)),
                        None => next.push(a),
                    }
                }
                shuffled = next;
            }
            let result = shuffled.pop().unwrap();
            assert_eq!(sorted(&result), sorted(&baseline));
        }
    }
}
