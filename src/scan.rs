use crate::aggregate::{AggregateEntry, AggregateTable};
use crate::registry::KeyRegistry;

const KEY_CAPACITY: usize = 512;
const VALUE_CAPACITY: usize = 32;

/// Identity of a key: a 32-bit rolling hash of its raw bytes.
///
/// Distinct keys that collide are treated as one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct KeyId(pub u32);

impl KeyId {
    #[inline]
    pub fn push(self, byte: u8) -> KeyId {
        KeyId(self.0.wrapping_mul(31).wrapping_add(byte as u32))
    }

    pub fn of(key: &[u8]) -> KeyId {
        key.iter().fold(KeyId::default(), |h, b| h.push(*b))
    }
}

/// Fixed-capacity scratch buffer reused for every record of a segment.
struct Scratch<const N: usize> {
    bytes: [u8; N],
    len: usize,
}

impl<const N: usize> Scratch<N> {
    fn new() -> Self {
        Scratch {
            bytes: [0; N],
            len: 0,
        }
    }

    #[inline]
    fn push(&mut self, byte: u8) {
        // Overlong fields are outside the input grammar; keep the prefix.
        if self.len < N {
            self.bytes[self.len] = byte;
            self.len += 1;
        }
    }

    #[inline]
    fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    #[inline]
    fn clear(&mut self) {
        self.len = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ReadingKey,
    ReadingValue,
}

/// Parses a `-?digits(.digits)?` literal.
///
/// Not a general float parser: anything outside that grammar yields an
/// unspecified value rather than an error.
pub fn parse_value(bytes: &[u8]) -> f64 {
    let mut sign = 1.0;
    let mut mantissa = 0.0;
    let mut scale = 1.0;
    let mut fractional = false;
    for b in bytes {
        match *b {
            b'-' => sign = -1.0,
            b'.' => fractional = true,
            d => {
                mantissa = mantissa * 10.0 + (d.wrapping_sub(b'0')) as f64;
                if fractional {
                    scale *= 0.1;
                }
            }
        }
    }
    sign * mantissa * scale
}

/// Scans one line-aligned segment into a private table.
///
/// Keys seen for the first time in this segment are offered to `registry`.
pub fn scan_segment(segment: &[u8], registry: &KeyRegistry) -> AggregateTable {
    let mut table = AggregateTable::default();
    let mut key = Scratch::<KEY_CAPACITY>::new();
    let mut value = Scratch::<VALUE_CAPACITY>::new();
    let mut id = KeyId::default();
    let mut state = State::ReadingKey;

    for b in segment {
        match (state, *b) {
            (State::ReadingKey, b';') => state = State::ReadingValue,
            // Blank line.
            (State::ReadingKey, b'\n') => {}
            (State::ReadingKey, c) => {
                key.push(c);
                id = id.push(c);
            }
            (State::ReadingValue, b'\n') => {
                record(&mut table, registry, id, key.as_slice(), value.as_slice());
                key.clear();
                value.clear();
                id = KeyId::default();
                state = State::ReadingKey;
            }
            (State::ReadingValue, c) => value.push(c),
        }
    }

    // The final line of the file may lack a terminator.
    if state == State::ReadingValue {
        record(&mut table, registry, id, key.as_slice(), value.as_slice());
    }

    table
}

#[inline]
fn record(table: &mut AggregateTable, registry: &KeyRegistry, id: KeyId, key: &[u8], value: &[u8]) {
    let v = parse_value(value);
    if let Some(entry) = table.get_mut(&id) {
        entry.observe(v);
    } else {
        let mut entry = AggregateEntry::default();
        entry.observe(v);
        table.insert(id, entry);
        registry.register_if_absent(id, key);
    }
}
