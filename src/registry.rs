use ahash::RandomState;
use dashmap::DashMap;

use crate::scan::KeyId;

/// Shared map from [`KeyId`] back to the key text it was hashed from.
///
/// Written concurrently by every scanner with insert-if-absent semantics and
/// read only after all scanners have joined. When two distinct keys collide,
/// whichever registers first keeps its text.
#[derive(Debug)]
pub struct KeyRegistry {
    names: DashMap<KeyId, Box<[u8]>, RandomState>,
}

impl Default for KeyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyRegistry {
    pub fn new() -> Self {
        KeyRegistry {
            names: DashMap::with_capacity_and_hasher(512, RandomState::new()),
        }
    }

    pub fn register_if_absent(&self, id: KeyId, text: &[u8]) {
        // Read-only probe first so the common case takes no write lock.
        if self.names.contains_key(&id) {
            return;
        }
        self.names.entry(id).or_insert_with(|| Box::from(text));
    }

    pub fn get(&self, id: KeyId) -> Option<Box<[u8]>> {
        self.names.get(&id).map(|name| name.value().clone())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
