use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::SessionStore;
use crate::errors::StoreResult;

/// In-memory session store.
///
/// Clones share the same underlying map, so a test can hand the registry a
/// store and still observe what it persisted.
#[derive(Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}
