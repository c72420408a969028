use crate::store::ExpenseStorage;
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// In-memory storage using HashMap and RwLock. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage pre-seeded with a single value.
    pub fn with_value(key: &str, value: &[u8]) -> Self {
        let storage = Self::new();
        if let Ok(mut map) = storage.inner.write() {
            map.insert(key.to_string(), value.to_vec());
        }
        storage
    }
}

impl ExpenseStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let map = self
            .inner
            .read()
            .map_err(|_| anyhow!("Memory storage lock poisoned"))?;
        let value = map.get(key).cloned();
        debug!(%key, hit = value.is_some(), "Memory storage READ");
        Ok(value)
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| anyhow!("Memory storage lock poisoned"))?;
        debug!(%key, bytes = value.len(), "Memory storage WRITE");
        map.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
