use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::errors::LedgerError;

use super::{Result, StorageBackend};

/// In-process backend. Clones share the same records, so a test can keep a
/// handle after boxing one into a store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    records: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail, simulating a full or read-only store.
    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut flag) = self.fail_writes.lock() {
            *flag = fail;
        }
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self
            .records()
            .map(|records| records.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    fn records(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.records
            .lock()
            .map_err(|_| LedgerError::Persistence("memory storage lock poisoned".into()))
    }

    fn writes_fail(&self) -> bool {
        self.fail_writes.lock().map(|flag| *flag).unwrap_or(true)
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        if self.writes_fail() {
            return Err(LedgerError::Persistence(format!(
                "storage rejected write to `{key}`"
            )));
        }
        self.records()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.records()?.remove(key);
        Ok(())
    }
}
