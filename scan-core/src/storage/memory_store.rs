use std::collections::HashMap;

use parking_lot::Mutex;

use crate::models::error::ScanError;
use crate::traits::key_value_store::KeyValueStore;

/// In-process key-value store.
///
/// An optional byte quota mimics browser storage limits: a `set` whose
/// value exceeds it fails and leaves the previous value in place.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ScanError> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ScanError> {
        if let Some(quota) = self.quota_bytes {
            if value.len() > quota {
                return Err(ScanError::PersistenceError(format!(
                    "quota exceeded: {} bytes (quota {})",
                    value.len(),
                    quota
                )));
            }
        }
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ScanError> {
        self.values.lock().remove(key);
        Ok(())
    }
}
