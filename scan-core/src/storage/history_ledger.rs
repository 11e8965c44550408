use parking_lot::Mutex;

use crate::models::config::ScanConfiguration;
use crate::models::error::ScanError;
use crate::models::history_entry::HistoryEntry;
use crate::traits::history_store::HistoryStore;
use crate::traits::key_value_store::KeyValueStore;

struct LedgerState {
    entries: Vec<HistoryEntry>,
    /// Whether `entries` has been read from the store at least once.
    loaded: bool,
    /// Set when the last durable write failed; the in-memory view then
    /// wins over whatever is on disk until a write succeeds.
    unsaved: bool,
}

/// [`HistoryStore`] persisted as one JSON array under a single key.
///
/// The persisted array is read on first use, so a ledger opened in a new
/// process mutates the stored history rather than an empty view. Every
/// mutation rewrites the whole array. Bounded size keeps that cheap;
/// there is no protection against a second writer on the same key.
pub struct HistoryLedger<K: KeyValueStore> {
    store: K,
    key: String,
    capacity: usize,
    state: Mutex<LedgerState>,
}

impl<K: KeyValueStore> HistoryLedger<K> {
    /// A zero capacity is raised to 1.
    pub fn new(store: K, key: impl Into<String>, capacity: usize) -> Self {
        Self {
            store,
            key: key.into(),
            capacity: capacity.max(1),
            state: Mutex::new(LedgerState {
                entries: Vec::new(),
                loaded: false,
                unsaved: false,
            }),
        }
    }

    pub fn from_config(store: K, config: &ScanConfiguration) -> Self {
        Self::new(store, config.history_key.clone(), config.max_history_items)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    /// Whether the in-memory view has changes the store does not.
    pub fn has_unsaved_changes(&self) -> bool {
        self.state.lock().unsaved
    }

    fn read_persisted(&self) -> Result<Vec<HistoryEntry>, ScanError> {
        let raw = match self.store.get(&self.key)? {
            Some(raw) => raw,
            None => return Ok(Vec::new()),
        };
        match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
            Ok(mut entries) => {
                entries.truncate(self.capacity);
                Ok(entries)
            }
            Err(e) => {
                log::warn!("Discarding corrupt history '{}': {}", self.key, e);
                Ok(Vec::new())
            }
        }
    }

    /// Fill the view from the store if it has never been read.
    ///
    /// A read failure leaves the view untouched and unloaded so a mutation
    /// cannot overwrite history it never saw.
    fn ensure_loaded(&self, state: &mut LedgerState) -> Result<(), ScanError> {
        if state.loaded || state.unsaved {
            return Ok(());
        }
        match self.read_persisted() {
            Ok(entries) => {
                state.entries = entries;
                state.loaded = true;
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to read history '{}': {}", self.key, e);
                Err(e)
            }
        }
    }

    /// Overwrite the persisted array with the current view.
    fn persist(&self, state: &mut LedgerState) -> Result<(), ScanError> {
        let result = if state.entries.is_empty() {
            self.store.remove(&self.key)
        } else {
            serde_json::to_string(&state.entries)
                .map_err(|e| ScanError::PersistenceError(format!("failed to serialize history: {}", e)))
                .and_then(|json| self.store.set(&self.key, &json))
        };

        match result {
            Ok(()) => {
                state.unsaved = false;
                state.loaded = true;
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to persist history '{}': {}", self.key, e);
                state.unsaved = true;
                Err(e)
            }
        }
    }
}

impl<K: KeyValueStore> HistoryStore for HistoryLedger<K> {
    fn load(&self) -> Vec<HistoryEntry> {
        let mut state = self.state.lock();
        if state.unsaved {
            return state.entries.clone();
        }
        match self.read_persisted() {
            Ok(entries) => {
                state.entries = entries;
                state.loaded = true;
            }
            Err(e) => log::error!("Failed to read history '{}': {}", self.key, e),
        }
        state.entries.clone()
    }

    fn append(&self, entry: HistoryEntry) -> Result<(), ScanError> {
        let mut state = self.state.lock();
        self.ensure_loaded(&mut state)?;
        state.entries.insert(0, entry);
        let evicted = state.entries.len().saturating_sub(self.capacity);
        state.entries.truncate(self.capacity);
        if evicted > 0 {
            log::debug!("History at capacity {}, evicted {} oldest", self.capacity, evicted);
        }
        self.persist(&mut state)
    }

    fn delete_at(&self, index: usize) -> Result<(), ScanError> {
        let mut state = self.state.lock();
        self.ensure_loaded(&mut state)?;
        let len = state.entries.len();
        if index >= len {
            return Err(ScanError::IndexOutOfRange { index, len });
        }
        state.entries.remove(index);
        self.persist(&mut state)
    }

    fn clear(&self) -> Result<(), ScanError> {
        let mut state = self.state.lock();
        state.entries.clear();
        state.loaded = true;
        self.persist(&mut state)
    }

    fn entries(&self) -> Vec<HistoryEntry> {
        let mut state = self.state.lock();
        let _ = self.ensure_loaded(&mut state);
        state.entries.clone()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn len(&self) -> usize {
        let mut state = self.state.lock();
        let _ = self.ensure_loaded(&mut state);
        state.entries.len()
    }
}
