use crate::models::error::ScanError;
use crate::models::history_entry::HistoryEntry;

/// The persisted, newest-first, capacity-bounded list of completed scans.
///
/// Mutations update the in-memory view first and then overwrite the whole
/// persisted representation. A `PersistenceError` from a mutation means the
/// in-memory view changed but the durable write did not; the view stays
/// authoritative for the rest of the session.
pub trait HistoryStore: Send + Sync {
    /// Read the full history. Missing or corrupt persisted state loads as empty.
    fn load(&self) -> Vec<HistoryEntry>;

    /// Insert at the front, evicting from the tail beyond the cap.
    fn append(&self, entry: HistoryEntry) -> Result<(), ScanError>;

    /// Remove the entry at `index` (0 = newest) of the in-memory view.
    fn delete_at(&self, index: usize) -> Result<(), ScanError>;

    /// Remove every entry.
    fn clear(&self) -> Result<(), ScanError>;

    /// Current in-memory view without touching storage.
    fn entries(&self) -> Vec<HistoryEntry>;

    fn capacity(&self) -> usize;

    fn len(&self) -> usize {
        self.entries().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
