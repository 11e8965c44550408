use crate::models::error::ScanError;

/// Durable string key-value storage scoped to one user/origin.
///
/// `set` overwrites the whole value; a reader must observe either the old
/// or the new value, never a partial write.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ScanError>;

    fn set(&self, key: &str, value: &str) -> Result<(), ScanError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), ScanError>;
}
