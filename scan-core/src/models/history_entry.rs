use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::image::EncodedImage;
use super::scan_record::ScanRecord;

/// A completed scan as stored in the history ledger.
///
/// Serialized flat: the record's fields sit next to `image` and
/// `timestamp`, newest entries first in the persisted array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub record: ScanRecord,
    pub image: EncodedImage,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Creates the entry for an analysis that just completed.
    pub fn completed(record: ScanRecord, image: EncodedImage) -> Self {
        Self {
            record,
            image,
            timestamp: Utc::now(),
        }
    }
}
