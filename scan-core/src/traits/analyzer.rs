use async_trait::async_trait;

use crate::models::error::ScanError;
use crate::models::image::EncodedImage;
use crate::models::scan_record::ScanRecord;

/// Recognition backend.
///
/// Single-shot per call with no retry: yields exactly one [`ScanRecord`] or
/// fails with `AnalysisError` (or `InvalidImage` for an empty/corrupt
/// payload). Cancellation is handled by the caller dropping the future.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, image: &EncodedImage) -> Result<ScanRecord, ScanError>;

    /// Identifier used in logs.
    fn name(&self) -> &str;
}
