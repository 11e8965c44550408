use std::time::Duration;

use async_trait::async_trait;

use crate::models::config::ScanConfiguration;
use crate::models::error::ScanError;
use crate::models::image::EncodedImage;
use crate::models::scan_record::{Confidence, RetailLink, ScanRecord};
use crate::traits::analyzer::Analyzer;

/// Deterministic stand-in for a recognition backend.
///
/// Waits a fixed delay, then returns the same record for every valid image.
/// Empty or undecodable payloads fail with `AnalysisError`.
#[derive(Debug, Clone)]
pub struct MockAnalyzer {
    delay: Duration,
}

impl MockAnalyzer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_config(config: &ScanConfiguration) -> Self {
        Self::new(config.analysis_delay())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// The record every successful analysis yields.
    pub fn fixed_record() -> ScanRecord {
        ScanRecord {
            brand: "Nike".into(),
            item_type: "Running Shoes".into(),
            origin: "Vietnam".into(),
            manufacturer: "Nike Manufacturing Thailand".into(),
            retail_links: vec![
                RetailLink::new("Nike Official", "https://nike.com"),
                RetailLink::new("Amazon", "https://amazon.com"),
                RetailLink::new("Foot Locker", "https://footlocker.com"),
            ],
            confidence: Confidence::saturating(94),
        }
    }
}

impl Default for MockAnalyzer {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[async_trait]
impl Analyzer for MockAnalyzer {
    async fn analyze(&self, image: &EncodedImage) -> Result<ScanRecord, ScanError> {
        let bytes = image
            .decode()
            .map_err(|e| ScanError::AnalysisError(e.to_string()))?;
        log::debug!(
            "Analyzing {} bytes ({})",
            bytes.len(),
            image.mime_type().unwrap_or("unknown")
        );

        tokio::time::sleep(self.delay).await;

        Ok(Self::fixed_record())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
