use super::error::ScanError;

/// How a front end should present a [`ScanEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Error,
}

/// Classified, user-facing outcome emitted by the session and the ledger.
///
/// The core only classifies; rendering (toast, log line, dialog) is up to
/// the delegate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    CameraStarted,
    PhotoCaptured,
    AnalysisSucceeded { brand: String, item_type: String },
    AnalysisFailed(ScanError),
    PermissionDenied,
    CaptureFailed(ScanError),
    HistoryEntryRemoved { index: usize },
    HistoryCleared,
    PersistenceFailed(ScanError),
}

impl ScanEvent {
    pub fn severity(&self) -> Severity {
        match self {
            Self::CameraStarted
            | Self::PhotoCaptured
            | Self::AnalysisSucceeded { .. }
            | Self::HistoryEntryRemoved { .. }
            | Self::HistoryCleared => Severity::Success,
            Self::AnalysisFailed(_)
            | Self::PermissionDenied
            | Self::CaptureFailed(_)
            | Self::PersistenceFailed(_) => Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    /// Short message suitable for a toast.
    pub fn message(&self) -> String {
        match self {
            Self::CameraStarted => "Camera ready".into(),
            Self::PhotoCaptured => "Photo captured".into(),
            Self::AnalysisSucceeded { .. } => "Clothing analyzed successfully!".into(),
            Self::AnalysisFailed(e) => format!("Analysis failed: {}", e),
            Self::PermissionDenied => {
                "Camera access denied. Please allow camera permissions.".into()
            }
            Self::CaptureFailed(e) => format!("Capture failed: {}", e),
            Self::HistoryEntryRemoved { .. } => "Item removed from history".into(),
            Self::HistoryCleared => "History cleared".into(),
            Self::PersistenceFailed(e) => format!("Could not save history: {}", e),
        }
    }
}
