use thiserror::Error;

/// Errors that can occur during scan, analysis and history operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("device not available")]
    DeviceNotAvailable,

    #[error("capture failed: {0}")]
    CaptureError(String),

    #[error("analysis failed: {0}")]
    AnalysisError(String),

    #[error("an analysis is already in progress")]
    AnalysisInProgress,

    #[error("analysis cancelled")]
    Cancelled,

    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    #[error("persistence error: {0}")]
    PersistenceError(String),

    #[error("history index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("file too large: {size} bytes (limit {limit})")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("configuration error: {0}")]
    Configuration(String),
}
