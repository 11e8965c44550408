//! # scan-core
//!
//! Platform-agnostic core of the clothing scanner.
//!
//! Provides the capture/analysis state machine, the recognition seam with a
//! deterministic stand-in, and the persisted scan history. Front ends supply
//! a camera backend by implementing `CaptureProvider`, receive notifications
//! through `ScanDelegate`, and pick a `KeyValueStore` for history.
//!
//! ## Architecture
//!
//! ```text
//! scan-core (this crate)
//! ├── traits/       ← CaptureProvider, VideoStream, Analyzer, HistoryStore, KeyValueStore, ScanDelegate
//! ├── models/       ← ScanError, ScanState, ScanConfiguration, ScanRecord, HistoryEntry, EncodedImage, ScanEvent
//! ├── analysis/     ← MockAnalyzer
//! ├── processing/   ← upload intake (type/size validation, encoding)
//! ├── session/      ← ScanSession (state machine), camera stream guard
//! └── storage/      ← HistoryLedger, MemoryStore, FileStore
//! ```

pub mod analysis;
pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use analysis::mock_analyzer::MockAnalyzer;
pub use models::config::{FacingMode, ScanConfiguration};
pub use models::error::ScanError;
pub use models::event::{ScanEvent, Severity};
pub use models::history_entry::HistoryEntry;
pub use models::image::EncodedImage;
pub use models::scan_record::{Confidence, RetailLink, ScanRecord};
pub use models::state::ScanState;
pub use processing::image_intake::read_image_file;
pub use session::scan_session::ScanSession;
pub use storage::file_store::FileStore;
pub use storage::history_ledger::HistoryLedger;
pub use storage::memory_store::MemoryStore;
pub use traits::analyzer::Analyzer;
pub use traits::capture_provider::{CameraDevice, CaptureProvider, VideoStream};
pub use traits::history_store::HistoryStore;
pub use traits::key_value_store::KeyValueStore;
pub use traits::scan_delegate::ScanDelegate;
