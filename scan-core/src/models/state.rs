use super::history_entry::HistoryEntry;
use super::image::EncodedImage;

/// Capture/analysis state machine.
///
/// State transitions:
/// ```text
/// idle ──start camera──→ live_camera ──capture──→ analyzing ──ok──→ completed
///  ↑  ←──────cancel─────────┘                       ↑   │              │
///  │                                                │ error            │
///  ├──────────────────────upload────────────────────┘   ↓              │
///  │                                              image_ready          │
///  └──────────────────────────reset────────────────────┴───────────────┘
/// ```
/// `Analyzing` is the in-flight sub-state of `ImageReady`: both hold the
/// image the user chose.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanState {
    Idle,
    LiveCamera,
    ImageReady { image: EncodedImage },
    Analyzing { image: EncodedImage },
    Completed(Box<HistoryEntry>),
}

impl ScanState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_live_camera(&self) -> bool {
        matches!(self, Self::LiveCamera)
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self, Self::Analyzing { .. })
    }

    /// True while an image is held, analyzing or not.
    pub fn has_image(&self) -> bool {
        self.image().is_some()
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// The image currently held by the session, if any.
    pub fn image(&self) -> Option<&EncodedImage> {
        match self {
            Self::ImageReady { image } | Self::Analyzing { image } => Some(image),
            Self::Completed(entry) => Some(&entry.image),
            _ => None,
        }
    }

    /// Stable lowercase name for logs and front ends.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::LiveCamera => "live_camera",
            Self::ImageReady { .. } => "image_ready",
            Self::Analyzing { .. } => "analyzing",
            Self::Completed(_) => "completed",
        }
    }
}
