use crate::models::event::ScanEvent;
use crate::models::state::ScanState;

/// Event delegate for scan session notifications.
///
/// Methods are called from whichever task drives the session, never while
/// the session lock is held. Implementations should marshal to the UI
/// thread if needed.
pub trait ScanDelegate: Send + Sync {
    /// Called when the session state changes.
    fn on_state_changed(&self, state: &ScanState);

    /// Called with every classified success/error outcome.
    fn on_event(&self, event: &ScanEvent);
}
