use std::sync::Arc;

use scan_core::{ScanDelegate, ScanEvent, ScanState, Severity};

/// ScanDelegate that prints notifications to the terminal.
pub struct ConsoleDelegate;

impl ConsoleDelegate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

impl ScanDelegate for ConsoleDelegate {
    fn on_state_changed(&self, state: &ScanState) {
        if state.is_analyzing() {
            println!("Analyzing clothing...");
        }
        log::debug!("state: {}", state.name());
    }

    fn on_event(&self, event: &ScanEvent) {
        match event.severity() {
            Severity::Success => println!("✓ {}", event.message()),
            Severity::Error => eprintln!("✗ {}", event.message()),
        }
    }
}
