use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::models::config::ScanConfiguration;
use crate::models::error::ScanError;
use crate::models::event::ScanEvent;
use crate::models::history_entry::HistoryEntry;
use crate::models::image::EncodedImage;
use crate::models::state::ScanState;
use crate::session::stream_guard::StreamGuard;
use crate::traits::analyzer::Analyzer;
use crate::traits::capture_provider::{CaptureProvider, VideoStream};
use crate::traits::history_store::HistoryStore;
use crate::traits::scan_delegate::ScanDelegate;

/// Handle for the single analysis allowed in flight.
#[derive(Clone)]
struct AnalysisTicket {
    id: Uuid,
    cancel: CancellationToken,
}

/// Internal mutable session state, protected by `parking_lot::Mutex`.
///
/// Never held across an `.await`.
struct SessionState<S: VideoStream> {
    state: ScanState,
    stream: Option<StreamGuard<S>>,
    in_flight: Option<AnalysisTicket>,
}

impl<S: VideoStream> SessionState<S> {
    fn new() -> Self {
        Self {
            state: ScanState::Idle,
            stream: None,
            in_flight: None,
        }
    }

    /// Enter `Analyzing` with a fresh ticket.
    fn begin_analysis(&mut self, image: EncodedImage) -> AnalysisTicket {
        let ticket = AnalysisTicket {
            id: Uuid::new_v4(),
            cancel: CancellationToken::new(),
        };
        self.in_flight = Some(ticket.clone());
        self.state = ScanState::Analyzing { image };
        ticket
    }
}

/// Capture/analysis state machine for one scanning surface.
///
/// Generic over the camera backend, the recognition backend and the history
/// store. Data flow:
/// ```text
/// [CaptureProvider] ─frame─┐
///                          ├→ [Analyzer] → ScanRecord → [HistoryStore] (newest first)
/// [upload intake] ──image──┘
/// ```
/// At most one analysis runs at a time. `reset` cancels it, and a cancelled
/// or superseded analysis never reaches the history store.
pub struct ScanSession<P, A, H>
where
    P: CaptureProvider,
    A: Analyzer,
    H: HistoryStore,
{
    camera: P,
    analyzer: A,
    history: Arc<H>,
    config: ScanConfiguration,
    session_state: Mutex<SessionState<P::Stream>>,
    delegate: Option<Arc<dyn ScanDelegate>>,
}

impl<P, A, H> ScanSession<P, A, H>
where
    P: CaptureProvider,
    A: Analyzer,
    H: HistoryStore,
{
    pub fn new(camera: P, analyzer: A, history: Arc<H>, config: ScanConfiguration) -> Result<Self, ScanError> {
        config.validate().map_err(ScanError::Configuration)?;
        Ok(Self {
            camera,
            analyzer,
            history,
            config,
            session_state: Mutex::new(SessionState::new()),
            delegate: None,
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn ScanDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn state(&self) -> ScanState {
        self.session_state.lock().state.clone()
    }

    pub fn config(&self) -> &ScanConfiguration {
        &self.config
    }

    pub fn history(&self) -> &Arc<H> {
        &self.history
    }

    /// Whether the session currently holds camera hardware.
    pub fn has_active_stream(&self) -> bool {
        self.session_state
            .lock()
            .stream
            .as_ref()
            .map_or(false, |s| s.is_active())
    }

    /// Acquire the camera. Transitions: idle → live_camera.
    ///
    /// On permission denial or a missing device the session stays idle and
    /// holds no stream.
    pub async fn start_camera(&self) -> Result<(), ScanError> {
        {
            let s = self.session_state.lock();
            if !s.state.is_idle() {
                return Err(ScanError::InvalidTransition(format!(
                    "cannot start camera from {}",
                    s.state.name()
                )));
            }
        }

        if !self.camera.is_available() {
            let err = ScanError::DeviceNotAvailable;
            self.emit(&ScanEvent::CaptureFailed(err.clone()));
            return Err(err);
        }

        let stream = match self.camera.request_stream(self.config.facing_mode).await {
            Ok(stream) => StreamGuard::new(stream),
            Err(ScanError::PermissionDenied) => {
                self.emit(&ScanEvent::PermissionDenied);
                return Err(ScanError::PermissionDenied);
            }
            Err(e) => {
                self.emit(&ScanEvent::CaptureFailed(e.clone()));
                return Err(e);
            }
        };

        let new_state = {
            let mut s = self.session_state.lock();
            if !s.state.is_idle() {
                // Something else happened while the permission prompt was
                // open; the fresh stream is released on return.
                return Err(ScanError::InvalidTransition(format!(
                    "session left idle while acquiring camera (now {})",
                    s.state.name()
                )));
            }
            s.stream = Some(stream);
            s.state = ScanState::LiveCamera;
            s.state.clone()
        };

        log::info!("Camera started: {}", self.camera.device_info().name);
        self.emit_state(&new_state);
        self.emit(&ScanEvent::CameraStarted);
        Ok(())
    }

    /// Release the camera without capturing. Transitions: live_camera → idle.
    pub fn cancel_camera(&self) -> Result<(), ScanError> {
        let (released, new_state) = {
            let mut s = self.session_state.lock();
            if !s.state.is_live_camera() {
                return Err(ScanError::InvalidTransition(format!(
                    "cannot cancel camera from {}",
                    s.state.name()
                )));
            }
            let released = s.stream.take();
            s.state = ScanState::Idle;
            (released, s.state.clone())
        };
        drop(released);

        self.emit_state(&new_state);
        Ok(())
    }

    /// Freeze the current frame, release the camera and analyze the frame.
    /// Transitions: live_camera → analyzing → completed / image_ready.
    ///
    /// Without an active stream this fails with `CaptureError` and the state
    /// is left untouched.
    pub async fn capture(&self) -> Result<HistoryEntry, ScanError> {
        let (image, ticket, released, new_state) = {
            let mut s = self.session_state.lock();
            if s.state.is_analyzing() {
                return Err(ScanError::AnalysisInProgress);
            }

            let frame = match s.stream.as_mut() {
                Some(guard) if guard.is_active() => guard.stream_mut().capture_frame(),
                _ => Err(ScanError::CaptureError("no active camera stream".into())),
            };
            let image = match frame {
                Ok(image) => image,
                Err(e) => {
                    drop(s);
                    self.emit(&ScanEvent::CaptureFailed(e.clone()));
                    return Err(e);
                }
            };

            let released = s.stream.take();
            let ticket = s.begin_analysis(image.clone());
            (image, ticket, released, s.state.clone())
        };
        drop(released);

        self.emit_state(&new_state);
        self.emit(&ScanEvent::PhotoCaptured);
        self.run_analysis(ticket, image).await
    }

    /// Analyze an uploaded image. Transitions: idle / image_ready → analyzing
    /// → completed / image_ready.
    ///
    /// The payload is not validated here; see
    /// [`crate::processing::image_intake`].
    pub async fn submit_upload(&self, image: EncodedImage) -> Result<HistoryEntry, ScanError> {
        let (ticket, new_state) = {
            let mut s = self.session_state.lock();
            match &s.state {
                ScanState::Analyzing { .. } => return Err(ScanError::AnalysisInProgress),
                ScanState::Idle | ScanState::ImageReady { .. } => {}
                other => {
                    return Err(ScanError::InvalidTransition(format!(
                        "cannot upload from {}",
                        other.name()
                    )))
                }
            }
            let ticket = s.begin_analysis(image.clone());
            (ticket, s.state.clone())
        };

        self.emit_state(&new_state);
        self.run_analysis(ticket, image).await
    }

    /// Re-run analysis on the held image after a failure.
    /// Transitions: image_ready → analyzing → completed / image_ready.
    pub async fn retry_analysis(&self) -> Result<HistoryEntry, ScanError> {
        let (image, ticket, new_state) = {
            let mut s = self.session_state.lock();
            let image = match &s.state {
                ScanState::ImageReady { image } => image.clone(),
                ScanState::Analyzing { .. } => return Err(ScanError::AnalysisInProgress),
                other => {
                    return Err(ScanError::InvalidTransition(format!(
                        "cannot retry analysis from {}",
                        other.name()
                    )))
                }
            };
            let ticket = s.begin_analysis(image.clone());
            (image, ticket, s.state.clone())
        };

        self.emit_state(&new_state);
        self.run_analysis(ticket, image).await
    }

    /// Discard the image and result, cancel any in-flight analysis and stop
    /// the camera. Always lands in idle; calling it again is a no-op.
    pub fn reset(&self) {
        let (released, cancelled, changed) = {
            let mut s = self.session_state.lock();
            let released = s.stream.take();
            let cancelled = s.in_flight.take();
            let changed = !s.state.is_idle();
            s.state = ScanState::Idle;
            (released, cancelled, changed)
        };

        if let Some(ticket) = cancelled {
            ticket.cancel.cancel();
            log::info!("Cancelled analysis {}", ticket.id);
        }
        drop(released);

        if changed {
            self.emit_state(&ScanState::Idle);
        }
    }

    /// Full history, newest first.
    pub fn history_entries(&self) -> Vec<HistoryEntry> {
        self.history.load()
    }

    /// Delete one history entry (0 = newest).
    pub fn delete_history_entry(&self, index: usize) -> Result<(), ScanError> {
        let before = self.history.len();
        match self.history.delete_at(index) {
            Ok(()) => {
                self.emit(&ScanEvent::HistoryEntryRemoved { index });
                Ok(())
            }
            Err(e @ ScanError::PersistenceError(_)) => {
                // An unreadable store fails before anything is removed.
                if self.history.len() < before {
                    self.emit(&ScanEvent::HistoryEntryRemoved { index });
                }
                self.emit(&ScanEvent::PersistenceFailed(e.clone()));
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    pub fn clear_history(&self) -> Result<(), ScanError> {
        let result = self.history.clear();
        self.emit(&ScanEvent::HistoryCleared);
        if let Err(ref e) = result {
            self.emit(&ScanEvent::PersistenceFailed(e.clone()));
        }
        result
    }

    // --- Internal helpers ---

    /// Await the analyzer and apply its outcome.
    ///
    /// The state transition and the history append happen under one lock, so
    /// a `reset` either lands before (and the result is dropped) or after.
    async fn run_analysis(&self, ticket: AnalysisTicket, image: EncodedImage) -> Result<HistoryEntry, ScanError> {
        log::info!("Analysis {} started ({})", ticket.id, self.analyzer.name());

        let outcome = tokio::select! {
            biased;
            _ = ticket.cancel.cancelled() => Err(ScanError::Cancelled),
            result = self.analyzer.analyze(&image) => result,
        };

        let mut events = Vec::new();
        let (result, new_state) = {
            let mut s = self.session_state.lock();
            let is_current = s.in_flight.as_ref().map(|t| t.id) == Some(ticket.id);
            if !is_current {
                log::info!("Discarding stale analysis {}", ticket.id);
                return Err(ScanError::Cancelled);
            }
            s.in_flight = None;

            let result = match outcome {
                Ok(record) => {
                    events.push(ScanEvent::AnalysisSucceeded {
                        brand: record.brand.clone(),
                        item_type: record.item_type.clone(),
                    });
                    let entry = HistoryEntry::completed(record, image);
                    if let Err(e) = self.history.append(entry.clone()) {
                        events.push(ScanEvent::PersistenceFailed(e));
                    }
                    s.state = ScanState::Completed(Box::new(entry.clone()));
                    log::info!(
                        "Analysis {} completed: {} {} ({})",
                        ticket.id,
                        entry.record.brand,
                        entry.record.item_type,
                        entry.record.confidence
                    );
                    Ok(entry)
                }
                Err(e) => {
                    log::warn!("Analysis {} failed: {}", ticket.id, e);
                    events.push(ScanEvent::AnalysisFailed(e.clone()));
                    s.state = ScanState::ImageReady { image };
                    Err(e)
                }
            };
            (result, s.state.clone())
        };

        self.emit_state(&new_state);
        for event in &events {
            self.emit(event);
        }
        result
    }

    fn emit_state(&self, state: &ScanState) {
        log::debug!("Scan state -> {}", state.name());
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(state);
        }
    }

    fn emit(&self, event: &ScanEvent) {
        if event.is_error() {
            log::warn!("{}", event.message());
        }
        if let Some(ref delegate) = self.delegate {
            delegate.on_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::analysis::mock_analyzer::MockAnalyzer;
    use crate::models::config::FacingMode;
    use crate::models::scan_record::ScanRecord;
    use crate::storage::history_ledger::HistoryLedger;
    use crate::storage::memory_store::MemoryStore;
    use crate::traits::capture_provider::CameraDevice;

    #[derive(Clone, Copy)]
    enum Script {
        Grant,
        Deny,
        NoDevice,
    }

    #[derive(Default)]
    struct Counters {
        live: AtomicUsize,
        stops: AtomicUsize,
    }

    struct ScriptedCamera {
        script: Script,
        counters: Arc<Counters>,
    }

    struct FakeStream {
        active: bool,
        counters: Arc<Counters>,
    }

    impl VideoStream for FakeStream {
        fn capture_frame(&mut self) -> Result<EncodedImage, ScanError> {
            Ok(EncodedImage::from_bytes("image/jpeg", b"frozen-frame"))
        }

        fn stop(&mut self) {
            if self.active {
                self.active = false;
                self.counters.stops.fetch_add(1, Ordering::SeqCst);
                self.counters.live.fetch_sub(1, Ordering::SeqCst);
            }
        }

        fn is_active(&self) -> bool {
            self.active
        }
    }

    #[async_trait]
    impl CaptureProvider for ScriptedCamera {
        type Stream = FakeStream;

        fn is_available(&self) -> bool {
            !matches!(self.script, Script::NoDevice)
        }

        async fn request_stream(&self, facing: FacingMode) -> Result<FakeStream, ScanError> {
            assert_eq!(facing, FacingMode::Environment);
            match self.script {
                Script::Grant => {
                    self.counters.live.fetch_add(1, Ordering::SeqCst);
                    Ok(FakeStream {
                        active: true,
                        counters: Arc::clone(&self.counters),
                    })
                }
                Script::Deny => Err(ScanError::PermissionDenied),
                Script::NoDevice => Err(ScanError::DeviceNotAvailable),
            }
        }

        fn device_info(&self) -> CameraDevice {
            CameraDevice {
                id: "test-cam".into(),
                name: "Test Camera".into(),
                facing: Some(FacingMode::Environment),
            }
        }
    }

    /// Fails while `fail` is set, otherwise answers immediately.
    #[derive(Default)]
    struct FlakyAnalyzer {
        fail: AtomicBool,
    }

    #[async_trait]
    impl Analyzer for FlakyAnalyzer {
        async fn analyze(&self, _image: &EncodedImage) -> Result<ScanRecord, ScanError> {
            if self.fail.load(Ordering::SeqCst) {
                Err(ScanError::AnalysisError("backend unavailable".into()))
            } else {
                Ok(MockAnalyzer::fixed_record())
            }
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    #[derive(Default)]
    struct RecordingDelegate {
        states: Mutex<Vec<&'static str>>,
        events: Mutex<Vec<ScanEvent>>,
    }

    impl RecordingDelegate {
        fn events(&self) -> Vec<ScanEvent> {
            self.events.lock().clone()
        }

        fn states(&self) -> Vec<&'static str> {
            self.states.lock().clone()
        }
    }

    impl ScanDelegate for RecordingDelegate {
        fn on_state_changed(&self, state: &ScanState) {
            self.states.lock().push(state.name());
        }

        fn on_event(&self, event: &ScanEvent) {
            self.events.lock().push(event.clone());
        }
    }

    type TestSession<A> = ScanSession<ScriptedCamera, A, HistoryLedger<MemoryStore>>;

    struct Harness<A: Analyzer> {
        session: TestSession<A>,
        delegate: Arc<RecordingDelegate>,
        counters: Arc<Counters>,
    }

    fn harness_with<A: Analyzer>(script: Script, analyzer: A, store: MemoryStore) -> Harness<A> {
        let config = ScanConfiguration::default();
        let counters = Arc::new(Counters::default());
        let camera = ScriptedCamera {
            script,
            counters: Arc::clone(&counters),
        };
        let history = Arc::new(HistoryLedger::from_config(store, &config));
        let mut session = ScanSession::new(camera, analyzer, history, config).unwrap();
        let delegate = Arc::new(RecordingDelegate::default());
        session.set_delegate(delegate.clone());
        Harness {
            session,
            delegate,
            counters,
        }
    }

    fn harness(script: Script) -> Harness<MockAnalyzer> {
        harness_with(script, MockAnalyzer::default(), MemoryStore::new())
    }

    fn upload_image() -> EncodedImage {
        EncodedImage::from_bytes("image/png", b"uploaded")
    }

    #[test]
    fn rejects_invalid_configuration() {
        let config = ScanConfiguration {
            max_history_items: 0,
            ..Default::default()
        };
        let camera = ScriptedCamera {
            script: Script::Grant,
            counters: Arc::default(),
        };
        let history = Arc::new(HistoryLedger::new(MemoryStore::new(), "k", 1));
        let result = ScanSession::new(camera, MockAnalyzer::default(), history, config);
        assert!(matches!(result, Err(ScanError::Configuration(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn permission_denied_stays_idle() {
        let h = harness(Script::Deny);

        let err = h.session.start_camera().await.unwrap_err();
        assert_eq!(err, ScanError::PermissionDenied);
        assert!(h.session.state().is_idle());
        assert!(!h.session.has_active_stream());
        assert_eq!(h.counters.live.load(Ordering::SeqCst), 0);
        assert_eq!(h.delegate.events(), vec![ScanEvent::PermissionDenied]);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_device_stays_idle() {
        let h = harness(Script::NoDevice);

        let err = h.session.start_camera().await.unwrap_err();
        assert_eq!(err, ScanError::DeviceNotAvailable);
        assert!(h.session.state().is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn capture_without_stream_fails_without_transition() {
        let h = harness(Script::Grant);

        let err = h.session.capture().await.unwrap_err();
        assert!(matches!(err, ScanError::CaptureError(_)));
        assert!(h.session.state().is_idle());
        assert!(h.delegate.states().is_empty());
        assert!(matches!(h.delegate.events().as_slice(), [ScanEvent::CaptureFailed(_)]));
    }

    #[tokio::test(start_paused = true)]
    async fn camera_capture_completes_and_records_history() {
        let h = harness(Script::Grant);

        h.session.start_camera().await.unwrap();
        assert!(h.session.state().is_live_camera());
        assert!(h.session.has_active_stream());

        let entry = h.session.capture().await.unwrap();
        assert_eq!(entry.record.brand, "Nike");
        assert_eq!(entry.image.mime_type(), Some("image/jpeg"));

        // Stream released exactly once, at capture time.
        assert_eq!(h.counters.stops.load(Ordering::SeqCst), 1);
        assert_eq!(h.counters.live.load(Ordering::SeqCst), 0);

        assert!(h.session.state().is_completed());
        assert_eq!(h.session.history_entries(), vec![entry]);
        assert_eq!(
            h.delegate.states(),
            vec!["live_camera", "analyzing", "completed"]
        );
        let events = h.delegate.events();
        assert_eq!(events[0], ScanEvent::CameraStarted);
        assert_eq!(events[1], ScanEvent::PhotoCaptured);
        assert!(matches!(events[2], ScanEvent::AnalysisSucceeded { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_camera_releases_stream() {
        let h = harness(Script::Grant);

        h.session.start_camera().await.unwrap();
        h.session.cancel_camera().unwrap();

        assert!(h.session.state().is_idle());
        assert_eq!(h.counters.live.load(Ordering::SeqCst), 0);
        assert!(h.session.cancel_camera().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn reset_from_live_camera_releases_stream() {
        let h = harness(Script::Grant);

        h.session.start_camera().await.unwrap();
        h.session.reset();
        h.session.reset();

        assert!(h.session.state().is_idle());
        assert_eq!(h.counters.stops.load(Ordering::SeqCst), 1);
        assert_eq!(h.delegate.states(), vec!["live_camera", "idle"]);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_session_releases_stream() {
        let h = harness(Script::Grant);
        h.session.start_camera().await.unwrap();

        let counters = Arc::clone(&h.counters);
        drop(h);
        assert_eq!(counters.live.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn start_camera_requires_idle() {
        let h = harness(Script::Grant);
        h.session.start_camera().await.unwrap();

        let err = h.session.start_camera().await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidTransition(_)));
        assert_eq!(h.counters.live.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn upload_then_reset() {
        let h = harness(Script::Grant);

        let entry = h.session.submit_upload(upload_image()).await.unwrap();
        assert_eq!(entry.image, upload_image());
        assert!(h.session.state().is_completed());

        h.session.reset();
        assert!(h.session.state().is_idle());
        assert_eq!(h.session.history_entries().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn sequential_scans_are_newest_first() {
        let h = harness(Script::Grant);

        let first = h.session.submit_upload(upload_image()).await.unwrap();
        h.session.reset();
        let second = h
            .session
            .submit_upload(EncodedImage::from_bytes("image/webp", b"second"))
            .await
            .unwrap();

        assert_eq!(h.session.history_entries(), vec![second, first]);
    }

    #[tokio::test(start_paused = true)]
    async fn upload_from_completed_is_rejected() {
        let h = harness(Script::Grant);
        h.session.submit_upload(upload_image()).await.unwrap();

        let err = h.session.submit_upload(upload_image()).await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidTransition(_)));
        assert_eq!(h.session.history_entries().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_analysis_leaves_image_ready_for_retry() {
        let analyzer = FlakyAnalyzer::default();
        analyzer.fail.store(true, Ordering::SeqCst);
        let h = harness_with(Script::Grant, analyzer, MemoryStore::new());

        let err = h.session.submit_upload(upload_image()).await.unwrap_err();
        assert!(matches!(err, ScanError::AnalysisError(_)));
        assert_eq!(
            h.session.state(),
            ScanState::ImageReady {
                image: upload_image()
            }
        );
        assert!(h.session.history_entries().is_empty());
        assert!(matches!(
            h.delegate.events().as_slice(),
            [ScanEvent::AnalysisFailed(ScanError::AnalysisError(_))]
        ));

        h.session.analyzer.fail.store(false, Ordering::SeqCst);
        let entry = h.session.retry_analysis().await.unwrap();
        assert_eq!(entry.image, upload_image());
        assert_eq!(h.session.history_entries().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_upload_fails_analysis() {
        let h = harness(Script::Grant);

        let err = h
            .session
            .submit_upload(EncodedImage::from_bytes("image/png", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::AnalysisError(_)));
        assert!(h.session.state().has_image());
        assert!(!h.session.state().is_analyzing());
    }

    #[tokio::test(start_paused = true)]
    async fn second_upload_while_analyzing_is_rejected() {
        let h = harness(Script::Grant);

        let (first, second) = tokio::join!(
            h.session.submit_upload(upload_image()),
            h.session.submit_upload(EncodedImage::from_bytes("image/png", b"other")),
        );

        assert!(first.is_ok());
        assert_eq!(second.unwrap_err(), ScanError::AnalysisInProgress);
        assert_eq!(h.session.history_entries().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_during_analysis_discards_result() {
        let h = harness(Script::Grant);

        let (result, ()) = tokio::join!(h.session.submit_upload(upload_image()), async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            assert!(h.session.state().is_analyzing());
            h.session.reset();
        });

        assert_eq!(result.unwrap_err(), ScanError::Cancelled);
        assert!(h.session.state().is_idle());
        assert!(h.session.history_entries().is_empty());

        // The session is immediately usable again.
        h.session.submit_upload(upload_image()).await.unwrap();
        assert_eq!(h.session.history_entries().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn persistence_failure_still_completes() {
        let h = harness_with(Script::Grant, MockAnalyzer::default(), MemoryStore::with_quota(16));

        let entry = h.session.submit_upload(upload_image()).await.unwrap();

        assert!(h.session.state().is_completed());
        assert_eq!(h.session.history_entries(), vec![entry]);
        assert!(h
            .delegate
            .events()
            .iter()
            .any(|e| matches!(e, ScanEvent::PersistenceFailed(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn history_mutations_emit_events() {
        let h = harness(Script::Grant);
        h.session.submit_upload(upload_image()).await.unwrap();
        h.session.reset();
        h.session.submit_upload(upload_image()).await.unwrap();

        assert_eq!(
            h.session.delete_history_entry(5).unwrap_err(),
            ScanError::IndexOutOfRange { index: 5, len: 2 }
        );
        h.session.delete_history_entry(0).unwrap();
        assert_eq!(h.session.history_entries().len(), 1);

        h.session.clear_history().unwrap();
        assert!(h.session.history_entries().is_empty());

        let events = h.delegate.events();
        assert!(events.contains(&ScanEvent::HistoryEntryRemoved { index: 0 }));
        assert_eq!(events.last(), Some(&ScanEvent::HistoryCleared));
    }
}
