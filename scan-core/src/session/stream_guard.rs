use crate::traits::capture_provider::VideoStream;

/// Owns a live camera stream and stops it when dropped.
///
/// The session only ever holds a stream through this guard, so every path
/// out of the live-camera state (capture, cancel, reset, session drop)
/// releases the hardware.
pub(crate) struct StreamGuard<S: VideoStream> {
    stream: S,
}

impl<S: VideoStream> StreamGuard<S> {
    pub(crate) fn new(stream: S) -> Self {
        Self { stream }
    }

    pub(crate) fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub(crate) fn is_active(&self) -> bool {
        self.stream.is_active()
    }
}

impl<S: VideoStream> Drop for StreamGuard<S> {
    fn drop(&mut self) {
        self.stream.stop();
        log::debug!("Camera stream released");
    }
}
