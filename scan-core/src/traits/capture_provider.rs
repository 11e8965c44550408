use async_trait::async_trait;

use crate::models::config::FacingMode;
use crate::models::error::ScanError;
use crate::models::image::EncodedImage;

/// A camera device offered by a capture surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub id: String,
    pub name: String,
    pub facing: Option<FacingMode>,
}

/// A live video stream holding camera hardware.
///
/// The session wraps every stream in a guard that calls [`VideoStream::stop`]
/// on each exit from the live-camera state, so `stop` must be idempotent.
pub trait VideoStream: Send {
    /// Freeze the current frame into a self-contained JPEG payload.
    fn capture_frame(&mut self) -> Result<EncodedImage, ScanError>;

    /// Stop all tracks and release the hardware.
    fn stop(&mut self);

    fn is_active(&self) -> bool;
}

/// Interface for platform-specific camera and capture sources.
///
/// Implemented by the front end (browser media devices, a desktop webcam,
/// or the still-frame provider in the sample app).
#[async_trait]
pub trait CaptureProvider: Send + Sync {
    type Stream: VideoStream + 'static;

    /// Whether any camera is present at all.
    fn is_available(&self) -> bool;

    /// Acquire a stream, preferring the given facing mode.
    ///
    /// May suspend while the user answers a permission prompt. Fails with
    /// `PermissionDenied` or `DeviceNotAvailable`.
    async fn request_stream(&self, facing: FacingMode) -> Result<Self::Stream, ScanError>;

    /// Information about the camera backing this provider.
    fn device_info(&self) -> CameraDevice;
}
