use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;

use scan_core::processing::image_intake::mime_type_for;
use scan_core::{CameraDevice, CaptureProvider, EncodedImage, FacingMode, ScanError, VideoStream};

/// Camera backend that "films" a single image file.
///
/// Stands in for a webcam so the capture path can be driven from a
/// terminal. Every captured frame is the file's current contents.
pub struct StillCamera {
    frame_path: Option<PathBuf>,
    permission_granted: bool,
}

impl StillCamera {
    pub fn new(frame_path: Option<PathBuf>, permission_granted: bool) -> Self {
        Self {
            frame_path,
            permission_granted,
        }
    }
}

pub struct StillStream {
    frame_path: PathBuf,
    active: bool,
}

impl VideoStream for StillStream {
    fn capture_frame(&mut self) -> Result<EncodedImage, ScanError> {
        if !self.active {
            return Err(ScanError::CaptureError("stream stopped".into()));
        }
        let bytes = fs::read(&self.frame_path)
            .map_err(|e| ScanError::CaptureError(format!("failed to read frame: {}", e)))?;
        let mime = mime_type_for(&self.frame_path).unwrap_or("image/jpeg");
        Ok(EncodedImage::from_bytes(mime, &bytes))
    }

    fn stop(&mut self) {
        if self.active {
            self.active = false;
            log::debug!("Still camera stopped ({})", self.frame_path.display());
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[async_trait]
impl CaptureProvider for StillCamera {
    type Stream = StillStream;

    fn is_available(&self) -> bool {
        self.frame_path.as_ref().map_or(false, |p| p.is_file())
    }

    async fn request_stream(&self, facing: FacingMode) -> Result<StillStream, ScanError> {
        if !self.permission_granted {
            return Err(ScanError::PermissionDenied);
        }
        let frame_path = self
            .frame_path
            .clone()
            .filter(|p| p.is_file())
            .ok_or(ScanError::DeviceNotAvailable)?;
        log::debug!("Still camera opened ({:?} preferred)", facing);
        Ok(StillStream {
            frame_path,
            active: true,
        })
    }

    fn device_info(&self) -> CameraDevice {
        CameraDevice {
            id: "still-frame".into(),
            name: self
                .frame_path
                .as_ref()
                .map(|p| format!("Still frame {}", p.display()))
                .unwrap_or_else(|| "Still frame (none)".into()),
            facing: None,
        }
    }
}
