//! Upload intake: turns a user-selected file into an [`EncodedImage`].
//!
//! Validation against the configured type allow-list and size limit lives
//! here, on the upload surface. The session itself accepts any payload.

use std::fs;
use std::path::Path;

use crate::models::config::ScanConfiguration;
use crate::models::error::ScanError;
use crate::models::image::EncodedImage;

/// MIME type for a file name, judged by extension.
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" | "jfif" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        "avif" => "image/avif",
        _ => return None,
    };
    Some(mime)
}

/// Check type and size before reading any bytes.
pub fn validate_upload(mime_type: &str, size: u64, config: &ScanConfiguration) -> Result<(), ScanError> {
    if !config.is_allowed_type(mime_type) {
        return Err(ScanError::UnsupportedFileType(mime_type.to_string()));
    }
    if size > config.max_file_size {
        return Err(ScanError::FileTooLarge {
            size,
            limit: config.max_file_size,
        });
    }
    Ok(())
}

/// Read and encode one selected image file.
pub fn read_image_file(path: &Path, config: &ScanConfiguration) -> Result<EncodedImage, ScanError> {
    let mime_type = mime_type_for(path)
        .ok_or_else(|| ScanError::UnsupportedFileType(path.display().to_string()))?;

    let size = fs::metadata(path)
        .map_err(|e| ScanError::InvalidImage(format!("failed to stat {}: {}", path.display(), e)))?
        .len();
    validate_upload(mime_type, size, config)?;

    let bytes = fs::read(path)
        .map_err(|e| ScanError::InvalidImage(format!("failed to read {}: {}", path.display(), e)))?;
    log::debug!("Read upload {} ({} bytes, {})", path.display(), bytes.len(), mime_type);
    Ok(EncodedImage::from_bytes(mime_type, &bytes))
}
