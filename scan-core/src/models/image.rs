use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::error::ScanError;

const DATA_URL_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// A self-contained image payload in data-URL form
/// (`data:<mime>;base64,<payload>`).
///
/// Both camera capture and file upload produce this representation, so a
/// stored history entry never depends on a live file handle or stream.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedImage(String);

impl EncodedImage {
    /// Encode raw image bytes under the given MIME type.
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self(format!(
            "{}{}{}{}",
            DATA_URL_PREFIX,
            mime_type,
            BASE64_MARKER,
            STANDARD.encode(bytes)
        ))
    }

    /// Wrap an existing data URL without checking it.
    pub fn from_data_url(data_url: impl Into<String>) -> Self {
        Self(data_url.into())
    }

    pub fn as_data_url(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.payload().map_or(true, str::is_empty)
    }

    /// MIME type from the data-URL header, if the header is well formed.
    pub fn mime_type(&self) -> Option<&str> {
        let rest = self.0.strip_prefix(DATA_URL_PREFIX)?;
        let end = rest.find(BASE64_MARKER)?;
        Some(&rest[..end])
    }

    /// Decode the payload back into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, ScanError> {
        let payload = self
            .payload()
            .ok_or_else(|| ScanError::InvalidImage("not a base64 data URL".into()))?;
        if payload.is_empty() {
            return Err(ScanError::InvalidImage("empty image payload".into()));
        }
        STANDARD
            .decode(payload)
            .map_err(|e| ScanError::InvalidImage(format!("corrupt base64 payload: {}", e)))
    }

    /// Size of the data URL in bytes, as stored.
    pub fn encoded_len(&self) -> usize {
        self.0.len()
    }

    fn payload(&self) -> Option<&str> {
        let rest = self.0.strip_prefix(DATA_URL_PREFIX)?;
        let start = rest.find(BASE64_MARKER)? + BASE64_MARKER.len();
        Some(&rest[start..])
    }
}

// Payloads are large; keep Debug output to the header.
impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedImage")
            .field("mime_type", &self.mime_type())
            .field("encoded_len", &self.encoded_len())
            .finish()
    }
}
