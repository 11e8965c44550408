use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ScanError;

/// A place the identified item can be bought.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetailLink {
    pub name: String,
    pub url: String,
}

impl RetailLink {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Recognition confidence as a percentage, always within 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Confidence(u8);

impl Confidence {
    pub const MAX: u8 = 100;

    pub fn new(percent: u8) -> Result<Self, ScanError> {
        if percent > Self::MAX {
            return Err(ScanError::AnalysisError(format!(
                "confidence {} exceeds {}",
                percent,
                Self::MAX
            )));
        }
        Ok(Self(percent))
    }

    /// Clamps values above 100.
    pub const fn saturating(percent: u8) -> Self {
        if percent > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(percent)
        }
    }

    pub fn percent(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Confidence {
    type Error = ScanError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Confidence> for u8 {
    fn from(c: Confidence) -> Self {
        c.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// The output of one analysis: what the item is and where it came from.
///
/// Serialized with camelCase keys so persisted history stays readable by
/// the web front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    pub brand: String,
    pub item_type: String,
    pub origin: String,
    pub manufacturer: String,
    /// Display order; duplicates allowed.
    pub retail_links: Vec<RetailLink>,
    pub confidence: Confidence,
}

impl ScanRecord {
    /// Title handed to the platform share sheet.
    pub fn share_title(&self) -> String {
        format!("{} {}", self.brand, self.item_type)
    }

    /// Body text handed to the platform share sheet.
    pub fn share_text(&self) -> String {
        format!(
            "Found on Clothing Origin: {} - Made in {}",
            self.brand, self.origin
        )
    }
}
