//! The content record handed in by the editing collaborator.

use serde::{Deserialize, Serialize};

use crate::error::{FlyerError, Result};

/// Text and QR payload for one flyer.
///
/// Only `title` must be non-empty; every other field may be absent and
/// renders as blank. Field names on the wire match the project file format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(default, rename = "desc", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "qr", skip_serializing_if = "Option::is_none")]
    pub qr_payload: Option<String>,
    /// Secondary image reference; carried through but not placed by any layout.
    #[serde(default, rename = "image1", skip_serializing_if = "Option::is_none")]
    pub secondary_image: Option<String>,
}

impl ContentRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_datetime(mut self, value: impl Into<String>) -> Self {
        self.datetime = Some(value.into());
        self
    }

    pub fn with_location(mut self, value: impl Into<String>) -> Self {
        self.location = Some(value.into());
        self
    }

    pub fn with_speaker(mut self, value: impl Into<String>) -> Self {
        self.speaker = Some(value.into());
        self
    }

    pub fn with_description(mut self, value: impl Into<String>) -> Self {
        self.description = Some(value.into());
        self
    }

    pub fn with_qr_payload(mut self, value: impl Into<String>) -> Self {
        self.qr_payload = Some(value.into());
        self
    }

    /// Reject records without a usable title.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(FlyerError::Validation("a title is required".to_string()));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
