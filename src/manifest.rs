//! Manifest loading: the JSON list of flashcard records the batch walks over.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// One flashcard entry. Only the image fields drive generation; the rest is log context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardRecord {
    /// Prompt sent to the image service
    pub image_prompt: String,

    /// Slash-prefixed path of the artifact, relative to the output root
    pub image_path: String,

    /// Frozen records are never generated, even when the artifact is missing
    #[serde(default)]
    pub frozen: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english: Option<String>,
}

impl FlashcardRecord {
    pub fn new(image_prompt: impl Into<String>, image_path: impl Into<String>) -> Self {
        Self {
            image_prompt: image_prompt.into(),
            image_path: image_path.into(),
            frozen: false,
            category: None,
            english: None,
        }
    }

    pub fn frozen(mut self) -> Self {
        self.frozen = true;
        self
    }

    /// `image_path` without its leading separators, as used for display and resolution.
    pub fn relative_image_path(&self) -> &str {
        self.image_path.trim_start_matches(['/', '\\'])
    }
}

/// Read and parse the manifest at `path`.
pub fn load_manifest(path: &Path) -> Result<Vec<FlashcardRecord>, ApiError> {
    if !path.exists() {
        return Err(ApiError::ManifestNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| ApiError::ManifestParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let records = parse_manifest(&content).map_err(|e| ApiError::ManifestParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    debug!(path = %path.display(), records = records.len(), "Manifest loaded");
    Ok(records)
}

/// Parse manifest JSON content.
pub fn parse_manifest(content: &str) -> Result<Vec<FlashcardRecord>, serde_json::Error> {
    serde_json::from_str(content)
}
