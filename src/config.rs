//! Configuration System
//!
//! Layered configuration for the batch client: where the manifest lives, where artifacts
//! go, which image model to call, and how long to pause between calls. The credential
//! itself never lives in configuration; only the name of the environment variable does.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use crate::pacing::PacingConfig;
pub use crate::provider::ProviderConfig;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardgenConfig {
    /// Manifest location, relative to the project root unless absolute
    #[serde(default = "default_manifest_path")]
    pub manifest_path: PathBuf,

    /// Artifact root, relative to the project root unless absolute
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,

    /// Image generation service settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Delays applied after each attempted record
    #[serde(default)]
    pub pacing: PacingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from("src/data/flashcards.json")
}

fn default_output_root() -> PathBuf {
    PathBuf::from("public")
}

impl Default for CardgenConfig {
    fn default() -> Self {
        Self {
            manifest_path: default_manifest_path(),
            output_root: default_output_root(),
            provider: ProviderConfig::default(),
            pacing: PacingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Paths(String),
    Provider(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Paths(msg) => write!(f, "Paths: {}", msg),
            ValidationError::Provider(msg) => write!(f, "Provider: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl CardgenConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.manifest_path.as_os_str().is_empty() {
            errors.push(ValidationError::Paths(
                "Manifest path cannot be empty".to_string(),
            ));
        }
        if self.output_root.as_os_str().is_empty() {
            errors.push(ValidationError::Paths(
                "Output root cannot be empty".to_string(),
            ));
        }
        if let Err(e) = self.provider.validate() {
            errors.push(ValidationError::Provider(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Same as [`validate`](Self::validate), folded into a single run-level error.
    pub fn ensure_valid(&self) -> Result<(), ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })
    }

    /// Resolve manifest and output paths against the project root.
    pub fn resolve_paths(&self, project_root: &Path) -> (PathBuf, PathBuf) {
        (
            resolve_against(project_root, &self.manifest_path),
            resolve_against(project_root, &self.output_root),
        )
    }
}

fn resolve_against(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Credential for the image service, read from the process environment once at startup.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    /// Read the credential from `var`. Missing or empty is a fatal configuration error.
    pub fn from_env(var: &str) -> Result<Self, ApiError> {
        match std::env::var(var) {
            Ok(value) if !value.trim().is_empty() => Ok(Self { api_key: value }),
            _ => Err(ApiError::MissingCredential(var.to_string())),
        }
    }

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}
