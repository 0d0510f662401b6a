//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map run-level errors to the message printed on stderr before exiting non-zero.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::MissingCredential(var) => format!(
            "Error: {} not found. Export it before running, e.g. `export {}=...`.",
            var, var
        ),
        ApiError::ManifestNotFound(path) => {
            format!("Error: manifest not found at: {}", path.display())
        }
        other => format!("Error: {}", other),
    }
}
