//! Artifact writer: persists generated image bytes under the output root.

use crate::error::RecordFailure;
use std::path::Path;
use tracing::debug;

/// Write `bytes` to `destination`, creating missing parent directories.
///
/// Overwrites an existing file. The write is not atomic: an interrupted run can leave a
/// truncated file, which later runs treat as present.
pub fn write_artifact(bytes: &[u8], destination: &Path) -> Result<(), RecordFailure> {
    let to_failure = |e: std::io::Error| RecordFailure::WriteError {
        path: destination.to_path_buf(),
        message: e.to_string(),
    };

    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(to_failure)?;
        }
    }
    std::fs::write(destination, bytes).map_err(to_failure)?;

    debug!(path = %destination.display(), bytes = bytes.len(), "Artifact written");
    Ok(())
}
