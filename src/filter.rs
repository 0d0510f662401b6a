//! Completion filter: decides, per record, whether an artifact still has to be generated.
//!
//! The artifact file on disk is the only completion marker. The check reads filesystem
//! state at call time and is not safe against concurrent runs writing the same tree.

use crate::manifest::FlashcardRecord;
use std::path::{Path, PathBuf};

/// Why a record is or is not generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Explicitly excluded by the manifest
    Frozen,
    /// Artifact already on disk at the resolved path
    AlreadyPresent(PathBuf),
    /// Needs a request; the artifact will be written at this path
    Generate(PathBuf),
}

impl Decision {
    pub fn needs_generation(&self) -> bool {
        matches!(self, Decision::Generate(_))
    }
}

/// Resolve a record's artifact path: leading separators are stripped, then joined onto the root.
pub fn resolve_artifact_path(record: &FlashcardRecord, output_root: &Path) -> PathBuf {
    output_root.join(record.relative_image_path())
}

/// Evaluate a record against the output tree. Frozen wins over presence.
pub fn evaluate(record: &FlashcardRecord, output_root: &Path) -> Decision {
    if record.frozen {
        return Decision::Frozen;
    }
    let path = resolve_artifact_path(record, output_root);
    if path.exists() {
        Decision::AlreadyPresent(path)
    } else {
        Decision::Generate(path)
    }
}

pub fn should_generate(record: &FlashcardRecord, output_root: &Path) -> bool {
    evaluate(record, output_root).needs_generation()
}
