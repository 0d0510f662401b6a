//! Batch driver: one strictly sequential pass over the manifest.
//!
//! For each record, in manifest order: evaluate the completion filter, then either skip or
//! request an image, write it, report, and pause. Per-record failures never stop the pass;
//! only manifest loading can abort it.

use crate::artifact::write_artifact;
use crate::error::{ApiError, RecordFailure};
use crate::filter::{self, Decision};
use crate::manifest::{load_manifest, FlashcardRecord};
use crate::pacing::{AttemptOutcome, Pacer};
use crate::provider::ImageProviderClient;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What happened to one record in a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    SkippedFrozen,
    SkippedExists(PathBuf),
    /// Dry run only: would have been requested
    Pending(PathBuf),
    Generated(PathBuf),
    Failed {
        path: PathBuf,
        failure: RecordFailure,
    },
}

impl RecordOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            RecordOutcome::SkippedFrozen => "frozen",
            RecordOutcome::SkippedExists(_) => "present",
            RecordOutcome::Pending(_) => "pending",
            RecordOutcome::Generated(_) => "generated",
            RecordOutcome::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordReport {
    /// Position in the manifest
    pub index: usize,
    /// `imagePath` with leading separators stripped
    pub image_path: String,
    pub outcome: RecordOutcome,
}

/// Per-outcome counts for one pass. Informational; never changes the exit status.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub frozen: usize,
    pub present: usize,
    pub pending: usize,
    pub generated: usize,
    pub failed: usize,
    #[serde(skip)]
    pub reports: Vec<RecordReport>,
}

impl BatchSummary {
    fn record(&mut self, report: RecordReport) {
        self.total += 1;
        match report.outcome {
            RecordOutcome::SkippedFrozen => self.frozen += 1,
            RecordOutcome::SkippedExists(_) => self.present += 1,
            RecordOutcome::Pending(_) => self.pending += 1,
            RecordOutcome::Generated(_) => self.generated += 1,
            RecordOutcome::Failed { .. } => self.failed += 1,
        }
        self.reports.push(report);
    }

    /// Number of generation requests issued during the pass.
    pub fn requests_issued(&self) -> usize {
        self.generated + self.failed
    }
}

/// Receives progress as the pass runs. Defaults do nothing.
pub trait BatchReporter: Send + Sync {
    fn batch_started(&self, _total: usize) {}
    fn generation_started(&self, _index: usize, _record: &FlashcardRecord) {}
    fn record_finished(&self, _report: &RecordReport) {}
}

/// Reporter that discards every event.
pub struct NullReporter;

impl BatchReporter for NullReporter {}

pub struct BatchDriver {
    output_root: PathBuf,
    provider: Arc<dyn ImageProviderClient>,
    pacer: Arc<dyn Pacer>,
    reporter: Arc<dyn BatchReporter>,
}

impl BatchDriver {
    pub fn new(
        output_root: PathBuf,
        provider: Arc<dyn ImageProviderClient>,
        pacer: Arc<dyn Pacer>,
    ) -> Self {
        Self {
            output_root,
            provider,
            pacer,
            reporter: Arc::new(NullReporter),
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn BatchReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Load the manifest, then run one pass. Manifest errors abort before any record is touched.
    pub async fn run_manifest(&self, manifest_path: &Path) -> Result<BatchSummary, ApiError> {
        let records = load_manifest(manifest_path)?;
        Ok(self.run(&records).await)
    }

    /// Run one pass over `records` in order.
    pub async fn run(&self, records: &[FlashcardRecord]) -> BatchSummary {
        info!(
            records = records.len(),
            provider = self.provider.provider_name(),
            model = self.provider.model_name(),
            "Starting batch generation"
        );
        self.reporter.batch_started(records.len());

        let mut summary = BatchSummary::default();
        for (index, record) in records.iter().enumerate() {
            let (outcome, attempt) = match filter::evaluate(record, &self.output_root) {
                Decision::Frozen => {
                    info!(index, image_path = %record.image_path, "Skipping frozen record");
                    (RecordOutcome::SkippedFrozen, None)
                }
                Decision::AlreadyPresent(path) => {
                    debug!(index, path = %path.display(), "Artifact already present");
                    (RecordOutcome::SkippedExists(path), None)
                }
                Decision::Generate(path) => {
                    self.reporter.generation_started(index, record);
                    let outcome = self.attempt(index, record, path).await;
                    let attempt = match outcome {
                        RecordOutcome::Generated(_) => AttemptOutcome::Success,
                        _ => AttemptOutcome::Failure,
                    };
                    (outcome, Some(attempt))
                }
            };

            let report = RecordReport {
                index,
                image_path: record.relative_image_path().to_string(),
                outcome,
            };
            self.reporter.record_finished(&report);
            summary.record(report);

            if let Some(attempt) = attempt {
                self.pacer.pause(attempt).await;
            }
        }

        info!(
            total = summary.total,
            generated = summary.generated,
            failed = summary.failed,
            frozen = summary.frozen,
            present = summary.present,
            "Batch generation finished"
        );
        summary
    }

    async fn attempt(&self, index: usize, record: &FlashcardRecord, path: PathBuf) -> RecordOutcome {
        debug!(index, prompt = %record.image_prompt, "Requesting image");
        let result = match self.provider.request_image(&record.image_prompt).await {
            Ok(image) => write_artifact(&image.data, &path),
            Err(failure) => Err(failure),
        };

        match result {
            Ok(()) => {
                info!(index, path = %path.display(), "Image generated");
                RecordOutcome::Generated(path)
            }
            Err(failure) => {
                warn!(
                    index,
                    path = %path.display(),
                    kind = failure.kind(),
                    error = %failure,
                    "Image generation failed"
                );
                RecordOutcome::Failed { path, failure }
            }
        }
    }
}

/// Evaluate every record without issuing requests.
///
/// A path already marked pending earlier in the pass is reported as present for later
/// duplicates, matching what a real pass does once the first write succeeds.
pub fn plan(records: &[FlashcardRecord], output_root: &Path) -> BatchSummary {
    let mut summary = BatchSummary::default();
    let mut planned: HashSet<PathBuf> = HashSet::new();

    for (index, record) in records.iter().enumerate() {
        let outcome = match filter::evaluate(record, output_root) {
            Decision::Frozen => RecordOutcome::SkippedFrozen,
            Decision::AlreadyPresent(path) => RecordOutcome::SkippedExists(path),
            Decision::Generate(path) => {
                if planned.insert(path.clone()) {
                    RecordOutcome::Pending(path)
                } else {
                    RecordOutcome::SkippedExists(path)
                }
            }
        };
        summary.record(RecordReport {
            index,
            image_path: record.relative_image_path().to_string(),
            outcome,
        });
    }
    summary
}
