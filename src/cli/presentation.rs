//! CLI presentation: per-record console lines, run summary, and status views.

use crate::batch::{BatchReporter, BatchSummary, RecordOutcome, RecordReport};
use crate::error::ApiError;
use crate::manifest::FlashcardRecord;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::Path;

/// Prints one line per event on stdout as the batch runs.
pub struct ConsoleReporter;

impl BatchReporter for ConsoleReporter {
    fn batch_started(&self, total: usize) {
        println!("Starting batch generation for {} cards...", total);
    }

    fn generation_started(&self, _index: usize, record: &FlashcardRecord) {
        println!("{}", format_generation_start(record));
    }

    fn record_finished(&self, report: &RecordReport) {
        if let Some(line) = format_record_line(report) {
            println!("{}", line);
        }
    }
}

pub fn format_generation_start(record: &FlashcardRecord) -> String {
    format!("{} {}", "Generating:".bold(), record.image_prompt)
}

/// Console line for a finished record. Records whose artifact already exists stay silent.
pub fn format_record_line(report: &RecordReport) -> Option<String> {
    match &report.outcome {
        RecordOutcome::SkippedFrozen => Some(format!(
            "{} {} (frozen)",
            "Skipping".cyan(),
            report.image_path
        )),
        RecordOutcome::SkippedExists(_) => None,
        RecordOutcome::Pending(_) => Some(format!(
            "{} {}",
            "Would generate".yellow(),
            report.image_path
        )),
        RecordOutcome::Generated(path) => Some(format!(
            "{} {}",
            "Saved to".green(),
            file_name(path)
        )),
        RecordOutcome::Failed { failure, .. } => Some(format!(
            "{} {}: {}",
            "Failed".red(),
            report.image_path,
            failure
        )),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Closing line(s) after a pass.
pub fn format_summary_text(summary: &BatchSummary, dry_run: bool) -> String {
    if dry_run {
        let mut out = String::new();
        for report in &summary.reports {
            if let Some(line) = format_record_line(report) {
                out.push_str(&line);
                out.push('\n');
            }
        }
        out.push_str(&format!(
            "Dry run: {} to generate, {} present, {} frozen ({} records)",
            summary.pending, summary.present, summary.frozen, summary.total
        ));
        return out;
    }

    format!(
        "Done: {} generated, {} failed, {} present, {} frozen ({} records)",
        summary.generated.green(),
        summary.failed.red(),
        summary.present,
        summary.frozen,
        summary.total
    )
}

pub fn format_status_text(summary: &BatchSummary, manifest: &Path, output_root: &Path) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "Manifest status".bold().underline()));
    out.push_str(&format!("Manifest: {}\n", manifest.display()));
    out.push_str(&format!("Output:   {}\n", output_root.display()));

    let mut counts = Table::new();
    counts.load_preset(UTF8_BORDERS_ONLY);
    counts.set_header(vec!["Records", "Present", "Frozen", "Pending"]);
    counts.add_row(vec![
        summary.total.to_string(),
        summary.present.to_string(),
        summary.frozen.to_string(),
        summary.pending.to_string(),
    ]);
    out.push_str(&counts.to_string());

    let pending: Vec<&RecordReport> = summary
        .reports
        .iter()
        .filter(|r| matches!(r.outcome, RecordOutcome::Pending(_)))
        .collect();
    if !pending.is_empty() {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["#", "Pending image"]);
        for report in pending {
            table.add_row(vec![report.index.to_string(), report.image_path.clone()]);
        }
        out.push('\n');
        out.push_str(&table.to_string());
    }
    out
}

pub fn format_status_json(
    summary: &BatchSummary,
    manifest: &Path,
    output_root: &Path,
) -> Result<String, ApiError> {
    let records: Vec<_> = summary
        .reports
        .iter()
        .map(|r| {
            json!({
                "index": r.index,
                "image_path": r.image_path,
                "state": r.outcome.label(),
            })
        })
        .collect();
    let value = json!({
        "manifest": manifest.display().to_string(),
        "output_root": output_root.display().to_string(),
        "counts": summary,
        "records": records,
    });
    serde_json::to_string_pretty(&value)
        .map_err(|e| ApiError::RuntimeError(format!("Failed to serialize status: {}", e)))
}
