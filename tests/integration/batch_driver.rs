//! Integration tests for the batch pass: skip rules, one request per pending record,
//! failure isolation, and pacing.

use super::test_utils::{
    png, touch_artifact, write_manifest, RecordingPacer, ScriptedProvider, SCENARIO_MANIFEST,
};
use cardgen::batch::{plan, BatchDriver, RecordOutcome};
use cardgen::error::{ApiError, RecordFailure};
use cardgen::filter::should_generate;
use cardgen::manifest::{load_manifest, FlashcardRecord};
use cardgen::pacing::AttemptOutcome;
use std::sync::Arc;
use tempfile::TempDir;

fn driver(
    output_root: &std::path::Path,
    provider: &Arc<ScriptedProvider>,
    pacer: &Arc<RecordingPacer>,
) -> BatchDriver {
    BatchDriver::new(output_root.to_path_buf(), provider.clone(), pacer.clone())
}

#[tokio::test]
async fn test_scenario_all_satisfied_issues_zero_requests() {
    let temp = TempDir::new().unwrap();
    let manifest = write_manifest(temp.path(), SCENARIO_MANIFEST);
    let output = temp.path().join("public");
    touch_artifact(&output, "img/apple.png");

    let provider = Arc::new(ScriptedProvider::always_ok(3));
    let pacer = Arc::new(RecordingPacer::default());
    let summary = driver(&output, &provider, &pacer)
        .run_manifest(&manifest)
        .await
        .unwrap();

    assert!(provider.prompts().is_empty());
    assert!(pacer.pauses().is_empty());
    assert!(matches!(
        summary.reports[0].outcome,
        RecordOutcome::SkippedExists(_)
    ));
    assert_eq!(summary.reports[1].outcome, RecordOutcome::SkippedFrozen);
    assert!(matches!(
        summary.reports[2].outcome,
        RecordOutcome::SkippedExists(_)
    ));
    assert!(!output.join("img/b.png").exists());
}

#[tokio::test]
async fn test_scenario_order_dependent_idempotence() {
    let temp = TempDir::new().unwrap();
    let manifest = write_manifest(temp.path(), SCENARIO_MANIFEST);
    let output = temp.path().join("public");

    let provider = Arc::new(ScriptedProvider::always_ok(3));
    let pacer = Arc::new(RecordingPacer::default());
    let summary = driver(&output, &provider, &pacer)
        .run_manifest(&manifest)
        .await
        .unwrap();

    assert_eq!(provider.prompts(), vec!["a red apple"]);
    assert_eq!(summary.generated, 1);
    assert_eq!(summary.present, 1);
    assert_eq!(summary.frozen, 1);

    let artifact = output.join("img/apple.png");
    assert!(std::fs::metadata(&artifact).unwrap().len() > 0);
    assert!(!output.join("img/b.png").exists());
    assert_eq!(pacer.pauses(), vec![AttemptOutcome::Success]);
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let manifest = write_manifest(
        temp.path(),
        r#"[{"imagePrompt": "cat", "imagePath": "/animals/cat.png"},
            {"imagePrompt": "dog", "imagePath": "/animals/dog.png"}]"#,
    );
    let output = temp.path().join("public");

    let first = Arc::new(ScriptedProvider::always_ok(2));
    let pacer = Arc::new(RecordingPacer::default());
    let summary = driver(&output, &first, &pacer)
        .run_manifest(&manifest)
        .await
        .unwrap();
    assert_eq!(summary.generated, 2);

    let second = Arc::new(ScriptedProvider::always_ok(2));
    let summary = driver(&output, &second, &pacer)
        .run_manifest(&manifest)
        .await
        .unwrap();
    assert!(second.prompts().is_empty());
    assert_eq!(summary.present, 2);
    assert_eq!(summary.requests_issued(), 0);
}

#[tokio::test]
async fn test_frozen_never_requested_even_when_missing() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("public");
    let records = vec![
        FlashcardRecord::new("frozen one", "/img/frozen.png").frozen(),
        FlashcardRecord::new("live one", "/img/live.png"),
    ];

    let provider = Arc::new(ScriptedProvider::always_ok(2));
    let pacer = Arc::new(RecordingPacer::default());
    driver(&output, &provider, &pacer).run(&records).await;

    assert_eq!(provider.prompts(), vec!["live one"]);
    assert!(!output.join("img/frozen.png").exists());
    assert!(!should_generate(&records[0], &output));
}

#[tokio::test]
async fn test_failed_records_are_not_retried_within_a_run() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("public");
    let records = vec![
        FlashcardRecord::new("flaky", "/img/flaky.png"),
        FlashcardRecord::new("empty", "/img/empty.png"),
        FlashcardRecord::new("fine", "/img/fine.png"),
    ];

    let provider = Arc::new(ScriptedProvider::new(vec![
        Err(RecordFailure::RequestFailed(
            "Rate limit exceeded: 429".to_string(),
        )),
        Err(RecordFailure::NoImageReturned),
        png(),
    ]));
    let pacer = Arc::new(RecordingPacer::default());
    let summary = driver(&output, &provider, &pacer).run(&records).await;

    assert_eq!(provider.prompts(), vec!["flaky", "empty", "fine"]);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.generated, 1);
    assert!(!output.join("img/flaky.png").exists());
    assert!(!output.join("img/empty.png").exists());
    assert!(output.join("img/fine.png").exists());
    assert_eq!(
        pacer.pauses(),
        vec![
            AttemptOutcome::Failure,
            AttemptOutcome::Failure,
            AttemptOutcome::Success
        ]
    );

    // The next run picks the failures up again
    let retry = Arc::new(ScriptedProvider::always_ok(3));
    driver(&output, &retry, &pacer).run(&records).await;
    assert_eq!(retry.prompts(), vec!["flaky", "empty"]);
}

#[tokio::test]
async fn test_unparseable_manifest_aborts_before_processing() {
    let temp = TempDir::new().unwrap();
    let manifest = write_manifest(temp.path(), r#"[{"imagePrompt": "no path"}]"#);
    let output = temp.path().join("public");

    let provider = Arc::new(ScriptedProvider::always_ok(1));
    let pacer = Arc::new(RecordingPacer::default());
    let err = driver(&output, &provider, &pacer)
        .run_manifest(&manifest)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::ManifestParseError { .. }));
    assert!(provider.prompts().is_empty());
    assert!(!output.exists());
}

#[test]
fn test_plan_matches_real_pass_for_duplicates() {
    let temp = TempDir::new().unwrap();
    let manifest = write_manifest(temp.path(), SCENARIO_MANIFEST);
    let records = load_manifest(&manifest).unwrap();

    let summary = plan(&records, &temp.path().join("public"));
    assert_eq!(summary.pending, 1);
    assert_eq!(summary.present, 1);
    assert_eq!(summary.frozen, 1);
}
