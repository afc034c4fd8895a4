//! Decode, aggregate and save through the in-memory backend.

use treco::error::{IngestError, ReportError, SaveError};
use treco::models::ScenarioStatus;
use treco::services::ingest;

use super::test_helpers::{params, MemoryStorage, SAMPLE, TWO_SUITES};

#[tokio::test]
async fn test_sample_report_totals() {
    let storage = MemoryStorage::new();

    let outcome = ingest(&storage, &params("junit"), SAMPLE.as_bytes())
        .await
        .unwrap();

    assert_eq!(outcome.executed, 5);
    assert_eq!(outcome.failed, 2);
    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.passed, 2);
    assert_eq!(outcome.scenarios, 5);

    let state = storage.snapshot();
    assert_eq!(state.suite_results.len(), 1);
    let (id, suite) = &state.suite_results[0];
    assert_eq!(*id, outcome.suite_result_id);
    assert_eq!(suite.service, "onboarding");
    assert_eq!(suite.test_type, "e2e");
    assert_eq!(suite.coverage, Some(81.5));
    assert!((suite.totals.time_taken - 6.286).abs() < 1e-9);
}

#[tokio::test]
async fn test_scenario_results_keep_document_order() {
    let storage = MemoryStorage::new();

    ingest(&storage, &params("junit"), TWO_SUITES.as_bytes())
        .await
        .unwrap();

    let state = storage.snapshot();
    let names: Vec<_> = state
        .scenario_results
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(names, vec!["a1", "a2", "b1"]);

    let statuses: Vec<_> = state.scenario_results.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![
            ScenarioStatus::Passed,
            ScenarioStatus::Failed,
            ScenarioStatus::Skipped
        ]
    );
}

#[tokio::test]
async fn test_every_result_points_at_its_scenario_and_suite() {
    let storage = MemoryStorage::new();

    let outcome = ingest(&storage, &params("junit"), SAMPLE.as_bytes())
        .await
        .unwrap();

    let state = storage.snapshot();
    for result in &state.scenario_results {
        assert_eq!(result.suite_result_id, Some(outcome.suite_result_id));
        let scenario = state
            .scenarios
            .iter()
            .find(|s| Some(s.id) == result.scenario_id)
            .unwrap();
        assert_eq!(scenario.name, result.name);
        assert_eq!(scenario.service, "onboarding");
        assert_eq!(scenario.test_type, "e2e");
    }
}

#[tokio::test]
async fn test_saving_twice_reuses_scenarios() {
    let storage = MemoryStorage::new();

    let first = ingest(&storage, &params("junit"), SAMPLE.as_bytes())
        .await
        .unwrap();
    let second = ingest(&storage, &params("junit"), SAMPLE.as_bytes())
        .await
        .unwrap();

    let state = storage.snapshot();
    assert_ne!(first.suite_result_id, second.suite_result_id);
    assert_eq!(state.suite_results.len(), 2);
    assert_eq!(state.scenarios.len(), 5);
    assert_eq!(state.scenario_results.len(), 10);
    assert_eq!(state.features.len(), 3);
}

#[tokio::test]
async fn test_features_from_names_and_tags() {
    let storage = MemoryStorage::new();

    let outcome = ingest(&storage, &params("junit"), SAMPLE.as_bytes())
        .await
        .unwrap();

    let state = storage.snapshot();
    let features: Vec<_> = state.features.iter().map(String::as_str).collect();
    assert_eq!(features, vec!["DAKOTA-1", "DAKOTA-2", "DAKOTA-3"]);
    assert_eq!(outcome.features, 3);

    let scenario_id = |name: &str| {
        state
            .scenarios
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.id)
            .unwrap()
    };
    let tagged = scenario_id("test_passed_1");
    assert!(state.feature_links.contains(&("DAKOTA-1".to_string(), tagged)));
    assert!(state.feature_links.contains(&("DAKOTA-3".to_string(), tagged)));
    assert!(state
        .feature_links
        .contains(&("DAKOTA-2".to_string(), scenario_id("test_failed dakota-2"))));
    assert_eq!(state.feature_links.len(), 4);
}

#[tokio::test]
async fn test_unsupported_format_saves_nothing() {
    let storage = MemoryStorage::new();

    let err = ingest(&storage, &params("mbunit"), SAMPLE.as_bytes())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        IngestError::Report(ReportError::UnsupportedFormat(ref f)) if f == "mbunit"
    ));
    assert!(storage.snapshot().suite_results.is_empty());
}

#[tokio::test]
async fn test_malformed_report_saves_nothing() {
    let storage = MemoryStorage::new();

    let err = ingest(&storage, &params("junit"), "<testsuite><testcase".as_bytes())
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::Report(ReportError::Malformed(_))));
    let state = storage.snapshot();
    assert!(state.scenarios.is_empty());
    assert!(state.suite_results.is_empty());
}

#[tokio::test]
async fn test_failed_save_leaves_storage_unchanged() {
    let storage = MemoryStorage::failing();

    let err = ingest(&storage, &params("junit"), SAMPLE.as_bytes())
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::Save(SaveError::Backend(ref m)) if m == "disk full"));
    let state = storage.snapshot();
    assert!(state.scenarios.is_empty());
    assert!(state.features.is_empty());
    assert!(state.scenario_results.is_empty());
}
