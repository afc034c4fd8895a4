//! Report files read from disk, the way `treco collect` reads them.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;
use treco::cli::CollectArgs;
use treco::services::ingest;

use super::test_helpers::{MemoryStorage, SAMPLE};

fn args_for(path: PathBuf) -> CollectArgs {
    CollectArgs {
        build: Some("Test".to_string()),
        environment: Some("dev".to_string()),
        jira: Some("DAKOTA".to_string()),
        report_file: Some(path),
        report_format: Some("JUnit".to_string()),
        service: Some("treco".to_string()),
        test_type: Some("unit".to_string()),
        coverage: Some("64.2".to_string()),
    }
}

#[tokio::test]
async fn test_collect_from_report_file() {
    let mut report = NamedTempFile::new().unwrap();
    report.write_all(SAMPLE.as_bytes()).unwrap();

    let (params, path) = args_for(report.path().to_path_buf()).validate().unwrap();
    assert_eq!(params.coverage, Some(64.2));

    let storage = MemoryStorage::new();
    let outcome = ingest(&storage, &params, File::open(path).unwrap())
        .await
        .unwrap();

    assert_eq!(outcome.executed, 5);
    assert_eq!(outcome.passed, 2);
    let state = storage.snapshot();
    assert_eq!(state.suite_results[0].1.service, "treco");
    assert_eq!(state.scenario_results.len(), 5);
}

#[tokio::test]
async fn test_collect_from_empty_file_fails() {
    let report = NamedTempFile::new().unwrap();

    let (params, path) = args_for(report.path().to_path_buf()).validate().unwrap();
    let storage = MemoryStorage::new();
    let result = ingest(&storage, &params, File::open(path).unwrap()).await;

    assert!(result.is_err());
    assert!(storage.snapshot().suite_results.is_empty());
}
