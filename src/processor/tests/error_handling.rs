//! Error handling integration tests

use super::{
    CRIME_FIXTURE, MUSEUM_FIXTURE, RecordingPresenter, export_path, file_exists, fixture_config,
};
use crate::error::CorrelationError;
use crate::models::ExportOutcome;
use crate::processor::CorrelationProcessor;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_missing_input_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let config = fixture_config(&temp_dir, MUSEUM_FIXTURE, CRIME_FIXTURE)
        .with_inputs(temp_dir.path().join("nope.csv"), temp_dir.path().join("x.csv"));

    match CorrelationProcessor::new(config) {
        Err(CorrelationError::DatasetNotFound { path }) => {
            assert_eq!(path, temp_dir.path().join("nope.csv"));
        }
        other => panic!("expected DatasetNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_incompatible_years_skip_export_only() {
    let temp_dir = TempDir::new().unwrap();
    let crimes = format!("{}6,07/07/2016,07/07/2016,1000\n", CRIME_FIXTURE);
    let config = fixture_config(&temp_dir, MUSEUM_FIXTURE, &crimes);
    let presenter = Arc::new(RecordingPresenter::default());

    let summary = CorrelationProcessor::new(config)
        .unwrap()
        .with_presenter(presenter.clone())
        .process()
        .await
        .unwrap();

    match &summary.export {
        ExportOutcome::Skipped { reason } => assert!(reason.contains("2016")),
        other => panic!("expected skipped export, got {:?}", other),
    }
    assert!(!file_exists(&export_path(&temp_dir)));
    assert!(!file_exists(&temp_dir.path().join("output")));

    // Presentation still happens
    assert_eq!(presenter.calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unwritable_export_is_not_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let config = fixture_config(&temp_dir, MUSEUM_FIXTURE, CRIME_FIXTURE)
        .without_charts()
        .with_export_path(blocker.join("joined.csv"));

    let summary = CorrelationProcessor::new(config)
        .unwrap()
        .process()
        .await
        .unwrap();

    assert!(!summary.export.is_written());
    assert_eq!(summary.crimes.len(), 2);
}

#[tokio::test]
async fn test_header_only_inputs_produce_empty_export() {
    let temp_dir = TempDir::new().unwrap();
    let config = fixture_config(
        &temp_dir,
        "Month,Avila Adobe\n",
        "DR Number,Date Reported,Date Occurred\n",
    )
    .without_charts();

    let summary = CorrelationProcessor::new(config)
        .unwrap()
        .process()
        .await
        .unwrap();

    assert!(summary.visitors.is_empty());
    assert!(summary.crimes.is_empty());
    assert_eq!(
        summary.export,
        ExportOutcome::Written {
            path: export_path(&temp_dir),
            rows: 0
        }
    );
}

#[tokio::test]
async fn test_invalid_utf8_is_read_lossily() {
    let temp_dir = TempDir::new().unwrap();
    let config = fixture_config(&temp_dir, MUSEUM_FIXTURE, CRIME_FIXTURE).without_charts();

    let mut bytes = CRIME_FIXTURE.as_bytes().to_vec();
    bytes.extend_from_slice(b"7,01/01/2014,01/01/2014,\xff\xfe\n");
    fs::write(&config.crime_input, bytes).unwrap();

    let summary = CorrelationProcessor::new(config)
        .unwrap()
        .process()
        .await
        .unwrap();

    assert_eq!(
        summary.crimes.get(&crate::models::YearKey::parse("2014").unwrap()),
        Some(3.0)
    );
}
