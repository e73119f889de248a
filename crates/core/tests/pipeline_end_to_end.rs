//! End-to-end pipeline tests.
//!
//! Runs every stage against mock remote services:
//! - catalog download and CSV persistence
//! - selection
//! - cutout dispatch (sequential and pooled)
//! - preprocessing into TRAIN/VAL

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use stamps_core::testing::{MockCatalogSource, MockCutoutService};
use stamps_core::{
    fetch_catalog_to_csv, filter_catalog, read_catalog, CutoutDispatcher, CutoutJob, CutoutName,
    DispatchConfig, PreprocessConfig, Preprocessor, SelectionCriteria,
};

fn three_record_catalog() -> MockCatalogSource {
    MockCatalogSource::with_rows(&[
        ["101", "00 10 00.0", "+10 00 00", "G", "Sb", "1.00", "35.0"],
        ["102", "01 20 00.0", "-20 30 00", "G", "", "1.20", ""],
        // In the size window but not a galaxy.
        ["103", "02 30 00.0", "+30 00 00", "S", "E", "1.10", "80.0"],
    ])
}

fn jpg_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".jpg"))
        .collect();
    names.sort();
    names
}

async fn run_pipeline(workers: usize) {
    let root = TempDir::new().unwrap();
    let catalog_path = root.path().join("hyperleda.csv");
    let unproc = root.path().join("unproc");
    let proc_dir = root.path().join("proc");

    // Fetch
    let source = three_record_catalog();
    let rows = fetch_catalog_to_csv(&source, &catalog_path).await.unwrap();
    assert_eq!(rows, 3);
    assert_eq!(source.fetch_count(), 1);

    // Filter
    let records = read_catalog(&catalog_path).unwrap();
    let filtered = filter_catalog(&records, &SelectionCriteria::new(0.8, 1.3));
    assert_eq!(filtered.summary.ingested, 3);
    assert_eq!(filtered.summary.selected, 2);
    assert_eq!(filtered.summary.with_morphology, 1);
    let selected: Vec<u64> = filtered.galaxies.iter().map(|g| g.pgc).collect();
    assert_eq!(selected, vec![101, 102]);

    // Generate
    let service = MockCutoutService::new();
    let dispatcher = CutoutDispatcher::new(DispatchConfig::with_workers(workers), service.clone());
    let job = CutoutJob::new(&unproc).with_geometry(28, 1.2);
    let report = dispatcher.run(filtered.galaxies, job).await.unwrap();

    assert_eq!(report.requested, 2);
    assert_eq!(report.saved, 2);
    assert!(!report.has_failures());
    assert_eq!(service.request_count().await, 2);

    let names = jpg_names(&unproc);
    assert_eq!(names, vec!["glx_101_35.0_Sb.jpg", "glx_102_0.0_NA.jpg"]);
    for name in &names {
        assert!(CutoutName::parse(name).is_ok());
    }

    let requests = service.recorded_requests().await;
    let first = requests.iter().find(|r| r.pgc == 101).unwrap();
    // 1.2 * 60 * 0.1 * 10^1.0 / 28
    assert!((first.plate_scale - 72.0 / 28.0).abs() < 1e-9);
    assert!((first.ra - 2.5).abs() < 1e-9);

    // Preprocess
    let report = tokio::task::spawn_blocking(move || {
        Preprocessor::new(PreprocessConfig::new(&unproc, &proc_dir)).run()
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(report.val, 0);
    assert_eq!(report.train, 2);
    assert_eq!(report.skipped, 0);
}

#[tokio::test]
async fn test_end_to_end_sequential() {
    run_pipeline(1).await;
}

#[tokio::test]
async fn test_end_to_end_pooled() {
    run_pipeline(4).await;
}

#[tokio::test]
async fn test_unavailable_cutouts_do_not_stop_the_run() {
    let root = TempDir::new().unwrap();
    let catalog_path = root.path().join("hyperleda.csv");
    let unproc = root.path().join("unproc");

    fetch_catalog_to_csv(&three_record_catalog(), &catalog_path)
        .await
        .unwrap();
    let records = read_catalog(&catalog_path).unwrap();
    let filtered = filter_catalog(&records, &SelectionCriteria::new(0.5, 2.0));
    assert_eq!(filtered.galaxies.len(), 2);

    let service = MockCutoutService::new();
    service.skip_pgc(102).await;
    let dispatcher = CutoutDispatcher::new(DispatchConfig::with_workers(2), service.clone());
    let report = dispatcher
        .run(filtered.galaxies, CutoutJob::new(&unproc))
        .await
        .unwrap();

    assert_eq!(report.saved, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(jpg_names(&unproc), vec!["glx_101_35.0_Sb.jpg"]);
}

#[tokio::test]
async fn test_catalog_api_error_writes_nothing() {
    let root = TempDir::new().unwrap();
    let catalog_path = root.path().join("hyperleda.csv");

    let source = three_record_catalog();
    source.set_next_error(503, "maintenance").await;

    let result = fetch_catalog_to_csv(&source, &catalog_path).await;
    assert!(result.is_err());
    assert!(!catalog_path.exists());
}
