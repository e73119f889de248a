//! Prometheus metrics for the pipeline stages.
//!
//! There is no server to scrape them; commands dump the registry to a
//! textfile (node-exporter textfile collector format) when configured.

use std::path::Path;

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use thiserror::Error;

/// Errors while exporting metrics.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to encode metrics: {0}")]
    Encode(#[from] prometheus::Error),

    #[error("Failed to write metrics file: {0}")]
    Io(#[from] std::io::Error),
}

/// Registry holding every pipeline metric.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    for metric in all_metrics() {
        registry.register(metric).unwrap();
    }
    registry
});

// =============================================================================
// Catalog
// =============================================================================

/// Rows written by catalog downloads.
pub static CATALOG_ROWS_FETCHED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "stamps_catalog_rows_fetched_total",
        "Catalog rows downloaded and written",
    )
    .unwrap()
});

/// Records passing selection.
pub static RECORDS_SELECTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "stamps_records_selected_total",
        "Catalog records passing the selection predicate",
    )
    .unwrap()
});

// =============================================================================
// Cutouts
// =============================================================================

/// Cutout requests by result.
pub static CUTOUTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("stamps_cutouts_total", "Cutout requests by result"),
        &["result"], // "saved", "skipped", "failed"
    )
    .unwrap()
});

/// Duration of successful cutout downloads.
pub static CUTOUT_FETCH_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "stamps_cutout_fetch_duration_seconds",
            "Duration of successful cutout downloads",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
    )
    .unwrap()
});

/// Bytes of cutout data written.
pub static CUTOUT_BYTES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("stamps_cutout_bytes_total", "Bytes of cutout data written").unwrap()
});

// =============================================================================
// Preprocessing
// =============================================================================

/// Preprocessed images by split.
pub static IMAGES_PREPROCESSED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("stamps_images_preprocessed_total", "Preprocessed images by split"),
        &["split"], // "train", "val"
    )
    .unwrap()
});

/// Get all metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CATALOG_ROWS_FETCHED.clone()),
        Box::new(RECORDS_SELECTED.clone()),
        Box::new(CUTOUTS_TOTAL.clone()),
        Box::new(CUTOUT_FETCH_DURATION.clone()),
        Box::new(CUTOUT_BYTES.clone()),
        Box::new(IMAGES_PREPROCESSED.clone()),
    ]
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, MetricsError> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Writes the current metric values to `path`.
///
/// The file is written next to its destination and renamed into place so a
/// collector never reads a partial file.
pub fn write_textfile(path: &Path) -> Result<(), MetricsError> {
    let text = encode_metrics()?;
    let tmp = path.with_extension("prom.tmp");
    std::fs::write(&tmp, text)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
