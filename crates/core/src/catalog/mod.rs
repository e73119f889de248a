//! Source catalog download, persistence and selection.
//!
//! The catalog is fetched once from VizieR (HyperLEDA, table `VII/237/pgc`),
//! its sexagesimal coordinates are converted to decimal degrees and the whole
//! table is written to a CSV file. Later runs read that file back and select
//! the galaxies to fetch cutouts for.

mod config;
pub mod coords;
mod filter;
mod store;
mod types;
mod vizier;

pub use config::CatalogConfig;
pub(crate) use config::default_user_agent;
pub use filter::{filter_catalog, FilterSummary, FilteredCatalog, SelectionCriteria};
pub use store::{read_catalog, write_records, write_table};
pub use types::{CatalogRecord, CatalogTable, SelectedGalaxy};
pub use vizier::VizierClient;

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::metrics;
use coords::CoordinateError;

/// Marker written wherever an optional field is absent.
pub const ABSENT_MARKER: &str = "NA";

/// Object type code HyperLEDA uses for galaxies.
pub const GALAXY_OBJECT_TYPE: &str = "G";

/// Errors that can occur while fetching, storing or reading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Catalog service returned an error status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse the service response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// A coordinate field could not be converted.
    #[error("Invalid coordinates in row {row}: {source}")]
    Coordinate {
        row: usize,
        #[source]
        source: CoordinateError,
    },

    /// A required column is missing from the table.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// The same identifier appears twice.
    #[error("Duplicate PGC identifier: {0}")]
    DuplicateIdentifier(u64),

    /// CSV encoding or decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error while reading or writing the catalog file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A remote source for the full catalog table.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Returns the name of this source.
    fn name(&self) -> &str;

    /// Downloads the complete table, coordinates still in their raw form.
    async fn fetch_table(&self) -> Result<CatalogTable, CatalogError>;
}

/// Downloads the catalog, appends decimal `ra`/`dec` columns and writes it as CSV.
///
/// Returns the number of rows written. Any failure is fatal; nothing is retried.
pub async fn fetch_catalog_to_csv(
    source: &dyn CatalogSource,
    out_path: &Path,
) -> Result<usize, CatalogError> {
    info!("Downloading catalog from {}", source.name());
    let mut table = source.fetch_table().await?;

    info!(rows = table.len(), "Parsing coordinates");
    table.append_decimal_coordinates()?;

    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let rows = table.len();
    let path = out_path.to_path_buf();
    tokio::task::spawn_blocking(move || write_table(&path, &table))
        .await
        .map_err(|e| CatalogError::Io(std::io::Error::other(e)))??;

    metrics::CATALOG_ROWS_FETCHED.inc_by(rows as u64);
    info!(rows, path = %out_path.display(), "Catalog written");
    Ok(rows)
}
