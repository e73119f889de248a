//! Configuration for the catalog fetcher.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Catalog download configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// VizieR `viz-bin` base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// VizieR table identifier.
    #[serde(default = "default_source")]
    pub source: String,

    /// Maximum number of rows to request; unlimited when unset.
    #[serde(default)]
    pub row_limit: Option<u64>,

    /// Columns to request from the table.
    #[serde(default = "default_columns")]
    pub columns: Vec<String>,

    /// Request timeout in seconds. The full table is large, so this is generous.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User-Agent sent to the catalog service.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Location of the persisted catalog CSV.
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

fn default_base_url() -> String {
    "https://vizier.cds.unistra.fr/viz-bin".to_string()
}

fn default_source() -> String {
    "VII/237/pgc".to_string()
}

fn default_columns() -> Vec<String> {
    [
        "PGC", "RAJ2000", "DEJ2000", "OType", "MType", "logD25", "logR25", "PA", "ANames",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

fn default_timeout() -> u64 {
    1800 // 30 minutes
}

pub(crate) fn default_user_agent() -> String {
    format!("galaxy-stamps/{}", env!("CARGO_PKG_VERSION"))
}

fn default_path() -> PathBuf {
    PathBuf::from("hyperleda.csv")
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            source: default_source(),
            row_limit: None,
            columns: default_columns(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            path: default_path(),
        }
    }
}

impl CatalogConfig {
    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the row limit.
    pub fn with_row_limit(mut self, limit: Option<u64>) -> Self {
        self.row_limit = limit;
        self
    }
}
