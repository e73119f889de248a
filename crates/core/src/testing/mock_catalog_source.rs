//! Mock catalog source for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::{CatalogError, CatalogSource, CatalogTable};

const MOCK_COLUMNS: [&str; 7] = ["PGC", "RAJ2000", "DEJ2000", "OType", "MType", "logD25", "PA"];

/// Mock implementation of the CatalogSource trait.
///
/// Serves a fixed table and counts how often it was fetched. An API error can
/// be queued for the next fetch.
#[derive(Debug, Clone)]
pub struct MockCatalogSource {
    table: Arc<RwLock<CatalogTable>>,
    next_error: Arc<RwLock<Option<(u16, String)>>>,
    fetch_count: Arc<AtomicUsize>,
}

impl MockCatalogSource {
    /// Create a mock serving `table`.
    pub fn new(table: CatalogTable) -> Self {
        Self {
            table: Arc::new(RwLock::new(table)),
            next_error: Arc::new(RwLock::new(None)),
            fetch_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock from rows in the column order
    /// `PGC, RAJ2000, DEJ2000, OType, MType, logD25, PA`.
    pub fn with_rows(rows: &[[&str; 7]]) -> Self {
        let table = CatalogTable {
            columns: MOCK_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        };
        Self::new(table)
    }

    /// Configure the next fetch to fail with an API error.
    pub async fn set_next_error(&self, status: u16, message: &str) {
        *self.next_error.write().await = Some((status, message.to_string()));
    }

    /// Number of fetches performed.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for MockCatalogSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_table(&self) -> Result<CatalogTable, CatalogError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        if let Some((status, message)) = self.next_error.write().await.take() {
            return Err(CatalogError::ApiError { status, message });
        }

        Ok(self.table.read().await.clone())
    }
}
