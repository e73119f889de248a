//! Mock cutout service for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use super::fixtures::jpeg_bytes;
use crate::cutout::{CutoutError, CutoutOutcome, CutoutRequest, CutoutService};

/// Mock implementation of the CutoutService trait.
///
/// Provides controllable behavior for testing:
/// - Records every request for assertions
/// - Writes a small valid JPEG for successful requests
/// - Simulates unavailable cutouts, local errors and panics per PGC
/// - Tracks peak concurrency
#[derive(Debug, Clone, Default)]
pub struct MockCutoutService {
    requests: Arc<RwLock<Vec<CutoutRequest>>>,
    skip_ids: Arc<RwLock<HashSet<u64>>>,
    fail_ids: Arc<RwLock<HashSet<u64>>>,
    panic_ids: Arc<RwLock<HashSet<u64>>>,
    delay: Arc<RwLock<Option<Duration>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockCutoutService {
    /// Create a new mock service where every request succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded requests, in arrival order.
    pub async fn recorded_requests(&self) -> Vec<CutoutRequest> {
        self.requests.read().await.clone()
    }

    /// Get the number of requests received.
    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }

    /// Report the cutout for `pgc` as unavailable.
    pub async fn skip_pgc(&self, pgc: u64) {
        self.skip_ids.write().await.insert(pgc);
    }

    /// Fail the request for `pgc` with a local I/O error.
    pub async fn fail_pgc(&self, pgc: u64) {
        self.fail_ids.write().await.insert(pgc);
    }

    /// Panic while handling `pgc`.
    pub async fn panic_on_pgc(&self, pgc: u64) {
        self.panic_ids.write().await.insert(pgc);
    }

    /// Set a simulated response time.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Highest number of requests handled at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn respond(&self, request: &CutoutRequest) -> Result<CutoutOutcome, CutoutError> {
        if let Some(delay) = *self.delay.read().await {
            tokio::time::sleep(delay).await;
        }

        if self.skip_ids.read().await.contains(&request.pgc) {
            return Ok(CutoutOutcome::Skipped {
                reason: "HTTP 404".to_string(),
            });
        }

        if self.fail_ids.read().await.contains(&request.pgc) {
            return Err(CutoutError::io(
                request.output_path.clone(),
                std::io::Error::other("simulated write failure"),
            ));
        }

        let body = jpeg_bytes(request.image_size);
        tokio::fs::write(&request.output_path, &body)
            .await
            .map_err(|e| CutoutError::io(request.output_path.clone(), e))?;

        Ok(CutoutOutcome::Saved {
            path: request.output_path.clone(),
            bytes: body.len() as u64,
        })
    }
}

#[async_trait]
impl CutoutService for MockCutoutService {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, request: &CutoutRequest) -> Result<CutoutOutcome, CutoutError> {
        self.requests.write().await.push(request.clone());

        if self.panic_ids.read().await.contains(&request.pgc) {
            panic!("simulated panic for PGC {}", request.pgc);
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let result = self.respond(request).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
