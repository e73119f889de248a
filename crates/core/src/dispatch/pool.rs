//! Cutout dispatcher implementation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info};

use crate::catalog::SelectedGalaxy;
use crate::cutout::{CutoutError, CutoutJob, CutoutOutcome, CutoutRequest, CutoutService};
use crate::metrics;

use super::{DispatchConfig, DispatchError, DispatchReport};

/// Tracks outcomes across all tasks of a run.
struct PoolStats {
    total: usize,
    progress_every: usize,
    completed: AtomicUsize,
    saved: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
}

impl PoolStats {
    fn new(total: usize, progress_every: usize) -> Self {
        Self {
            total,
            progress_every,
            completed: AtomicUsize::new(0),
            saved: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }

    fn record(&self, pgc: u64, result: Result<CutoutOutcome, CutoutError>) {
        match result {
            Ok(CutoutOutcome::Saved { .. }) => {
                self.saved.fetch_add(1, Ordering::Relaxed);
                metrics::CUTOUTS_TOTAL.with_label_values(&["saved"]).inc();
            }
            Ok(CutoutOutcome::Skipped { .. }) => {
                self.skipped.fetch_add(1, Ordering::Relaxed);
                metrics::CUTOUTS_TOTAL.with_label_values(&["skipped"]).inc();
            }
            Err(e) => {
                error!(pgc, error = %e, "Cutout task failed");
                self.record_failure();
                return;
            }
        }
        self.tick();
    }

    fn record_panic(&self, err: JoinError) {
        error!(error = %err, "Cutout task aborted");
        self.record_failure();
    }

    fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        metrics::CUTOUTS_TOTAL.with_label_values(&["failed"]).inc();
        self.tick();
    }

    fn tick(&self) {
        let done = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
        if self.progress_every > 0 && done % self.progress_every == 0 && done < self.total {
            info!("Processed {}/{} galaxies", done, self.total);
        }
    }

    fn to_report(&self) -> DispatchReport {
        DispatchReport {
            requested: self.total,
            saved: self.saved.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Runs a cutout service over a set of galaxies.
pub struct CutoutDispatcher<S: CutoutService> {
    config: DispatchConfig,
    service: Arc<S>,
}

impl<S: CutoutService + 'static> CutoutDispatcher<S> {
    /// Creates a new dispatcher.
    pub fn new(config: DispatchConfig, service: S) -> Self {
        Self {
            config,
            service: Arc::new(service),
        }
    }

    /// Fetches a cutout for every galaxy and waits for all of them.
    ///
    /// Per-record failures never abort the run; they are counted in the
    /// returned report.
    pub async fn run(
        &self,
        galaxies: Vec<SelectedGalaxy>,
        job: CutoutJob,
    ) -> Result<DispatchReport, DispatchError> {
        if self.config.workers == 0 {
            return Err(DispatchError::NoWorkers);
        }

        tokio::fs::create_dir_all(&job.out_dir)
            .await
            .map_err(|source| DispatchError::OutputDir {
                path: job.out_dir.clone(),
                source,
            })?;

        let start = Instant::now();
        let stats = Arc::new(PoolStats::new(galaxies.len(), self.config.progress_every));
        info!(
            service = self.service.name(),
            workers = self.config.workers,
            out_dir = %job.out_dir.display(),
            "Retrieving {} cutouts",
            galaxies.len()
        );

        if self.config.workers == 1 {
            self.run_sequential(galaxies, &job, &stats).await;
        } else {
            self.run_parallel(galaxies, Arc::new(job), &stats).await?;
        }

        let report = stats.to_report();
        info!(
            saved = report.saved,
            skipped = report.skipped,
            failed = report.failed,
            elapsed_secs = start.elapsed().as_secs_f64(),
            "Processed {}/{} galaxies",
            report.requested,
            report.requested
        );
        Ok(report)
    }

    async fn run_sequential(
        &self,
        galaxies: Vec<SelectedGalaxy>,
        job: &CutoutJob,
        stats: &PoolStats,
    ) {
        for galaxy in galaxies {
            let request = CutoutRequest::for_galaxy(&galaxy, job);
            let service = Arc::clone(&self.service);

            // One task at a time, so a panicking fetch is contained like in the pool.
            let handle = tokio::spawn(async move { service.fetch(&request).await });
            match handle.await {
                Ok(result) => stats.record(galaxy.pgc, result),
                Err(e) => stats.record_panic(e),
            }
        }
    }

    async fn run_parallel(
        &self,
        galaxies: Vec<SelectedGalaxy>,
        job: Arc<CutoutJob>,
        stats: &Arc<PoolStats>,
    ) -> Result<(), DispatchError> {
        let semaphore = Arc::new(Semaphore::new(self.config.workers));
        let mut tasks = JoinSet::new();

        for galaxy in galaxies {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| DispatchError::PoolClosed)?;

            let service = Arc::clone(&self.service);
            let job = Arc::clone(&job);
            let task_stats = Arc::clone(stats);

            tasks.spawn(async move {
                let _permit = permit;
                let request = CutoutRequest::for_galaxy(&galaxy, &job);
                let result = service.fetch(&request).await;
                task_stats.record(galaxy.pgc, result);
            });

            // Reap finished tasks so the set does not grow with the input.
            while let Some(joined) = tasks.try_join_next() {
                if let Err(e) = joined {
                    stats.record_panic(e);
                }
            }
        }

        debug!(remaining = tasks.len(), "All cutout tasks queued");
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                stats.record_panic(e);
            }
        }

        Ok(())
    }
}
