//! Probe round scheduling.
//!
//! # Responsibilities
//! - Run one probe per configured endpoint per round, all concurrently
//! - Wait for the whole round before touching shared state
//! - Publish the round: apply to the store, push to subscribers, persist
//! - Sleep a fixed interval after publishing, then go again

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use tokio::sync::broadcast;
use tokio::time;

use crate::config::ProbeConfig;
use crate::health::prober::{ProbeResult, Prober};
use crate::health::snapshot::StatusSnapshot;
use crate::health::state::StateStore;
use crate::observability::metrics;
use crate::push::Broadcaster;
use crate::storage::{save_snapshot, SaveOutcome};

pub struct RoundScheduler {
    endpoints: Vec<String>,
    prober: Prober,
    store: Arc<StateStore>,
    broadcaster: Arc<Broadcaster>,
    interval: Duration,
    snapshot_path: Option<PathBuf>,
}

impl RoundScheduler {
    pub fn new(
        endpoints: Vec<String>,
        prober: Prober,
        store: Arc<StateStore>,
        broadcaster: Arc<Broadcaster>,
        config: &ProbeConfig,
    ) -> Self {
        Self {
            endpoints,
            prober,
            store,
            broadcaster,
            interval: config.interval(),
            snapshot_path: None,
        }
    }

    /// Persist the snapshot to `path` after every round.
    pub fn with_persistence(mut self, path: PathBuf) -> Self {
        self.snapshot_path = Some(path);
        self
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            endpoints = self.endpoints.len(),
            interval_secs = self.interval.as_secs(),
            persist = self.snapshot_path.is_some(),
            "Round scheduler starting"
        );

        loop {
            self.run_round().await;

            tokio::select! {
                _ = time::sleep(self.interval) => {}
                _ = shutdown.recv() => {
                    tracing::info!("Round scheduler received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Probe every endpoint, then publish the complete round.
    pub async fn run_round(&self) -> Arc<StatusSnapshot> {
        let started = Instant::now();
        let results = self.probe_all().await;

        self.store.apply_round(&results);
        let snapshot = Arc::new(self.store.snapshot());

        let report = self.broadcaster.broadcast(snapshot.clone());
        self.persist(&snapshot).await;

        let elapsed = started.elapsed();
        metrics::record_round(elapsed, snapshot.healthy_count(), snapshot.len());
        for view in snapshot.endpoints() {
            metrics::record_endpoint_health(&view.url, view.healthy);
        }

        tracing::info!(
            healthy = snapshot.healthy_count(),
            total = snapshot.len(),
            subscribers = report.delivered + report.skipped,
            dropped_subscribers = report.dropped,
            elapsed_ms = elapsed.as_millis() as u64,
            "Round complete"
        );

        snapshot
    }

    async fn probe_all(&self) -> Vec<ProbeResult> {
        join_all(self.endpoints.iter().map(|url| self.prober.probe(url))).await
    }

    async fn persist(&self, snapshot: &Arc<StatusSnapshot>) {
        let Some(path) = self.snapshot_path.clone() else {
            return;
        };

        let snapshot = snapshot.clone();
        let result = tokio::task::spawn_blocking(move || save_snapshot(&snapshot, &path)).await;

        match result {
            Ok(Ok(SaveOutcome::Written)) => {}
            Ok(Ok(SaveOutcome::WrittenAfterCreatingDir)) => {
                tracing::info!("Snapshot saved after creating data directory");
            }
            Ok(Err(e)) => {
                metrics::record_persist_failure();
                tracing::error!(error = %e, "Failed to save status snapshot");
            }
            Err(e) => {
                metrics::record_persist_failure();
                tracing::error!(error = %e, "Snapshot save task failed");
            }
        }
    }
}
