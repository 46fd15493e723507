//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the endpoint list (a broken list yields an empty dashboard, not a crash)
//! - Build the state store and restore the persisted snapshot
//! - Build the broadcaster, scheduler and HTTP server around shared handles
//!
//! # Design Decisions
//! - Only bind failures and invalid settings are fatal; they surface in main
//! - Subsystems initialize in order, listeners start last

use std::sync::Arc;

use crate::config::endpoints::load_endpoints;
use crate::config::ServiceConfig;
use crate::health::{Prober, RoundScheduler, StateStore};
use crate::http::HttpServer;
use crate::push::Broadcaster;
use crate::storage::load_snapshot;

/// Every long-lived component, wired together.
pub struct Services {
    pub config: ServiceConfig,
    pub endpoints: Vec<String>,
    pub store: Arc<StateStore>,
    pub broadcaster: Arc<Broadcaster>,
}

impl Services {
    /// Load endpoints from the configured file and build the services.
    pub fn prepare(config: ServiceConfig) -> Self {
        let path = &config.dashboard.endpoints_path;
        let endpoints = match load_endpoints(path) {
            Ok(endpoints) => endpoints,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to load endpoint list, starting with none");
                Vec::new()
            }
        };
        Self::with_endpoints(config, endpoints)
    }

    /// Build the services around an explicit endpoint list.
    pub fn with_endpoints(config: ServiceConfig, endpoints: Vec<String>) -> Self {
        if endpoints.is_empty() {
            tracing::warn!(
                path = %config.dashboard.endpoints_path.display(),
                "No endpoints configured: the dashboard will stay empty"
            );
        } else {
            tracing::info!(count = endpoints.len(), "Endpoints loaded");
        }

        let store = Arc::new(StateStore::new(endpoints.iter().cloned()));
        if config.storage.enabled {
            restore_snapshot(&config, &store);
        }

        let broadcaster = Arc::new(Broadcaster::new(config.subscribers.queue_capacity));

        Self {
            config,
            endpoints,
            store,
            broadcaster,
        }
    }

    pub fn scheduler(&self) -> Result<RoundScheduler, reqwest::Error> {
        let prober = Prober::new(&self.config.probe)?;
        Ok(self.scheduler_with(prober))
    }

    /// Scheduler using a caller-supplied prober.
    pub fn scheduler_with(&self, prober: Prober) -> RoundScheduler {
        let scheduler = RoundScheduler::new(
            self.endpoints.clone(),
            prober,
            self.store.clone(),
            self.broadcaster.clone(),
            &self.config.probe,
        );
        if self.config.storage.enabled {
            scheduler.with_persistence(self.config.storage.snapshot_path())
        } else {
            scheduler
        }
    }

    pub fn http_server(&self) -> HttpServer {
        HttpServer::new(self.config.clone(), self.store.clone(), self.broadcaster.clone())
    }
}

fn restore_snapshot(config: &ServiceConfig, store: &StateStore) {
    let path = config.storage.snapshot_path();
    match load_snapshot(&path) {
        Ok(Some(snapshot)) => {
            let restored = store.restore_from(&snapshot);
            tracing::info!(path = %path.display(), restored, persisted = snapshot.len(), "Restored status snapshot");
        }
        Ok(None) => {
            tracing::info!(path = %path.display(), "No persisted snapshot, starting fresh");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unreadable status snapshot");
        }
    }
}
