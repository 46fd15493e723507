//! Endpoint health state store.
//!
//! # States
//! - Healthy: last probe got a 2xx response (also the initial state)
//! - Unhealthy: last probe got a non-2xx response or no response at all
//!
//! # State Transitions
//! ```text
//! any → Healthy:   successful probe, lastHealthy advances
//! any → Unhealthy: failed probe, lastUnhealthy advances
//! ```
//!
//! # Design Decisions
//! - One coarse lock around the whole map: a round is applied as a single batch,
//!   so readers see either the previous round or the new one, never a mix
//! - Timestamps only move forward
//! - The endpoint set is fixed at construction; unknown results are ignored

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::SystemTime;

use crate::health::prober::ProbeResult;
use crate::health::snapshot::{from_epoch_secs, to_epoch_secs, EndpointView, StatusSnapshot};

/// Health of one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthState {
    pub healthy: bool,
    pub last_healthy_at: Option<SystemTime>,
    pub last_unhealthy_at: Option<SystemTime>,
    pub last_response_code: u16,
    pub last_response_time_ms: u64,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            healthy: true,
            last_healthy_at: None,
            last_unhealthy_at: None,
            last_response_code: 0,
            last_response_time_ms: 0,
        }
    }
}

impl HealthState {
    /// Fold a probe result into this state.
    pub fn apply(&mut self, result: &ProbeResult) {
        self.healthy = result.healthy;
        self.last_response_code = result.response_code;
        self.last_response_time_ms = result.response_time_ms;

        if result.healthy {
            self.last_healthy_at = Some(advance(self.last_healthy_at, result.checked_at));
        } else {
            self.last_unhealthy_at = Some(advance(self.last_unhealthy_at, result.checked_at));
        }
    }

    pub fn view(&self, url: &str) -> EndpointView {
        EndpointView {
            url: url.to_string(),
            healthy: self.healthy,
            last_healthy: to_epoch_secs(self.last_healthy_at),
            last_unhealthy: to_epoch_secs(self.last_unhealthy_at),
            response_code: self.last_response_code,
            response_time: self.last_response_time_ms,
        }
    }

    pub fn from_view(view: &EndpointView) -> Self {
        Self {
            healthy: view.healthy,
            last_healthy_at: from_epoch_secs(view.last_healthy),
            last_unhealthy_at: from_epoch_secs(view.last_unhealthy),
            last_response_code: view.response_code,
            last_response_time_ms: view.response_time,
        }
    }
}

fn advance(previous: Option<SystemTime>, at: SystemTime) -> SystemTime {
    match previous {
        Some(previous) if previous > at => previous,
        _ => at,
    }
}

/// Owner of all endpoint health state.
#[derive(Debug)]
pub struct StateStore {
    entries: RwLock<HashMap<String, HealthState>>,
}

impl StateStore {
    /// Create a store with default state for every configured endpoint.
    pub fn new<I, S>(endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = endpoints
            .into_iter()
            .map(|url| (url.into(), HealthState::default()))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("health state lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current state of one endpoint.
    pub fn get(&self, url: &str) -> Option<HealthState> {
        self.entries
            .read()
            .expect("health state lock poisoned")
            .get(url)
            .cloned()
    }

    /// Apply a complete round of results. Returns how many results matched a
    /// configured endpoint.
    pub fn apply_round(&self, results: &[ProbeResult]) -> usize {
        let mut entries = self.entries.write().expect("health state lock poisoned");
        let mut applied = 0;
        for result in results {
            match entries.get_mut(&result.url) {
                Some(state) => {
                    state.apply(result);
                    applied += 1;
                }
                None => {
                    tracing::debug!(url = %result.url, "Ignoring result for unconfigured endpoint");
                }
            }
        }
        applied
    }

    /// Consistent, url-sorted view of every endpoint.
    pub fn snapshot(&self) -> StatusSnapshot {
        let views = {
            let entries = self.entries.read().expect("health state lock poisoned");
            entries
                .iter()
                .map(|(url, state)| state.view(url))
                .collect()
        };
        StatusSnapshot::from_views(views)
    }

    /// Overwrite default state with previously persisted views. Only configured
    /// endpoints are touched. Returns the number of restored entries.
    pub fn restore_from(&self, snapshot: &StatusSnapshot) -> usize {
        let mut entries = self.entries.write().expect("health state lock poisoned");
        let mut restored = 0;
        for view in snapshot.endpoints() {
            if let Some(state) = entries.get_mut(&view.url) {
                *state = HealthState::from_view(view);
                restored += 1;
            }
        }
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, UNIX_EPOCH};

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn ok(url: &str, secs: u64) -> ProbeResult {
        ProbeResult::from_status(url, 200, Duration::from_millis(20), at(secs))
    }

    fn failed(url: &str, secs: u64) -> ProbeResult {
        ProbeResult::from_status(url, 503, Duration::from_millis(40), at(secs))
    }

    #[test]
    fn test_unprobed_endpoints_keep_defaults() {
        let store = StateStore::new(["http://a", "http://b"]);
        store.apply_round(&[ok("http://a", 100)]);

        assert_eq!(store.get("http://b"), Some(HealthState::default()));
        let b = store.snapshot().get("http://b").cloned().unwrap();
        assert!(b.healthy);
        assert_eq!((b.last_healthy, b.last_unhealthy), (0, 0));
    }

    #[test]
    fn test_timestamps_only_move_with_matching_outcome() {
        let store = StateStore::new(["http://a"]);

        store.apply_round(&[failed("http://a", 100)]);
        let state = store.get("http://a").unwrap();
        assert!(!state.healthy);
        assert_eq!(state.last_healthy_at, None);
        assert_eq!(state.last_unhealthy_at, Some(at(100)));
        assert_eq!(state.last_response_code, 503);

        store.apply_round(&[ok("http://a", 110)]);
        let state = store.get("http://a").unwrap();
        assert!(state.healthy);
        assert_eq!(state.last_healthy_at, Some(at(110)));
        assert_eq!(state.last_unhealthy_at, Some(at(100)));
        assert_eq!(state.last_response_time_ms, 20);

        store.apply_round(&[ok("http://a", 120)]);
        let state = store.get("http://a").unwrap();
        assert_eq!(state.last_healthy_at, Some(at(120)));
        assert_eq!(state.last_unhealthy_at, Some(at(100)));
    }

    #[test]
    fn test_timestamps_never_regress() {
        let store = StateStore::new(["http://a"]);
        store.apply_round(&[ok("http://a", 200)]);
        store.apply_round(&[ok("http://a", 150)]);
        assert_eq!(store.get("http://a").unwrap().last_healthy_at, Some(at(200)));
    }

    #[test]
    fn test_transport_failure_records_zero_code() {
        let store = StateStore::new(["http://a"]);
        store.apply_round(&[ProbeResult::transport_failure("http://a", Duration::from_millis(5), at(50))]);
        let view = store.snapshot().get("http://a").cloned().unwrap();
        assert!(!view.healthy);
        assert_eq!(view.response_code, 0);
        assert_eq!(view.response_time, 5);
        assert_eq!(view.last_unhealthy, 50);
    }

    #[test]
    fn test_unknown_results_ignored() {
        let store = StateStore::new(["http://a"]);
        assert_eq!(store.apply_round(&[ok("http://a", 1), ok("http://other", 1)]), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_snapshot_sorted_regardless_of_insertion_order() {
        let store = StateStore::new(["http://m", "http://z", "http://a", "http://k"]);
        let urls: Vec<_> = store.snapshot().endpoints().iter().map(|v| v.url.clone()).collect();
        assert_eq!(urls, vec!["http://a", "http://k", "http://m", "http://z"]);
    }

    #[test]
    fn test_restore_only_touches_configured_endpoints() {
        let store = StateStore::new(["http://a", "http://b"]);
        let persisted = StatusSnapshot::from_views(vec![
            EndpointView {
                url: "http://a".into(),
                healthy: false,
                last_healthy: 1_000,
                last_unhealthy: 2_000,
                response_code: 500,
                response_time: 80,
            },
            EndpointView {
                url: "http://gone".into(),
                healthy: true,
                last_healthy: 3_000,
                last_unhealthy: 0,
                response_code: 200,
                response_time: 10,
            },
        ]);

        assert_eq!(store.restore_from(&persisted), 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.snapshot().get("http://a"), persisted.get("http://a"));
        assert_eq!(store.get("http://b"), Some(HealthState::default()));
    }

    #[test]
    fn test_readers_never_observe_partial_round() {
        let urls: Vec<String> = (0..32).map(|i| format!("http://endpoint-{i:02}")).collect();
        let store = Arc::new(StateStore::new(urls.clone()));
        let done = Arc::new(AtomicBool::new(false));

        let writer = {
            let store = store.clone();
            let done = done.clone();
            std::thread::spawn(move || {
                for round in 0..500u64 {
                    let batch: Vec<_> = urls
                        .iter()
                        .map(|url| if round % 2 == 0 { failed(url, round) } else { ok(url, round) })
                        .collect();
                    store.apply_round(&batch);
                }
                done.store(true, Ordering::SeqCst);
            })
        };

        while !done.load(Ordering::SeqCst) {
            let snapshot = store.snapshot();
            let healthy = snapshot.healthy_count();
            assert!(
                healthy == 0 || healthy == snapshot.len(),
                "observed a mixed round: {healthy}/{}",
                snapshot.len()
            );
        }
        writer.join().unwrap();
    }
}
