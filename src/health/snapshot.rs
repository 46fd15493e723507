//! Point-in-time status views.
//!
//! A [`StatusSnapshot`] is what every consumer sees: the JSON API, websocket
//! subscribers and the persisted state file. The wire names match what the
//! dashboard UI reads (`lastHealthy`, `responseTime`, ...). Timestamps are epoch
//! seconds, with 0 meaning "never".

use serde::{Deserialize, Deserializer, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Status of a single endpoint as exposed to consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointView {
    pub url: String,
    pub healthy: bool,
    /// Epoch seconds of the last successful probe, 0 if never.
    pub last_healthy: i64,
    /// Epoch seconds of the last failed probe, 0 if never.
    pub last_unhealthy: i64,
    /// Status code of the last probe, 0 when no response was received.
    pub response_code: u16,
    /// Duration of the last probe in milliseconds.
    pub response_time: u64,
}

/// Immutable list of endpoint views, always sorted by url.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatusSnapshot {
    endpoints: Vec<EndpointView>,
}

impl StatusSnapshot {
    pub fn from_views(mut endpoints: Vec<EndpointView>) -> Self {
        endpoints.sort_by(|a, b| a.url.cmp(&b.url));
        Self { endpoints }
    }

    pub fn endpoints(&self) -> &[EndpointView] {
        &self.endpoints
    }

    pub fn get(&self, url: &str) -> Option<&EndpointView> {
        self.endpoints
            .binary_search_by(|view| view.url.as_str().cmp(url))
            .ok()
            .map(|idx| &self.endpoints[idx])
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn healthy_count(&self) -> usize {
        self.endpoints.iter().filter(|view| view.healthy).count()
    }
}

impl<'de> Deserialize<'de> for StatusSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<EndpointView>::deserialize(deserializer).map(Self::from_views)
    }
}

/// Convert an optional wall-clock time to epoch seconds (0 for `None`).
pub fn to_epoch_secs(time: Option<SystemTime>) -> i64 {
    time.and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Inverse of [`to_epoch_secs`]: non-positive values mean "never".
pub fn from_epoch_secs(secs: i64) -> Option<SystemTime> {
    (secs > 0).then(|| UNIX_EPOCH + Duration::from_secs(secs as u64))
}
