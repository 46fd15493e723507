//! Live subscriber registry and snapshot fan-out.
//!
//! # Responsibilities
//! - Track currently connected subscribers
//! - Deliver every published snapshot to each of them
//! - Drop subscribers whose connection has gone away
//!
//! # Design Decisions
//! - Each subscriber owns a small bounded queue drained by its connection task;
//!   `broadcast` only ever `try_send`s, so it never waits on a subscriber
//! - A closed queue means the connection task has exited (write failure,
//!   timeout or disconnect): the subscriber is removed
//! - A full queue means the subscriber is behind: it skips this snapshot
//! - Dead ids are collected during iteration and removed afterwards

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::health::snapshot::StatusSnapshot;
use crate::observability::metrics;

pub type SubscriberId = u64;

/// Per-broadcast delivery summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    /// Subscribers whose queue was full.
    pub skipped: usize,
    /// Subscribers removed because their connection is gone.
    pub dropped: usize,
}

/// Registry of live subscribers.
#[derive(Debug)]
pub struct Broadcaster {
    subscribers: DashMap<SubscriberId, mpsc::Sender<Arc<StatusSnapshot>>>,
    next_id: AtomicU64,
    queue_capacity: usize,
}

impl Broadcaster {
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            subscribers: DashMap::new(),
            next_id: AtomicU64::new(1),
            queue_capacity: queue_capacity.max(1),
        }
    }

    /// Register a new subscriber. It is removed again when the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe(self: &Arc<Self>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        self.subscribers.insert(id, tx);
        metrics::record_subscribers(self.subscribers.len());
        tracing::debug!(subscriber = id, total = self.subscribers.len(), "Subscriber added");

        Subscription {
            id,
            updates: rx,
            broadcaster: self.clone(),
        }
    }

    /// Remove a subscriber. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let removed = self.subscribers.remove(&id).is_some();
        if removed {
            metrics::record_subscribers(self.subscribers.len());
            tracing::debug!(subscriber = id, total = self.subscribers.len(), "Subscriber removed");
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Hand `snapshot` to every current subscriber without waiting on any of them.
    pub fn broadcast(&self, snapshot: Arc<StatusSnapshot>) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        let mut dead = Vec::new();

        for entry in self.subscribers.iter() {
            match entry.value().try_send(snapshot.clone()) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(subscriber = *entry.key(), "Subscriber queue full, skipping snapshot");
                    report.skipped += 1;
                }
                Err(TrySendError::Closed(_)) => dead.push(*entry.key()),
            }
        }

        for id in dead {
            if self.unsubscribe(id) {
                report.dropped += 1;
            }
        }

        report
    }
}

/// Receiving side of one subscriber.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    updates: mpsc::Receiver<Arc<StatusSnapshot>>,
    broadcaster: Arc<Broadcaster>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Next published snapshot. `None` once the subscription is closed.
    pub async fn recv(&mut self) -> Option<Arc<StatusSnapshot>> {
        self.updates.recv().await
    }

    /// Stop accepting snapshots. The next broadcast notices and removes this
    /// subscriber.
    pub fn close(&mut self) {
        self.updates.close();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.broadcaster.unsubscribe(self.id);
    }
}
