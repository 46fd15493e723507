//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Round (scheduler.rs):
//!     Fixed-interval loop
//!     → prober.rs: one concurrent GET per endpoint
//!     → barrier: wait for every probe
//!     → state.rs: apply the whole batch under one lock
//!     → snapshot.rs: sorted, immutable view
//!     → push subscribers, persist
//! ```
//!
//! # Design Decisions
//! - Round latency is bounded by the slowest probe, not the sum
//! - Partial rounds are never published
//! - Health state is per-endpoint, keyed by the URL string

pub mod prober;
pub mod scheduler;
pub mod snapshot;
pub mod state;

pub use prober::{ProbeOutcome, ProbeResult, Prober};
pub use scheduler::RoundScheduler;
pub use snapshot::{EndpointView, StatusSnapshot};
pub use state::{HealthState, StateStore};
