//! Snapshot persistence subsystem.
//!
//! # Data Flow
//! ```text
//! After every round:
//!     StatusSnapshot → snapshot_file.rs (pretty JSON, temp file + rename)
//!     → on missing directory: create it, retry once
//!     → any failure logged by the caller, polling continues
//!
//! On startup:
//!     snapshot_file.rs (read) → StateStore::restore_from
//! ```
//!
//! # Design Decisions
//! - Best effort: persistence never stops the polling loop
//! - The retry is bounded to exactly one extra attempt

pub mod snapshot_file;

pub use snapshot_file::{load_snapshot, save_snapshot, SaveOutcome, StorageError};
