//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Resolve settings → Load endpoints → Restore snapshot → Wire services
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Scheduler stops ticking → Server stops accepting → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::Services;
