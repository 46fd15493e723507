//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → cli.rs (flag overrides)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!
//! endpoint list (JSON array of URLs)
//!     → endpoints.rs (parse, drop invalid and duplicate entries)
//!     → fixed endpoint set for the process lifetime
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - A broken endpoint list is not fatal: the dashboard starts empty

pub mod cli;
pub mod endpoints;
pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::ServiceConfig;
pub use schema::ListenerConfig;
pub use schema::ProbeConfig;
pub use schema::StorageConfig;
pub use schema::SubscriberConfig;
pub use schema::ObservabilityConfig;
