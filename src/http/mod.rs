//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → /status-json → status.rs (snapshot as JSON)
//!     → /ws          → websocket.rs (initial snapshot, then one per round)
//!     → anything else → static dashboard files
//! ```

pub mod request;
pub mod server;
pub mod status;
pub mod websocket;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
