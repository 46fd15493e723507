//! Live push subsystem.
//!
//! # Data Flow
//! ```text
//! Client connects to /ws
//!     → http/websocket.rs upgrades, registers a Subscription
//!     → current snapshot sent immediately
//!
//! Round completes
//!     → broadcaster.rs try_sends the snapshot to every subscriber queue
//!     → each connection task drains its queue onto its socket
//!
//! Write fails / times out / client leaves
//!     → connection task exits, Subscription dropped, subscriber removed
//! ```

pub mod broadcaster;

pub use broadcaster::{BroadcastReport, Broadcaster, SubscriberId, Subscription};
