//! Status checker library: endpoint probing, health state and live status push.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod push;
pub mod storage;

pub use config::schema::ServiceConfig;
pub use health::{RoundScheduler, StateStore, StatusSnapshot};
pub use http::HttpServer;
pub use lifecycle::{Services, Shutdown};
pub use push::Broadcaster;
