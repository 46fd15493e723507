//! Status checker
//!
//! Probes a fixed list of HTTP endpoints on an interval and serves a live
//! dashboard of their health.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────────────────── STATUS CHECKER ───────────────────────────┐
//!   │                                                                       │
//!   │  ┌────────────────┐  fan-out   ┌─────────┐   GET    ┌──────────────┐   │
//!   │  │ RoundScheduler │──────────▶ │ Prober  │────────▶ │  endpoints   │   │
//!   │  │  (interval)    │ ◀──────────│  (×N)   │◀──────── │              │   │
//!   │  └───────┬────────┘  fan-in    └─────────┘          └──────────────┘   │
//!   │          │ whole round                                                │
//!   │          ▼                                                            │
//!   │  ┌────────────────┐  snapshot  ┌─────────────┐  /ws   ┌───────────┐   │
//!   │  │   StateStore   │──────────▶ │ Broadcaster │──────▶ │  browsers │   │
//!   │  └───┬────────┬───┘            └─────────────┘        └───────────┘   │
//!   │      │        │ /status-json                                          │
//!   │      ▼        └─────────────────────────────────────▶ clients         │
//!   │  status_state.json (best effort)                                      │
//!   └───────────────────────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use tokio::net::TcpListener;

use status_checker::config::cli::Cli;
use status_checker::lifecycle::{signals, Services, Shutdown};
use status_checker::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().resolve()?;

    logging::init_logging(&config.observability);

    tracing::info!("status-checker v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        endpoints_path = %config.dashboard.endpoints_path.display(),
        data_dir = %config.storage.data_dir.display(),
        interval_secs = config.probe.interval_secs,
        timeout_secs = config.probe.timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let services = Services::prepare(config);

    // Bind before the first round so a taken port fails fast.
    let listener = TcpListener::bind(services.config.listener.bind_target()).await?;

    let shutdown = Shutdown::new();
    let scheduler = services.scheduler()?;
    let scheduler_task = tokio::spawn(scheduler.run(shutdown.subscribe()));

    let server = services.http_server();
    let server_shutdown = shutdown.subscribe();

    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        trigger.trigger();
    });

    server.run(listener, server_shutdown).await?;
    let _ = scheduler_task.await;

    tracing::info!("Shutdown complete");
    Ok(())
}
