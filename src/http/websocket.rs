//! WebSocket live updates.
//!
//! # Responsibilities
//! - Upgrade `/ws` requests
//! - Send the current snapshot before reading anything from the client
//! - Forward every published snapshot until the client goes away
//!
//! # Data Flow
//! ```text
//! Broadcaster ──→ Subscription queue ──→ this task ──→ WebSocket ──→ Browser
//! ```
//!
//! # Design Decisions
//! - Inbound frames carry no meaning; only Close and errors matter
//! - Ping/pong is answered by the websocket layer
//! - Every write is bounded by the subscriber write timeout

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use std::time::Duration;
use tokio::time;

use crate::health::StatusSnapshot;
use crate::http::server::AppState;

/// Why a write to a subscriber failed.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("socket write failed: {0}")]
    Socket(#[from] axum::Error),
    #[error("socket write timed out after {0:?}")]
    TimedOut(Duration),
}

/// `GET /ws`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| serve_subscriber(socket, state))
}

async fn serve_subscriber(socket: WebSocket, state: AppState) {
    let (sender, receiver) = socket.split();
    pump(sender, receiver, state).await;
}

/// Forward snapshots to one client until it leaves or a write fails.
async fn pump<Tx, Rx>(mut sender: Tx, mut receiver: Rx, state: AppState)
where
    Tx: Sink<Message, Error = axum::Error> + Unpin,
    Rx: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    let mut subscription = state.broadcaster.subscribe();
    let id = subscription.id();
    tracing::debug!(subscriber = id, "WebSocket subscriber connected");

    let initial = state.store.snapshot();
    if let Err(e) = send_snapshot(&mut sender, &initial, state.write_timeout).await {
        tracing::warn!(subscriber = id, error = %e, "Failed to send initial snapshot");
        return;
    }

    loop {
        tokio::select! {
            inbound = receiver.next() => match inbound {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(subscriber = id, error = %e, "WebSocket receive error");
                    break;
                }
            },
            update = subscription.recv() => match update {
                Some(snapshot) => {
                    if let Err(e) = send_snapshot(&mut sender, &snapshot, state.write_timeout).await {
                        tracing::warn!(subscriber = id, error = %e, "Dropping subscriber");
                        break;
                    }
                }
                None => break,
            },
        }
    }

    tracing::debug!(subscriber = id, "WebSocket subscriber disconnected");
}

async fn send_snapshot<Tx>(
    sender: &mut Tx,
    snapshot: &StatusSnapshot,
    timeout: Duration,
) -> Result<(), SendError>
where
    Tx: Sink<Message, Error = axum::Error> + Unpin,
{
    let json = serde_json::to_string(snapshot)?;
    match time::timeout(timeout, sender.send(Message::Text(json.into()))).await {
        Ok(result) => result.map_err(SendError::from),
        Err(_) => Err(SendError::TimedOut(timeout)),
    }
}
