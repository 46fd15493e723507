//! On-demand snapshot endpoint.

use axum::{extract::State, Json};

use crate::health::StatusSnapshot;
use crate::http::server::AppState;

/// `GET /status-json`: the current snapshot, at most one round old.
pub async fn status_json(State(state): State<AppState>) -> Json<StatusSnapshot> {
    Json(state.store.snapshot())
}
