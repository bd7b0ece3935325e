//! Dead-letter inspection and manual redelivery.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use projections::{DeadLetter, RedeliveryReport};
use serde_json::{Value, json};

use super::AppState;

/// GET /admin/dead-letters
pub async fn dead_letters(State(state): State<Arc<AppState>>) -> Json<Vec<DeadLetter>> {
    Json(state.dispatcher.dead_letters().list().await)
}

/// POST /admin/dead-letters/redeliver
#[tracing::instrument(skip(state))]
pub async fn redeliver(State(state): State<Arc<AppState>>) -> Json<RedeliveryReport> {
    Json(state.dispatcher.redeliver_dead_letters().await)
}

/// DELETE /admin/dead-letters
#[tracing::instrument(skip(state))]
pub async fn purge(State(state): State<Arc<AppState>>) -> Json<Value> {
    let purged = state.dispatcher.dead_letters().purge().await;
    Json(json!({ "purged": purged }))
}
