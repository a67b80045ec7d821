use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus the active store and embedder backends.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "scout-api",
        "store": state.store.backend(),
        "embedder": state.embedder.name(),
        "embedding_dim": state.config.embedding_dim
    }))
}
