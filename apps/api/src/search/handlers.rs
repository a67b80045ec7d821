//! Axum route handlers for the Search API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::errors::AppError;
use crate::matching::ranker::RankOptions;
use crate::search::service::{search_resumes, ResumeQuery, SearchHit, SearchRequest, SearchSettings};
use crate::state::AppState;

/// POST /api/search
///
/// Body: `{ "query": "...", "top_k": 5 }`. Returns hits ordered by descending score.
/// Malformed bodies are reported through the usual error envelope.
pub async fn handle_search(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<Vec<SearchHit>>, AppError> {
    let Json(request) = payload?;
    let settings = SearchSettings {
        embedding_dim: state.config.embedding_dim,
        default_top_k: state.config.default_top_k,
        rank: RankOptions {
            parallel_threshold: state.config.parallel_rank_threshold,
        },
    };

    let query = ResumeQuery::from_request(request, settings.default_top_k)?;
    let hits = search_resumes(
        state.store.as_ref(),
        state.embedder.as_ref(),
        settings,
        &query,
    )
    .await?;

    Ok(Json(hits))
}
