//! Query orchestration: validate, embed the query, snapshot the store, rank.

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::matching::embedder::Embedder;
use crate::matching::ranker::{rank, Candidate, RankOptions, ScoredResult};
use crate::matching::vector::decode_embedding;
use crate::models::resume::{snippet, ResumeRecord, ResumeSummary};
use crate::store::ResumeStore;

const RESULT_SNIPPET_CHARS: usize = 300;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub top_k: Option<i64>,
}

pub type SearchHit = ScoredResult<ResumeSummary>;

#[derive(Debug, Clone, Copy)]
pub struct SearchSettings {
    pub embedding_dim: usize,
    pub default_top_k: usize,
    pub rank: RankOptions,
}

/// Validated query: non-blank text and a non-negative result count.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeQuery {
    pub text: String,
    pub k: usize,
}

impl ResumeQuery {
    /// `top_k` absent falls back to `default_top_k`; zero is allowed and yields no hits.
    pub fn from_request(request: SearchRequest, default_top_k: usize) -> Result<Self, AppError> {
        let text = request
            .query
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Query is required".to_string()))?;

        let k = match request.top_k {
            None => default_top_k,
            Some(k) => usize::try_from(k).map_err(|_| {
                AppError::Validation(format!("top_k must be zero or positive, got {k}"))
            })?,
        };

        Ok(Self { text, k })
    }
}

pub async fn search_resumes(
    store: &dyn ResumeStore,
    embedder: &dyn Embedder,
    settings: SearchSettings,
    query: &ResumeQuery,
) -> Result<Vec<SearchHit>, AppError> {
    let query_vector = embedder.embed(&query.text, settings.embedding_dim);
    let records = store.read_all().await?;
    let total = records.len();

    let candidates: Vec<Candidate<ResumeSummary>> = records
        .into_iter()
        .map(|record| to_candidate(record, settings.embedding_dim))
        .collect();

    let hits = rank(&query_vector, candidates, query.k, settings.rank);

    info!(
        "Search over {total} resumes returned {} hits (k={})",
        hits.len(),
        query.k
    );
    Ok(hits)
}

fn to_candidate(record: ResumeRecord, dim: usize) -> Candidate<ResumeSummary> {
    let vector = match decode_embedding(&record.embedding) {
        Ok(v) => {
            if v.len() != dim {
                debug!(
                    "Resume {} has a {}-dim embedding, queries use {dim}; it will score 0",
                    record.id,
                    v.len()
                );
            }
            Some(v)
        }
        Err(e) => {
            warn!("Resume {} has an unreadable embedding ({e}); scoring it 0", record.id);
            None
        }
    };

    Candidate {
        id: record.id,
        vector,
        display: ResumeSummary {
            snippet: format!("{}...", snippet(&record.text, RESULT_SNIPPET_CHARS)),
            name: record.name,
            email: record.email,
            file_name: record.file_name,
        },
    }
}
