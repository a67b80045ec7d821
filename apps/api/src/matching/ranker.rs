//! Top-k ranking of stored candidates against a query embedding.

use std::cmp::Ordering;

use rayon::prelude::*;
use serde::Serialize;

use crate::matching::similarity::similarity;
use crate::matching::vector::Embedding;

/// A stored item eligible for ranking.
///
/// `vector` is `None` when the stored encoding could not be decoded; such
/// candidates still take part and score 0.
#[derive(Debug, Clone)]
pub struct Candidate<D> {
    pub id: i64,
    pub vector: Option<Vec<f64>>,
    pub display: D,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResult<D> {
    pub id: i64,
    pub score: f64,
    #[serde(flatten)]
    pub display: D,
}

#[derive(Debug, Clone, Copy)]
pub struct RankOptions {
    /// Score in parallel once the candidate count reaches this many.
    pub parallel_threshold: usize,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            parallel_threshold: 512,
        }
    }
}

/// Scores every candidate, sorts by descending score (stable, so ties keep
/// insertion order) and keeps the first `k`.
pub fn rank<D: Send>(
    query: &Embedding,
    candidates: Vec<Candidate<D>>,
    k: usize,
    opts: RankOptions,
) -> Vec<ScoredResult<D>> {
    if k == 0 || candidates.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<ScoredResult<D>> = if candidates.len() >= opts.parallel_threshold {
        candidates
            .into_par_iter()
            .map(|c| score_candidate(query, c))
            .collect()
    } else {
        candidates
            .into_iter()
            .map(|c| score_candidate(query, c))
            .collect()
    };

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(k);
    scored
}

fn score_candidate<D>(query: &Embedding, candidate: Candidate<D>) -> ScoredResult<D> {
    let score = candidate
        .vector
        .as_deref()
        .map(|v| similarity(query.as_slice(), v))
        .unwrap_or(0.0);

    ScoredResult {
        id: candidate.id,
        score,
        display: candidate.display,
    }
}
