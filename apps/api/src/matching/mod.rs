// Matching engine: text fingerprinting, cosine scoring and top-k ranking.
// Pure and synchronous; persistence and HTTP live outside this module.

pub mod embedder;
pub mod ranker;
pub mod similarity;
pub mod vector;
