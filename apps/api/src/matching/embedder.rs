//! Embedder — turns text into a fixed-dimension [`Embedding`].
//!
//! Default: `DigestEmbedder` (SHA-256 derived, deterministic across restarts).
//! The trait is the seam for a learned model; `AppState` carries an `Arc<dyn Embedder>`
//! so the ranker and the handlers never see which backend produced a vector.

use sha2::{Digest, Sha256};

use crate::matching::vector::{normalize_in_place, Embedding};

pub const DEFAULT_DIM: usize = 128;

pub trait Embedder: Send + Sync {
    /// Must return the same vector for the same `(text, dim)` on every call.
    fn embed(&self, text: &str, dim: usize) -> Embedding;

    /// Backend label, surfaced in health output.
    fn name(&self) -> &'static str;
}

/// Content-hash fingerprint. Identical text maps to identical vectors, but
/// similar wording does not map to nearby vectors.
///
/// Algorithm:
/// 1. digest = SHA-256(text)
/// 2. component[i] = digest[i mod 32] / 255 * 2 - 1
/// 3. divide by the Euclidean norm (or by 1 when the norm is zero)
#[derive(Debug, Default, Clone, Copy)]
pub struct DigestEmbedder;

impl Embedder for DigestEmbedder {
    fn embed(&self, text: &str, dim: usize) -> Embedding {
        let digest = Sha256::digest(text.as_bytes());

        let mut components: Vec<f64> = digest
            .iter()
            .cycle()
            .take(dim)
            .map(|&byte| byte_to_unit_range(byte))
            .collect();
        normalize_in_place(&mut components);

        Embedding::from_components(components)
    }

    fn name(&self) -> &'static str {
        "sha256-digest"
    }
}

fn byte_to_unit_range(byte: u8) -> f64 {
    (f64::from(byte) / 255.0) * 2.0 - 1.0
}
