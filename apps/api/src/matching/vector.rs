//! Vector helpers shared by the embedder, the scorer and the persistence boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A fixed-length fingerprint of a piece of text.
///
/// Produced only by an [`Embedder`](crate::matching::embedder::Embedder) and never
/// mutated afterwards; callers get read-only access to the components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding(Vec<f64>);

impl Embedding {
    pub(crate) fn from_components(components: Vec<f64>) -> Self {
        Self(components)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn dim(&self) -> usize {
        self.0.len()
    }

    pub fn norm(&self) -> f64 {
        l2_norm(&self.0)
    }
}

impl AsRef<[f64]> for Embedding {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

#[derive(Debug, Error)]
pub enum VectorDecodeError {
    #[error("embedding is not a JSON array of numbers: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("embedding contains a non-finite component at index {0}")]
    NonFinite(usize),
}

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub fn l2_norm(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}

/// Scales `v` to unit length. A zero norm uses a divisor of 1, leaving `v` untouched.
pub fn normalize_in_place(v: &mut [f64]) {
    let norm = l2_norm(v);
    let divisor = if norm == 0.0 { 1.0 } else { norm };
    for x in v.iter_mut() {
        *x /= divisor;
    }
}

/// Textual encoding written to the store alongside each resume.
pub fn encode_embedding(embedding: &Embedding) -> String {
    // Serializing a Vec<f64> of finite values cannot fail.
    serde_json::to_string(embedding.as_slice()).unwrap_or_else(|_| "[]".to_string())
}

/// Reverses [`encode_embedding`]. Any other shape of input is an error the caller
/// is expected to degrade on.
pub fn decode_embedding(raw: &str) -> Result<Vec<f64>, VectorDecodeError> {
    let components: Vec<f64> = serde_json::from_str(raw)?;
    if let Some(idx) = components.iter().position(|x| !x.is_finite()) {
        return Err(VectorDecodeError::NonFinite(idx));
    }
    Ok(components)
}
