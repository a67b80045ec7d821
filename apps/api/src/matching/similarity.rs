use crate::matching::vector::{dot, l2_norm};

/// Cosine similarity between two vectors.
///
/// Returns 0.0 instead of failing when the inputs cannot be compared: either side
/// empty, lengths differ, a zero norm, or a non-finite result. Rounding can push
/// the quotient a few ulps past ±1, so the result is clamped to [-1, 1].
pub fn similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let score = dot(a, b) / (norm_a * norm_b);
    if score.is_finite() {
        score.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
