//! Distance functions for the reference store
//!
//! Distances are "lower = more similar", matching what the store's query
//! results report in `_distance`. Functions are single-threaded so results
//! are reproducible.

use vdbbench_core::MetricType;

/// Distance between two vectors under `metric`
///
/// - L2: squared Euclidean distance
/// - Cosine: `1 - cos(a, b)`; 1.0 if either vector has zero norm
/// - InnerProduct: `1 - dot(a, b)`
pub fn compute_distance(a: &[f32], b: &[f32], metric: MetricType) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Dimension mismatch in distance computation");

    match metric {
        MetricType::L2 => squared_euclidean(a, b),
        MetricType::Cosine => 1.0 - cosine_similarity(a, b),
        MetricType::InnerProduct => 1.0 - dot_product(a, b),
    }
}

/// Cosine similarity: dot(a,b) / (||a|| * ||b||)
///
/// Returns 0.0 if either vector has zero norm (avoids division by zero)
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot = dot_product(a, b);
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Dot product (inner product)
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}
