//! Cosine / Euclidean helpers, centroids, and matrix shape checks.

use topiary_core::config::DistanceMetric;
use topiary_core::errors::InputShapeError;

/// Cosine similarity, accumulated in f64 and clamped to [-1, 1].
/// Zero when either side is empty, zero-magnitude, or the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    let (dot, norm_a, norm_b) = a.iter().zip(b).fold((0.0f64, 0.0f64, 0.0f64), |acc, (&x, &y)| {
        let (x, y) = (f64::from(x), f64::from(y));
        (acc.0 + x * y, acc.1 + x * x, acc.2 + y * y)
    });
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Euclidean distance. Mismatched lengths compare the common prefix.
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f64 {
    squared_euclidean(a, b).sqrt()
}

pub fn squared_euclidean(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = *x as f64 - *y as f64;
            d * d
        })
        .sum()
}

/// Distance under `metric`. Cosine distance is `1 - similarity`, in [0, 2].
pub fn distance(metric: DistanceMetric, a: &[f32], b: &[f32]) -> f64 {
    match metric {
        DistanceMetric::Cosine => 1.0 - cosine_similarity(a, b),
        DistanceMetric::Euclidean => euclidean_distance(a, b),
    }
}

/// Unit-length copy. Zero vectors stay zero.
pub fn l2_normalize(v: &[f32]) -> Vec<f32> {
    let norm = v.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    if norm == 0.0 {
        v.to_vec()
    } else {
        v.iter().map(|x| (*x as f64 / norm) as f32).collect()
    }
}

/// Mean of the rows selected by `indices`.
pub fn centroid(embeddings: &[Vec<f32>], indices: &[usize]) -> Vec<f32> {
    let dim = indices
        .first()
        .and_then(|&i| embeddings.get(i))
        .map_or(0, |e| e.len());
    let mut sum = vec![0.0f64; dim];
    let mut count = 0usize;
    for &i in indices {
        if let Some(row) = embeddings.get(i) {
            for (s, v) in sum.iter_mut().zip(row.iter()) {
                *s += *v as f64;
            }
            count += 1;
        }
    }
    if count == 0 {
        return vec![0.0; dim];
    }
    sum.into_iter().map(|s| (s / count as f64) as f32).collect()
}

/// Mean cosine similarity of the selected rows to their centroid.
/// 1.0 for singletons, 0.0 for empty selections.
pub fn internal_cohesion(embeddings: &[Vec<f32>], indices: &[usize]) -> f64 {
    match indices.len() {
        0 => 0.0,
        1 => 1.0,
        n => {
            let c = centroid(embeddings, indices);
            indices
                .iter()
                .map(|&i| cosine_similarity(&embeddings[i], &c))
                .sum::<f64>()
                / n as f64
        }
    }
}

/// Check every row shares one non-zero dimension of finite values.
/// Returns that dimension (0 for an empty matrix).
pub fn validate_matrix(embeddings: &[Vec<f32>]) -> Result<usize, InputShapeError> {
    let Some(first) = embeddings.first() else {
        return Ok(0);
    };
    let dim = first.len();
    if dim == 0 {
        return Err(InputShapeError::ZeroDimension);
    }
    for (row, e) in embeddings.iter().enumerate() {
        if e.len() != dim {
            return Err(InputShapeError::DimensionMismatch {
                row,
                expected: dim,
                actual: e.len(),
            });
        }
        if let Some(column) = e.iter().position(|v| !v.is_finite()) {
            return Err(InputShapeError::NonFinite { row, column });
        }
    }
    Ok(dim)
}
