//! Linear dimensionality reduction: PCA by power iteration with deflation.
//!
//! Deterministic for a fixed input: the start vector is fixed and each
//! component's sign is chosen so its largest-magnitude entry is positive.

use ndarray::{Array1, Array2, Axis};
use topiary_core::constants::{PCA_MAX_ITERATIONS, PCA_TOLERANCE};
use topiary_core::errors::{ClusteringError, TopiaryResult};
use tracing::debug;

use crate::algorithms::similarity;

/// Project rows onto their top `n_components` principal components.
pub fn pca_project(embeddings: &[Vec<f32>], n_components: usize) -> TopiaryResult<Vec<Vec<f32>>> {
    let dim = similarity::validate_matrix(embeddings)?;
    if n_components == 0 {
        return Err(ClusteringError::ProjectionFailed {
            reason: "n_components must be at least 1".to_string(),
        }
        .into());
    }
    if n_components >= dim || embeddings.is_empty() {
        return Ok(embeddings.to_vec());
    }

    let n = embeddings.len();
    let flat: Vec<f64> = embeddings
        .iter()
        .flat_map(|row| row.iter().map(|v| *v as f64))
        .collect();
    let mut x = Array2::from_shape_vec((n, dim), flat).map_err(|e| {
        ClusteringError::ProjectionFailed {
            reason: e.to_string(),
        }
    })?;
    if let Some(mean) = x.mean_axis(Axis(0)) {
        x -= &mean;
    }

    let denom = (n.saturating_sub(1)).max(1) as f64;
    let mut cov = x.t().dot(&x) / denom;
    let components = principal_components(&mut cov, n_components);
    debug!(
        from = dim,
        to = n_components,
        found = components.len(),
        "pca components extracted"
    );

    let mut basis = Array2::<f64>::zeros((dim, n_components));
    for (k, comp) in components.iter().enumerate() {
        basis.column_mut(k).assign(comp);
    }
    let projected = x.dot(&basis);
    Ok(projected
        .outer_iter()
        .map(|row| row.iter().map(|v| *v as f32).collect())
        .collect())
}

/// Leading eigenvectors of a symmetric matrix. Deflates `cov` in place.
/// Stops early once the remaining variance is numerically zero.
fn principal_components(cov: &mut Array2<f64>, k: usize) -> Vec<Array1<f64>> {
    let dim = cov.nrows();
    let mut out = Vec::with_capacity(k);
    for _ in 0..k {
        let mut v = Array1::from_iter((0..dim).map(|j| 1.0 + j as f64 / dim as f64));
        let start_norm = v.dot(&v).sqrt();
        v /= start_norm;
        let mut lambda = 0.0;
        for _ in 0..PCA_MAX_ITERATIONS {
            let w = cov.dot(&v);
            let norm = w.dot(&w).sqrt();
            if norm < PCA_TOLERANCE {
                lambda = 0.0;
                break;
            }
            let next = w / norm;
            let delta = (&next - &v).mapv(f64::abs).sum();
            v = next;
            lambda = norm;
            if delta < PCA_TOLERANCE {
                break;
            }
        }
        if lambda < PCA_TOLERANCE {
            break;
        }
        let pivot = v
            .iter()
            .copied()
            .fold(0.0f64, |acc, x| if x.abs() > acc.abs() { x } else { acc });
        if pivot < 0.0 {
            v.mapv_inplace(|x| -x);
        }
        let col = v.view().insert_axis(Axis(1));
        let outer = col.dot(&col.t());
        cov.scaled_add(-lambda, &outer);
        out.push(v);
    }
    out
}
