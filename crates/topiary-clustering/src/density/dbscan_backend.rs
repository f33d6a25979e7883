//! Fixed-radius DBSCAN via `linfa-clustering`.
//!
//! linfa measures Euclidean distance. Cosine distance `1 - cos` between
//! unit rows equals `d² / 2`, so the cosine radius `eps` becomes the
//! Euclidean tolerance `sqrt(2 * eps)` over L2-normalised rows.

use linfa::traits::Transformer;
use linfa::{DatasetBase, ParamGuard};
use linfa_clustering::Dbscan;
use ndarray::Array2;
use topiary_core::config::DistanceMetric;
use topiary_core::errors::ClusteringError;
use topiary_core::{ClusterLabel, NOISE};

use crate::algorithms::similarity;

/// Label every row. A point is core when its `eps`-neighbourhood, itself
/// included, holds at least `min_samples` points. Cluster ids follow
/// discovery order in input order.
pub fn cluster(
    points: &[Vec<f32>],
    eps: f64,
    min_samples: usize,
    metric: DistanceMetric,
) -> Result<Vec<ClusterLabel>, ClusteringError> {
    let (data, tolerance) = match metric {
        DistanceMetric::Cosine => (to_array(points, true)?, (2.0 * eps).sqrt()),
        DistanceMetric::Euclidean => (to_array(points, false)?, eps),
    };

    let params = Dbscan::params(min_samples)
        .tolerance(tolerance)
        .check()
        .map_err(|e| ClusteringError::BackendFailed {
            reason: format!("dbscan: {e}"),
        })?;
    let clustered = params.transform(DatasetBase::from(data));

    Ok(clustered
        .targets
        .iter()
        .map(|label| match label {
            Some(id) => *id as ClusterLabel,
            None => NOISE,
        })
        .collect())
}

fn to_array(points: &[Vec<f32>], normalize: bool) -> Result<Array2<f64>, ClusteringError> {
    let dim = points.first().map_or(0, Vec::len);
    let flat: Vec<f64> = points
        .iter()
        .flat_map(|row| {
            let row = if normalize {
                similarity::l2_normalize(row)
            } else {
                row.clone()
            };
            row.into_iter().map(f64::from)
        })
        .collect();
    Array2::from_shape_vec((points.len(), dim), flat).map_err(|e| ClusteringError::BackendFailed {
        reason: format!("dbscan input: {e}"),
    })
}
