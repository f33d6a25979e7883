//! Internal cluster validity indices over non-noise points.
//!
//! Each function takes the already-filtered member lists per cluster
//! (`groups`) and expects at least two of them.

use rayon::prelude::*;
use topiary_clustering::algorithms::similarity;
use topiary_core::config::DistanceMetric;

/// Mean silhouette coefficient. Members of singleton clusters score 0.
/// Per-point values are summed in input order.
pub fn silhouette(points: &[Vec<f32>], groups: &[Vec<usize>], metric: DistanceMetric) -> f64 {
    let assignments: Vec<(usize, usize)> = groups
        .iter()
        .enumerate()
        .flat_map(|(g, members)| members.iter().map(move |&i| (g, i)))
        .collect();
    if assignments.is_empty() {
        return 0.0;
    }

    let per_point: Vec<f64> = assignments
        .par_iter()
        .map(|&(own, i)| {
            if groups[own].len() < 2 {
                return 0.0;
            }
            let mean_to = |members: &[usize]| {
                let sum: f64 = members
                    .iter()
                    .filter(|&&j| j != i)
                    .map(|&j| similarity::distance(metric, &points[i], &points[j]))
                    .sum();
                let count = members.iter().filter(|&&j| j != i).count();
                sum / count.max(1) as f64
            };
            let a = mean_to(&groups[own]);
            let b = groups
                .iter()
                .enumerate()
                .filter(|(g, _)| *g != own)
                .map(|(_, members)| mean_to(members))
                .fold(f64::INFINITY, f64::min);
            let denom = a.max(b);
            if denom > 0.0 && denom.is_finite() {
                (b - a) / denom
            } else {
                0.0
            }
        })
        .collect();
    per_point.iter().sum::<f64>() / assignments.len() as f64
}

/// Calinski-Harabasz variance ratio. A zero within-cluster spread
/// scores 1.0.
pub fn calinski_harabasz(points: &[Vec<f32>], groups: &[Vec<usize>]) -> f64 {
    let all: Vec<usize> = groups.iter().flatten().copied().collect();
    let n = all.len();
    let k = groups.len();
    if k < 2 || n <= k {
        return 1.0;
    }
    let overall = similarity::centroid(points, &all);

    let mut between = 0.0;
    let mut within = 0.0;
    for members in groups {
        let c = similarity::centroid(points, members);
        between += members.len() as f64 * similarity::squared_euclidean(&c, &overall);
        within += members
            .iter()
            .map(|&i| similarity::squared_euclidean(&points[i], &c))
            .sum::<f64>();
    }
    if within <= 0.0 {
        return 1.0;
    }
    (between / (k - 1) as f64) / (within / (n - k) as f64)
}

/// Davies-Bouldin index. Coincident centroids contribute 0.
pub fn davies_bouldin(points: &[Vec<f32>], groups: &[Vec<usize>]) -> f64 {
    let k = groups.len();
    if k < 2 {
        return 0.0;
    }
    let centroids: Vec<Vec<f32>> = groups
        .iter()
        .map(|members| similarity::centroid(points, members))
        .collect();
    let scatter: Vec<f64> = groups
        .iter()
        .zip(&centroids)
        .map(|(members, c)| {
            members
                .iter()
                .map(|&i| similarity::euclidean_distance(&points[i], c))
                .sum::<f64>()
                / members.len().max(1) as f64
        })
        .collect();

    let worst: f64 = (0..k)
        .map(|i| {
            (0..k)
                .filter(|&j| j != i)
                .map(|j| {
                    let separation = similarity::euclidean_distance(&centroids[i], &centroids[j]);
                    if separation > 0.0 {
                        (scatter[i] + scatter[j]) / separation
                    } else {
                        0.0
                    }
                })
                .fold(0.0, f64::max)
        })
        .sum();
    worst / k as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tight_pairs() -> (Vec<Vec<f32>>, Vec<Vec<usize>>) {
        let points = vec![
            vec![0.0, 0.0],
            vec![0.0, 0.2],
            vec![10.0, 0.0],
            vec![10.0, 0.2],
        ];
        (points, vec![vec![0, 1], vec![2, 3]])
    }

    #[test]
    fn separated_pairs_score_well_everywhere() {
        let (points, groups) = two_tight_pairs();
        assert!(silhouette(&points, &groups, DistanceMetric::Euclidean) > 0.95);
        assert!(calinski_harabasz(&points, &groups) > 1000.0);
        assert!(davies_bouldin(&points, &groups) < 0.05);
    }

    #[test]
    fn crossed_assignment_scores_badly() {
        let (points, _) = two_tight_pairs();
        let crossed = vec![vec![0, 2], vec![1, 3]];
        assert!(silhouette(&points, &crossed, DistanceMetric::Euclidean) < 0.0);
        assert!(davies_bouldin(&points, &crossed) > 1.0);
    }

    #[test]
    fn singleton_clusters_contribute_zero_silhouette() {
        let points = vec![vec![0.0, 0.0], vec![5.0, 5.0]];
        let groups = vec![vec![0], vec![1]];
        assert_eq!(silhouette(&points, &groups, DistanceMetric::Euclidean), 0.0);
        assert_eq!(calinski_harabasz(&points, &groups), 1.0);
    }
}
