//! Agglomerative clustering with Lance-Williams distance updates.
//!
//! Inputs are groups of point indices. Singleton groups start at plain
//! Euclidean distance; larger groups start at the linkage's own group
//! distance, so replaying from a partial forest matches clustering from
//! scratch. Ward works on squared distances internally and reports the
//! square root.

use topiary_core::config::Linkage;

use topiary_clustering::algorithms::similarity;

/// One agglomeration step. Indices below the group count refer to input
/// groups; `groups.len() + s` is the cluster formed at step `s`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkageStep {
    pub left: usize,
    pub right: usize,
    pub distance: f64,
}

/// Merge every group into one. Ties go to the lowest `(left, right)` pair.
pub fn agglomerate(points: &[Vec<f32>], groups: &[Vec<usize>], linkage: Linkage) -> Vec<LinkageStep> {
    let g = groups.len();
    if g < 2 {
        return Vec::new();
    }
    let total = 2 * g - 1;
    let mut dist = vec![vec![f64::INFINITY; total]; total];
    for i in 0..g {
        for j in (i + 1)..g {
            let d = group_distance(points, &groups[i], &groups[j], linkage);
            let stored = if linkage == Linkage::Ward { d * d } else { d };
            dist[i][j] = stored;
            dist[j][i] = stored;
        }
    }

    let mut sizes: Vec<usize> = groups.iter().map(Vec::len).collect();
    sizes.resize(total, 0);
    let mut active: Vec<bool> = vec![true; g];
    active.resize(total, false);
    let mut steps = Vec::with_capacity(g - 1);

    for next in g..total {
        let mut best: Option<(usize, usize, f64)> = None;
        for i in 0..next {
            if !active[i] {
                continue;
            }
            for j in (i + 1)..next {
                if !active[j] {
                    continue;
                }
                let d = dist[i][j];
                if best.map_or(true, |(_, _, b)| d < b) {
                    best = Some((i, j, d));
                }
            }
        }
        let Some((a, b, d)) = best else {
            break;
        };

        active[a] = false;
        active[b] = false;
        let (na, nb) = (sizes[a] as f64, sizes[b] as f64);
        for k in 0..next {
            if !active[k] {
                continue;
            }
            let nk = sizes[k] as f64;
            let (dak, dbk) = (dist[a][k], dist[b][k]);
            let updated = match linkage {
                Linkage::Single => dak.min(dbk),
                Linkage::Complete => dak.max(dbk),
                Linkage::Average => (na * dak + nb * dbk) / (na + nb),
                Linkage::Ward => ((na + nk) * dak + (nb + nk) * dbk - nk * d) / (na + nb + nk),
            };
            dist[next][k] = updated;
            dist[k][next] = updated;
        }
        sizes[next] = sizes[a] + sizes[b];
        active[next] = true;

        let distance = if linkage == Linkage::Ward { d.max(0.0).sqrt() } else { d };
        steps.push(LinkageStep {
            left: a,
            right: b,
            distance,
        });
    }
    steps
}

/// Distance between two groups of points under `linkage`.
pub fn group_distance(points: &[Vec<f32>], a: &[usize], b: &[usize], linkage: Linkage) -> f64 {
    if a.is_empty() || b.is_empty() {
        return f64::INFINITY;
    }
    match linkage {
        Linkage::Ward => {
            let (na, nb) = (a.len() as f64, b.len() as f64);
            let ca = similarity::centroid(points, a);
            let cb = similarity::centroid(points, b);
            (2.0 * na * nb / (na + nb)).sqrt() * similarity::euclidean_distance(&ca, &cb)
        }
        _ => {
            let pairwise = a.iter().flat_map(|&i| {
                b.iter()
                    .map(move |&j| similarity::euclidean_distance(&points[i], &points[j]))
            });
            match linkage {
                Linkage::Single => pairwise.fold(f64::INFINITY, f64::min),
                Linkage::Complete => pairwise.fold(0.0, f64::max),
                _ => pairwise.sum::<f64>() / (a.len() * b.len()) as f64,
            }
        }
    }
}
