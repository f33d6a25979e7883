//! MergeScore: `alpha * cohesion + beta * keyword_overlap - gamma * size_imbalance`.
//!
//! Raw components each lie in [0, 1]. `MinMax` and `ZScore` rescale them
//! with statistics taken once over the initial pair set and then frozen,
//! so scores computed after a merge stay comparable with the originals.

use std::collections::HashSet;

use topiary_core::config::ScoreNormalization;
use topiary_core::models::MergeParams;

use crate::algorithms::similarity;

/// Below this spread a component is treated as constant.
const MIN_SPREAD: f64 = 1e-12;

/// Raw, un-weighted inputs to a pair's score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairComponents {
    /// Centroid cosine similarity mapped from [-1, 1] to [0, 1].
    pub cohesion: f64,
    /// Jaccard overlap of the two top-N keyword sets.
    pub keyword_overlap: f64,
    /// `|na - nb| / (na + nb)`.
    pub size_imbalance: f64,
}

impl PairComponents {
    pub fn compute(
        centroid_a: &[f32],
        centroid_b: &[f32],
        keywords_a: &[String],
        keywords_b: &[String],
        size_a: usize,
        size_b: usize,
    ) -> Self {
        let cohesion = (similarity::cosine_similarity(centroid_a, centroid_b) + 1.0) / 2.0;
        let total = size_a + size_b;
        let size_imbalance = if total == 0 {
            0.0
        } else {
            size_a.abs_diff(size_b) as f64 / total as f64
        };
        Self {
            cohesion,
            keyword_overlap: jaccard(keywords_a, keywords_b),
            size_imbalance,
        }
    }

    fn as_array(&self) -> [f64; 3] {
        [self.cohesion, self.keyword_overlap, self.size_imbalance]
    }

    fn from_array(v: [f64; 3]) -> Self {
        Self {
            cohesion: v[0],
            keyword_overlap: v[1],
            size_imbalance: v[2],
        }
    }
}

/// Jaccard similarity of two term lists. Two empty lists overlap 0.
pub fn jaccard(a: &[String], b: &[String]) -> f64 {
    let set_a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = b.iter().map(String::as_str).collect();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    set_a.intersection(&set_b).count() as f64 / union as f64
}

#[derive(Debug, Clone, Copy)]
enum Fitted {
    Bounded,
    MinMax { min: [f64; 3], max: [f64; 3] },
    ZScore { mean: [f64; 3], std: [f64; 3] },
}

/// Frozen per-component rescaling.
#[derive(Debug, Clone, Copy)]
pub struct ScoreNormalizer {
    fitted: Fitted,
}

impl ScoreNormalizer {
    /// Fit to the initial pair set. Empty input behaves like `Bounded`.
    pub fn fit(mode: ScoreNormalization, initial: &[PairComponents]) -> Self {
        let fitted = match mode {
            _ if initial.is_empty() => Fitted::Bounded,
            ScoreNormalization::Bounded => Fitted::Bounded,
            ScoreNormalization::MinMax => {
                let mut min = [f64::INFINITY; 3];
                let mut max = [f64::NEG_INFINITY; 3];
                for c in initial {
                    for (k, v) in c.as_array().into_iter().enumerate() {
                        min[k] = min[k].min(v);
                        max[k] = max[k].max(v);
                    }
                }
                Fitted::MinMax { min, max }
            }
            ScoreNormalization::ZScore => {
                let n = initial.len() as f64;
                let mut mean = [0.0; 3];
                for c in initial {
                    for (k, v) in c.as_array().into_iter().enumerate() {
                        mean[k] += v / n;
                    }
                }
                let mut var = [0.0; 3];
                for c in initial {
                    for (k, v) in c.as_array().into_iter().enumerate() {
                        var[k] += (v - mean[k]).powi(2) / n;
                    }
                }
                Fitted::ZScore {
                    mean,
                    std: var.map(f64::sqrt),
                }
            }
        };
        Self { fitted }
    }

    /// Rescale each component. A constant component passes through raw.
    pub fn normalize(&self, raw: &PairComponents) -> PairComponents {
        let values = raw.as_array();
        let scaled = match self.fitted {
            Fitted::Bounded => values,
            Fitted::MinMax { min, max } => std::array::from_fn(|k| {
                let range = max[k] - min[k];
                if range < MIN_SPREAD {
                    values[k]
                } else {
                    ((values[k] - min[k]) / range).clamp(0.0, 1.0)
                }
            }),
            Fitted::ZScore { mean, std } => std::array::from_fn(|k| {
                if std[k] < MIN_SPREAD {
                    values[k]
                } else {
                    logistic((values[k] - mean[k]) / std[k])
                }
            }),
        };
        PairComponents::from_array(scaled)
    }

    /// Weighted score of raw components.
    pub fn score(&self, params: &MergeParams, raw: &PairComponents) -> f64 {
        let n = self.normalize(raw);
        params.alpha * n.cohesion + params.beta * n.keyword_overlap - params.gamma * n.size_imbalance
    }
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
