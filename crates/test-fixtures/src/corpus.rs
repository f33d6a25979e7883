//! Seeded Gaussian blobs with topic-flavoured texts.
//!
//! Blob `k` is centred on axis `k` scaled by `separation`; noise point `j`
//! sits alone on axis `blobs + j`. Every point is therefore well separated
//! under both cosine and Euclidean distance.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use topiary_core::errors::TopiaryResult;
use topiary_core::traits::ICorpusLoader;
use topiary_core::{ClusterLabel, NOISE};

const TOPIC_VOCABULARY: &[&[&str]] = &[
    &["pipeline", "capacity", "tariff", "compressor", "throughput", "interstate", "natural", "gas"],
    &["trading", "desk", "limits", "exposure", "position", "hedge", "forward", "curve"],
    &["holiday", "party", "invitation", "catering", "venue", "rsvp", "celebration", "dinner"],
    &["contract", "counterparty", "amendment", "signature", "legal", "clause", "termination", "review"],
    &["power", "outage", "generator", "turbine", "megawatt", "dispatch", "grid", "plant"],
];

const FILLER: &[&str] = &["update", "today", "team", "question", "status", "week"];

const NOISE_VOCABULARY: &[&str] = &[
    "lunch", "parking", "badge", "printer", "elevator", "coffee", "umbrella", "bicycle",
    "weather", "library", "museum", "garden",
];

/// Shape of a synthetic corpus.
#[derive(Debug, Clone)]
pub struct BlobSpec {
    pub sizes: Vec<usize>,
    pub noise: usize,
    pub dimension: usize,
    /// Per-coordinate standard deviation around each centre.
    pub spread: f32,
    /// Distance of each centre from the origin.
    pub separation: f32,
    pub seed: u64,
}

impl BlobSpec {
    pub fn new(sizes: &[usize], noise: usize) -> Self {
        Self {
            sizes: sizes.to_vec(),
            noise,
            dimension: (sizes.len() + noise).max(8),
            spread: 0.3,
            separation: 10.0,
            seed: 42,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }
}

/// Texts, embeddings and ground-truth labels, co-indexed.
#[derive(Debug, Clone)]
pub struct SyntheticCorpus {
    pub texts: Vec<String>,
    pub embeddings: Vec<Vec<f32>>,
    pub truth: Vec<ClusterLabel>,
}

impl SyntheticCorpus {
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// `(text, embedding)` pairs as a corpus loader yields them.
    pub fn pairs(&self) -> Vec<(String, Vec<f32>)> {
        self.texts
            .iter()
            .cloned()
            .zip(self.embeddings.iter().cloned())
            .collect()
    }
}

/// Generate blobs followed by noise points, in that order.
///
/// # Panics
/// Panics if `dimension` cannot give every blob and noise point its own axis.
pub fn gaussian_blobs(spec: &BlobSpec) -> SyntheticCorpus {
    assert!(
        spec.dimension >= spec.sizes.len() + spec.noise,
        "dimension {} too small for {} blobs + {} noise points",
        spec.dimension,
        spec.sizes.len(),
        spec.noise
    );
    let mut rng = ChaCha8Rng::seed_from_u64(spec.seed);
    let mut corpus = SyntheticCorpus {
        texts: Vec::new(),
        embeddings: Vec::new(),
        truth: Vec::new(),
    };

    for (k, &size) in spec.sizes.iter().enumerate() {
        let vocabulary = TOPIC_VOCABULARY[k % TOPIC_VOCABULARY.len()];
        for _ in 0..size {
            let embedding = (0..spec.dimension)
                .map(|d| {
                    let centre = if d == k { spec.separation } else { 0.0 };
                    centre + spec.spread * standard_normal(&mut rng)
                })
                .collect();
            corpus.embeddings.push(embedding);
            corpus.texts.push(sentence(&mut rng, vocabulary, 6));
            corpus.truth.push(k as ClusterLabel);
        }
    }

    for j in 0..spec.noise {
        let axis = spec.sizes.len() + j;
        let embedding = (0..spec.dimension)
            .map(|d| if d == axis { spec.separation } else { 0.0 })
            .collect();
        corpus.embeddings.push(embedding);
        let word = NOISE_VOCABULARY[j % NOISE_VOCABULARY.len()];
        corpus.texts.push(format!("{word} {}", FILLER[j % FILLER.len()]));
        corpus.truth.push(NOISE);
    }
    corpus
}

/// A permutation of `labels`: same multiset, scrambled assignment.
pub fn shuffled_labels(labels: &[ClusterLabel], seed: u64) -> Vec<ClusterLabel> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut out = labels.to_vec();
    out.shuffle(&mut rng);
    out
}

fn sentence(rng: &mut ChaCha8Rng, vocabulary: &[&str], words: usize) -> String {
    let mut parts: Vec<&str> = (0..words)
        .map(|_| vocabulary[rng.gen_range(0..vocabulary.len())])
        .collect();
    parts.push(FILLER[rng.gen_range(0..FILLER.len())]);
    parts.join(" ")
}

/// Box-Muller transform.
fn standard_normal(rng: &mut ChaCha8Rng) -> f32 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    ((-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()) as f32
}

/// Loader over a fixed set of pairs.
#[derive(Debug, Clone)]
pub struct StaticLoader {
    pairs: Vec<(String, Vec<f32>)>,
}

impl StaticLoader {
    pub fn new(pairs: Vec<(String, Vec<f32>)>) -> Self {
        Self { pairs }
    }
}

impl ICorpusLoader for StaticLoader {
    fn load(&self) -> TopiaryResult<Vec<(String, Vec<f32>)>> {
        Ok(self.pairs.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}
