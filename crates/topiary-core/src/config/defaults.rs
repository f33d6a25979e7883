// Single source of truth for all default values.

// --- Store ---
pub const DEFAULT_PROJECTION_COMPONENTS: Option<usize> = None;

// --- Density ---
pub const DEFAULT_EPS: f64 = 0.3;
pub const DEFAULT_MIN_SAMPLES: usize = 5;
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 5;

// --- Keywords ---
pub const DEFAULT_TOP_N_KEYWORDS: usize = 10;
pub const DEFAULT_MIN_TOKEN_LEN: usize = 3;

// --- Merge ---
pub const DEFAULT_TARGET_CLUSTERS: usize = 20;
pub const DEFAULT_ALPHA: f64 = 0.6;
pub const DEFAULT_BETA: f64 = 0.3;
pub const DEFAULT_GAMMA: f64 = 0.1;
pub const DEFAULT_MIN_SCORE: f64 = 0.5;

// --- Hierarchy ---
pub const DEFAULT_HIERARCHY_LEVELS: usize = 5;

// --- Evaluation ---
pub const DEFAULT_WEIGHT_COHESION: f64 = 0.4;
pub const DEFAULT_WEIGHT_DISPERSION: f64 = 0.3;
pub const DEFAULT_WEIGHT_CLUSTER_COUNT: f64 = 0.1;
pub const DEFAULT_WEIGHT_OUTLIERS: f64 = 0.2;

// --- Calibration ---
pub const DEFAULT_GRID_ALPHA: [f64; 3] = [0.4, 0.6, 0.8];
pub const DEFAULT_GRID_BETA: [f64; 3] = [0.1, 0.3, 0.5];
pub const DEFAULT_GRID_GAMMA: [f64; 2] = [0.0, 0.2];
pub const DEFAULT_GRID_MIN_SCORE: [f64; 3] = [0.4, 0.5, 0.6];
pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_PARALLEL_TRIALS: bool = true;

// --- Summarizer ---
pub const DEFAULT_SUMMARIZER_ENABLED: bool = true;
pub const DEFAULT_MAX_SAMPLES_PER_TOPIC: usize = 8;
pub const DEFAULT_SUMMARIZER_MAX_RETRIES: usize = 2;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
