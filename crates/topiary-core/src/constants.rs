/// Topiary version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Id prefix for leaf topics (terminal merged clusters).
pub const LEAF_ID_PREFIX: &str = "topic";

/// Id prefix for interior topic groups.
pub const GROUP_ID_PREFIX: &str = "group";

/// Id of the synthetic root node.
pub const ROOT_ID: &str = "root";

/// Keywords joined into a fallback summary.
pub const FALLBACK_SUMMARY_KEYWORDS: usize = 5;

/// Separator used when a keyword list stands in for a summary.
pub const KEYWORD_SUMMARY_SEPARATOR: &str = ", ";

/// Iteration cap for power-iteration PCA.
pub const PCA_MAX_ITERATIONS: usize = 200;

/// Convergence tolerance for power-iteration PCA.
pub const PCA_TOLERANCE: f64 = 1e-9;
