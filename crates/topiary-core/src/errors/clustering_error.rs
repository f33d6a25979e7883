/// Clustering subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum ClusteringError {
    /// Recoverable: too few clusters survived for the requested operation.
    #[error("degenerate clustering in {stage}: {clusters} cluster(s) survived")]
    Degenerate { stage: String, clusters: usize },

    #[error("density backend failed: {reason}")]
    BackendFailed { reason: String },

    #[error("projection failed: {reason}")]
    ProjectionFailed { reason: String },
}
