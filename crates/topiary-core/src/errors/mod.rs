//! Error taxonomy. One enum per subsystem, all convertible into
//! [`TopiaryError`].

mod clustering_error;
mod config_error;
mod input_shape_error;
mod summarizer_error;
mod tree_error;

pub use clustering_error::ClusteringError;
pub use config_error::ConfigError;
pub use input_shape_error::InputShapeError;
pub use summarizer_error::SummarizerError;
pub use tree_error::TreeError;

/// Top-level error for every Topiary operation.
#[derive(Debug, thiserror::Error)]
pub enum TopiaryError {
    #[error("input shape error: {0}")]
    InputShape(#[from] InputShapeError),

    #[error("clustering error: {0}")]
    Clustering(#[from] ClusteringError),

    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("summarizer error: {0}")]
    Summarizer(#[from] SummarizerError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("stage {stage} failed: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: Box<TopiaryError>,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("a pipeline run is already in progress")]
    AlreadyRunning,
}

impl TopiaryError {
    /// Tag this error with the pipeline stage it came from.
    /// Already-tagged errors keep their innermost stage.
    pub fn in_stage(self, stage: &'static str) -> Self {
        match self {
            tagged @ Self::Stage { .. } => tagged,
            other => Self::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The stage that failed, if the error was tagged.
    pub fn stage(&self) -> Option<&'static str> {
        match self {
            Self::Stage { stage, .. } => Some(stage),
            _ => None,
        }
    }

    /// Whether the error only degrades a single item rather than the run.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Clustering(ClusteringError::Degenerate { .. }) | Self::Summarizer(_) => true,
            Self::Stage { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

pub type TopiaryResult<T> = Result<T, TopiaryError>;
