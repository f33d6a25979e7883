/// Configuration errors. Fatal: validated before any work starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("failed to read config {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("invalid value for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("parameter grid axis {axis} is empty")]
    EmptyGrid { axis: String },

    #[error("weight {field} must be finite and non-negative, got {value}")]
    NegativeWeight { field: String, value: f64 },
}
