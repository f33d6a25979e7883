use serde::{Deserialize, Serialize};

use super::defaults;

/// Vector store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Project embeddings onto this many principal components before
    /// density clustering. `None` keeps the raw embeddings.
    pub projection_components: Option<usize>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            projection_components: defaults::DEFAULT_PROJECTION_COMPONENTS,
        }
    }
}
