//! Run outputs and their JSON persistence.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use topiary_core::models::{MergeStep, QualityReport, SummaryReport};
use topiary_core::{ClusterLabel, TopiaryError, TopiaryResult};
use topiary_hierarchy::{CutTable, TopicTree};
use topiary_observability::StageTiming;
use tracing::info;

pub const LABELS_FILE: &str = "labels.json";
pub const KEYWORDS_FILE: &str = "keywords.json";
pub const TREE_FILE: &str = "tree.json";
pub const EVALUATION_FILE: &str = "evaluation.json";
pub const SUMMARIES_FILE: &str = "summaries.json";
pub const CUT_TABLE_FILE: &str = "cut_table.json";

/// Everything one pipeline run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineArtifacts {
    /// Final label per chunk, in store order.
    pub labels: Vec<ClusterLabel>,
    pub keywords: BTreeMap<ClusterLabel, Vec<String>>,
    /// `None` when no cluster survived.
    pub tree: Option<TopicTree>,
    pub cut_table: Option<CutTable>,
    pub merge_steps: Vec<MergeStep>,
    pub summary_report: SummaryReport,
    pub evaluation: QualityReport,
    pub stage_timings: Vec<StageTiming>,
}

impl PipelineArtifacts {
    /// Write each artifact to its own file under `dir`, creating it if
    /// needed. Returns the written paths.
    pub fn write_json(&self, dir: &Path) -> TopiaryResult<Vec<PathBuf>> {
        fs::create_dir_all(dir).map_err(|source| TopiaryError::Io {
            context: format!("creating {}", dir.display()),
            source,
        })?;

        let files: [(&str, serde_json::Value); 6] = [
            (LABELS_FILE, serde_json::to_value(&self.labels)?),
            (KEYWORDS_FILE, serde_json::to_value(&self.keywords)?),
            (TREE_FILE, serde_json::to_value(&self.tree)?),
            (EVALUATION_FILE, serde_json::to_value(&self.evaluation)?),
            (SUMMARIES_FILE, serde_json::to_value(&self.summary_report)?),
            (CUT_TABLE_FILE, serde_json::to_value(&self.cut_table)?),
        ];
        let mut written = Vec::with_capacity(files.len());
        for (name, value) in files {
            let path = dir.join(name);
            let body = serde_json::to_string_pretty(&value)?;
            fs::write(&path, body).map_err(|source| TopiaryError::Io {
                context: format!("writing {}", path.display()),
                source,
            })?;
            written.push(path);
        }
        info!(dir = %dir.display(), files = written.len(), "artifacts written");
        Ok(written)
    }

    /// Read back the topic tree written by [`write_json`](Self::write_json).
    pub fn read_tree(dir: &Path) -> TopiaryResult<Option<TopicTree>> {
        let path = dir.join(TREE_FILE);
        let body = fs::read_to_string(&path).map_err(|source| TopiaryError::Io {
            context: format!("reading {}", path.display()),
            source,
        })?;
        Ok(serde_json::from_str(&body)?)
    }
}
