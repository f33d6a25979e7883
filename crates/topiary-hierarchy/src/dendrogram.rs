//! Dendrogram arena. Leaves occupy ids `0..n_leaves`; every merge appends
//! an interior node. Heights never decrease from child to parent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use topiary_core::config::Linkage;
use topiary_core::errors::{InputShapeError, TopiaryResult, TreeError};
use topiary_core::models::MergeHistory;
use topiary_core::ClusterLabel;
use tracing::debug;

use topiary_clustering::algorithms::similarity;

use crate::cuts::{CutRow, CutTable};
use crate::linkage::{self, LinkageStep};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DendrogramNode {
    pub id: usize,
    /// Empty for leaves, otherwise exactly two ids.
    pub children: Vec<usize>,
    pub parent: Option<usize>,
    /// 0.0 for leaves.
    pub height: f64,
    /// Leaves below this node.
    pub size: usize,
}

impl DendrogramNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dendrogram {
    n_leaves: usize,
    nodes: Vec<DendrogramNode>,
}

impl Dendrogram {
    fn with_leaves(n_leaves: usize) -> Self {
        let nodes = (0..n_leaves)
            .map(|id| DendrogramNode {
                id,
                children: Vec::new(),
                parent: None,
                height: 0.0,
                size: 1,
            })
            .collect();
        Self { n_leaves, nodes }
    }

    fn push_merge(&mut self, left: usize, right: usize, height: f64) -> usize {
        let id = self.nodes.len();
        let size = self.nodes[left].size + self.nodes[right].size;
        let floor = self.nodes[left].height.max(self.nodes[right].height);
        self.nodes[left].parent = Some(id);
        self.nodes[right].parent = Some(id);
        self.nodes.push(DendrogramNode {
            id,
            children: vec![left, right],
            parent: None,
            height: height.max(floor),
            size,
        });
        id
    }

    /// Agglomerate medoids (one leaf each, in the given order) after
    /// L2-normalising them.
    pub fn from_medoids(medoids: &[Vec<f32>], linkage: Linkage) -> TopiaryResult<Self> {
        if medoids.is_empty() {
            return Err(TreeError::EmptyDendrogram.into());
        }
        let points: Vec<Vec<f32>> = medoids.iter().map(|m| similarity::l2_normalize(m)).collect();
        let groups: Vec<Vec<usize>> = (0..points.len()).map(|i| vec![i]).collect();
        let steps = linkage::agglomerate(&points, &groups, linkage);

        let mut dendrogram = Self::with_leaves(points.len());
        dendrogram.apply_steps(&(0..points.len()).collect::<Vec<_>>(), &steps, 0.0);
        debug!(leaves = dendrogram.n_leaves, ?linkage, "dendrogram built from medoids");
        Ok(dendrogram)
    }

    /// Replay a merge history, then join whatever survived by linkage.
    ///
    /// Leaf `i` is the `i`-th history leaf and `leaf_medoids[i]` its medoid.
    /// History merges sit at height `1 - score`, made monotone; the
    /// completing merges sit above the highest history height.
    pub fn from_merge_history(
        history: &MergeHistory,
        leaf_medoids: &[Vec<f32>],
        linkage: Linkage,
    ) -> TopiaryResult<Self> {
        let leaves = history.leaves();
        if leaves.is_empty() {
            return Err(TreeError::EmptyDendrogram.into());
        }
        if leaves.len() != leaf_medoids.len() {
            return Err(InputShapeError::LabelCountMismatch {
                expected: leaves.len(),
                actual: leaf_medoids.len(),
            }
            .into());
        }

        let mut dendrogram = Self::with_leaves(leaves.len());
        let mut node_of: BTreeMap<usize, usize> = leaves
            .iter()
            .enumerate()
            .map(|(leaf, &hist_id)| (hist_id, leaf))
            .collect();

        let mut height = 0.0f64;
        for merge in history.merges() {
            let (Some(&l), Some(&r)) = (
                merge.children.first().and_then(|c| node_of.get(c)),
                merge.children.get(1).and_then(|c| node_of.get(c)),
            ) else {
                return Err(TreeError::UnknownHistoryNode { id: merge.id }.into());
            };
            height = height.max(1.0 - merge.score.unwrap_or(0.0)).max(0.0);
            let id = dendrogram.push_merge(l, r, height);
            node_of.insert(merge.id, id);
        }

        let roots = history.roots();
        let mut survivors = Vec::with_capacity(roots.len());
        let mut groups = Vec::with_capacity(roots.len());
        for root in roots {
            let Some(&node) = node_of.get(&root) else {
                return Err(TreeError::UnknownHistoryNode { id: root }.into());
            };
            let members: Vec<usize> = history
                .leaves_under(root)
                .iter()
                .filter_map(|h| node_of.get(h).copied())
                .collect();
            survivors.push(node);
            groups.push(members);
        }

        let points: Vec<Vec<f32>> = leaf_medoids.iter().map(|m| similarity::l2_normalize(m)).collect();
        let steps = linkage::agglomerate(&points, &groups, linkage);
        dendrogram.apply_steps(&survivors, &steps, height);
        debug!(
            leaves = dendrogram.n_leaves,
            replayed = history.merge_count(),
            completed = steps.len(),
            "dendrogram built from merge history"
        );
        Ok(dendrogram)
    }

    /// Append linkage steps. `start[i]` is the node for input group `i`.
    fn apply_steps(&mut self, start: &[usize], steps: &[LinkageStep], offset: f64) {
        let mut slot: Vec<usize> = start.to_vec();
        for step in steps {
            let (Some(&l), Some(&r)) = (slot.get(step.left), slot.get(step.right)) else {
                continue;
            };
            let id = self.push_merge(l, r, offset + step.distance);
            slot.push(id);
        }
    }

    pub fn n_leaves(&self) -> usize {
        self.n_leaves
    }

    pub fn nodes(&self) -> &[DendrogramNode] {
        &self.nodes
    }

    pub fn get(&self, id: usize) -> Option<&DendrogramNode> {
        self.nodes.get(id)
    }

    /// Interior nodes in merge order.
    pub fn merges(&self) -> &[DendrogramNode] {
        &self.nodes[self.n_leaves..]
    }

    pub fn heights(&self) -> Vec<f64> {
        self.merges().iter().map(|n| n.height).collect()
    }

    /// Parentless nodes; exactly one once every leaf has been joined.
    pub fn roots(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .filter(|n| n.parent.is_none())
            .map(|n| n.id)
            .collect()
    }

    /// Flat partition of the leaves: merges at or below `threshold` apply.
    /// Groups are numbered by their lowest leaf.
    pub fn cut(&self, threshold: f64) -> Vec<ClusterLabel> {
        let mut lookup: BTreeMap<usize, ClusterLabel> = BTreeMap::new();
        (0..self.n_leaves)
            .map(|leaf| {
                let mut top = leaf;
                while let Some(parent) = self.nodes[top].parent {
                    if self.nodes[parent].height > threshold {
                        break;
                    }
                    top = parent;
                }
                let next = lookup.len() as ClusterLabel;
                *lookup.entry(top).or_insert(next)
            })
            .collect()
    }

    /// Cut at each threshold (ascending), keeping only rows whose
    /// membership differs from the previous row.
    pub fn cut_table(&self, thresholds: &[f64]) -> CutTable {
        let mut sorted: Vec<f64> = thresholds.iter().copied().filter(|t| !t.is_nan()).collect();
        sorted.sort_by(f64::total_cmp);
        sorted.dedup();

        let mut rows: Vec<CutRow> = Vec::new();
        for height in sorted {
            let labels = self.cut(height);
            if rows.last().map_or(true, |prev| prev.labels != labels) {
                rows.push(CutRow::new(height, labels));
            }
        }
        CutTable::new(self.n_leaves, rows)
    }

    /// `levels` thresholds spread evenly from the lowest to the highest
    /// merge height. A dendrogram without merges yields `[0.0]`.
    pub fn auto_thresholds(&self, levels: usize) -> Vec<f64> {
        let heights = self.heights();
        let (Some(lo), Some(hi)) = (
            heights.iter().copied().reduce(f64::min),
            heights.iter().copied().reduce(f64::max),
        ) else {
            return vec![0.0];
        };
        match levels {
            0 => Vec::new(),
            1 => vec![hi],
            n => (0..n)
                .map(|i| {
                    if i == n - 1 {
                        hi
                    } else {
                        lo + (hi - lo) * i as f64 / (n - 1) as f64
                    }
                })
                .collect(),
        }
    }
}
