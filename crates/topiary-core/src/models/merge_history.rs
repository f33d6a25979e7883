//! Merge history as an arena of nodes addressed by integer id.
//!
//! Leaves are the initial clusters; every merge appends an interior node
//! whose two children get `parent` set to it. Parent links are ids, never
//! references, so the structure stays acyclic in ownership terms.

use serde::{Deserialize, Serialize};

use super::labels::ClusterLabel;

/// One node of the merge history arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryNode {
    pub id: usize,
    /// Cluster id this node represents (the lower id survives a merge).
    pub cluster: ClusterLabel,
    /// Child node ids; empty for leaves.
    pub children: Vec<usize>,
    pub parent: Option<usize>,
    /// Merge score that created this node; `None` for leaves.
    pub score: Option<f64>,
    /// Points covered by this node.
    pub size: usize,
    /// Dense output label, set on surviving roots after remapping.
    pub final_label: Option<ClusterLabel>,
}

impl HistoryNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Ordered record of every merge performed in one engine run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeHistory {
    nodes: Vec<HistoryNode>,
}

impl MergeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an initial cluster. Returns its node id.
    pub fn add_leaf(&mut self, cluster: ClusterLabel, size: usize) -> usize {
        let id = self.nodes.len();
        self.nodes.push(HistoryNode {
            id,
            cluster,
            children: Vec::new(),
            parent: None,
            score: None,
            size,
            final_label: None,
        });
        id
    }

    /// Record a merge of two current roots. Returns the new node id, or
    /// `None` when either input is unknown or already merged.
    pub fn add_merge(
        &mut self,
        left: usize,
        right: usize,
        cluster: ClusterLabel,
        score: f64,
    ) -> Option<usize> {
        if left == right {
            return None;
        }
        let (l, r) = (self.nodes.get(left)?, self.nodes.get(right)?);
        if l.parent.is_some() || r.parent.is_some() {
            return None;
        }
        let size = l.size + r.size;
        let id = self.nodes.len();
        self.nodes[left].parent = Some(id);
        self.nodes[right].parent = Some(id);
        self.nodes.push(HistoryNode {
            id,
            cluster,
            children: vec![left, right],
            parent: None,
            score: Some(score),
            size,
            final_label: None,
        });
        Some(id)
    }

    pub fn set_final_label(&mut self, id: usize, label: ClusterLabel) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.final_label = Some(label);
        }
    }

    pub fn get(&self, id: usize) -> Option<&HistoryNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &[HistoryNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes without a parent: the clusters that survived merging.
    pub fn roots(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .filter(|n| n.parent.is_none())
            .map(|n| n.id)
            .collect()
    }

    pub fn leaves(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .filter(|n| n.is_leaf())
            .map(|n| n.id)
            .collect()
    }

    /// Interior nodes in merge order.
    pub fn merges(&self) -> impl Iterator<Item = &HistoryNode> {
        self.nodes.iter().filter(|n| !n.is_leaf())
    }

    pub fn merge_count(&self) -> usize {
        self.merges().count()
    }

    /// Leaf ids below `id`, in left-to-right order.
    pub fn leaves_under(&self, id: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if node.is_leaf() {
                out.push(current);
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }
}
