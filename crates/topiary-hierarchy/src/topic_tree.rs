//! Labelled topic tree, assembled from a cut table or from an external
//! node -> parent graph. Serialises as nested `{id, summary, children}`.

use std::collections::{BTreeMap, HashMap, HashSet};

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use topiary_core::constants::{
    FALLBACK_SUMMARY_KEYWORDS, GROUP_ID_PREFIX, KEYWORD_SUMMARY_SEPARATOR, LEAF_ID_PREFIX, ROOT_ID,
};
use topiary_core::errors::{ClusteringError, TopiaryResult, TreeError};
use topiary_core::models::TopicTreeNode;
use topiary_core::ClusterLabel;
use tracing::debug;

use crate::cuts::CutTable;

/// Immutable topic hierarchy with exactly one root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicTree {
    root: TopicTreeNode,
}

/// `"kw1, kw2, kw3"` from the first few keywords.
pub fn keyword_summary(keywords: &[String]) -> String {
    keywords
        .iter()
        .take(FALLBACK_SUMMARY_KEYWORDS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(KEYWORD_SUMMARY_SEPARATOR)
}

/// Interleave keyword lists, dropping repeats.
fn merge_keywords(lists: &[&[String]]) -> Vec<String> {
    let longest = lists.iter().map(|l| l.len()).max().unwrap_or(0);
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for rank in 0..longest {
        for list in lists {
            if let Some(word) = list.get(rank) {
                if seen.insert(word.as_str()) {
                    out.push(word.clone());
                }
            }
        }
    }
    out
}

struct Pending {
    first_leaf: usize,
    keywords: Vec<String>,
    node: TopicTreeNode,
}

impl TopicTree {
    pub fn new(root: TopicTreeNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &TopicTreeNode {
        &self.root
    }

    pub fn into_root(self) -> TopicTreeNode {
        self.root
    }

    /// Id of the leaf for cluster `label`.
    pub fn leaf_id(label: ClusterLabel) -> String {
        format!("{LEAF_ID_PREFIX}-{label}")
    }

    /// Inverse of [`leaf_id`](Self::leaf_id).
    pub fn parse_leaf_id(id: &str) -> Option<ClusterLabel> {
        id.strip_prefix(LEAF_ID_PREFIX)?
            .strip_prefix('-')?
            .parse()
            .ok()
    }

    /// Nest the cut table's partitions bottom-up.
    ///
    /// Leaf `i` is cluster `i`. A group that contains a single node from
    /// the level below is collapsed into it. If the coarsest row still has
    /// several groups they are gathered under a synthetic root.
    pub fn from_cut_table(
        table: &CutTable,
        leaf_keywords: &BTreeMap<ClusterLabel, Vec<String>>,
    ) -> TopiaryResult<Self> {
        let n = table.n_leaves();
        if n == 0 {
            return Err(ClusteringError::Degenerate {
                stage: "tree".to_string(),
                clusters: 0,
            }
            .into());
        }

        let mut level: Vec<Pending> = (0..n)
            .map(|leaf| {
                let label = leaf as ClusterLabel;
                let keywords = leaf_keywords.get(&label).cloned().unwrap_or_default();
                Pending {
                    first_leaf: leaf,
                    node: TopicTreeNode::leaf(Self::leaf_id(label), keyword_summary(&keywords)),
                    keywords,
                }
            })
            .collect();

        for (r, row) in table.rows().iter().enumerate() {
            let mut buckets: BTreeMap<ClusterLabel, Vec<Pending>> = BTreeMap::new();
            for pending in level {
                let group = row.labels.get(pending.first_leaf).copied().unwrap_or(0);
                buckets.entry(group).or_default().push(pending);
            }
            level = buckets
                .into_iter()
                .map(|(group, members)| {
                    Self::gather(members, format!("{GROUP_ID_PREFIX}-{r}-{group}"))
                })
                .collect();
        }

        let root = if level.len() == 1 {
            let mut top = level.remove(0).node;
            if !top.is_leaf() {
                top.id = ROOT_ID.to_string();
            }
            top
        } else {
            Self::gather(level, ROOT_ID.to_string()).node
        };
        let tree = Self { root };
        debug!(
            leaves = tree.leaf_count(),
            nodes = tree.node_count(),
            depth = tree.depth(),
            "topic tree assembled from cut table"
        );
        Ok(tree)
    }

    fn gather(mut members: Vec<Pending>, id: String) -> Pending {
        if members.len() == 1 {
            return members.remove(0);
        }
        members.sort_by_key(|p| p.first_leaf);
        let keywords = {
            let lists: Vec<&[String]> = members.iter().map(|p| p.keywords.as_slice()).collect();
            merge_keywords(&lists)
        };
        let first_leaf = members.first().map_or(0, |p| p.first_leaf);
        Pending {
            first_leaf,
            node: TopicTreeNode {
                id,
                summary: keyword_summary(&keywords),
                children: members.into_iter().map(|p| p.node).collect(),
            },
            keywords,
        }
    }

    /// Assemble from `(node, parent)` links; exactly one node may lack a
    /// parent. Children keep the order in which they appear in `links`.
    /// Summaries fall back to the node's keywords, then to "".
    pub fn from_parent_links(
        links: &[(String, Option<String>)],
        summaries: &BTreeMap<String, String>,
        keywords: &BTreeMap<String, Vec<String>>,
    ) -> TopiaryResult<Self> {
        let mut graph: DiGraph<String, ()> = DiGraph::new();
        let mut index: HashMap<&str, NodeIndex> = HashMap::new();
        for (node, _) in links {
            if index.contains_key(node.as_str()) {
                return Err(TreeError::DuplicateNode { id: node.clone() }.into());
            }
            index.insert(node.as_str(), graph.add_node(node.clone()));
        }

        let mut roots = Vec::new();
        for (node, parent) in links {
            match parent {
                None => roots.push(node.clone()),
                Some(parent) => {
                    let Some(&p) = index.get(parent.as_str()) else {
                        return Err(TreeError::UnknownParent {
                            node: node.clone(),
                            parent: parent.clone(),
                        }
                        .into());
                    };
                    graph.add_edge(p, index[node.as_str()], ());
                }
            }
        }

        let root_id = match roots.len() {
            0 => return Err(TreeError::NoRoot { nodes: links.len() }.into()),
            1 => roots.remove(0),
            _ => return Err(TreeError::MultipleRoots { roots }.into()),
        };
        toposort(&graph, None).map_err(|cycle| TreeError::Cycle {
            node: graph[cycle.node_id()].clone(),
        })?;

        let root = build_node(&graph, index[root_id.as_str()], summaries, keywords);
        Ok(Self { root })
    }

    /// `(node, parent)` for every node in pre-order.
    pub fn parent_links(&self) -> Vec<(String, Option<String>)> {
        let mut out = Vec::with_capacity(self.node_count());
        let mut stack: Vec<(&TopicTreeNode, Option<&str>)> = vec![(&self.root, None)];
        while let Some((node, parent)) = stack.pop() {
            out.push((node.id.clone(), parent.map(str::to_string)));
            for child in node.children.iter().rev() {
                stack.push((child, Some(node.id.as_str())));
            }
        }
        out
    }

    /// Node summaries by id.
    pub fn summaries(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            out.insert(node.id.clone(), node.summary.clone());
            stack.extend(node.children.iter());
        }
        out
    }

    /// Copy with the given summaries replacing existing ones.
    pub fn with_summaries(mut self, summaries: &BTreeMap<String, String>) -> Self {
        fn apply(node: &mut TopicTreeNode, summaries: &BTreeMap<String, String>) {
            if let Some(s) = summaries.get(&node.id) {
                node.summary = s.clone();
            }
            for child in &mut node.children {
                apply(child, summaries);
            }
        }
        apply(&mut self.root, summaries);
        self
    }

    pub fn to_json(&self) -> TopiaryResult<String> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }

    pub fn from_json(json: &str) -> TopiaryResult<Self> {
        Ok(Self {
            root: serde_json::from_str(json)?,
        })
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    pub fn find(&self, id: &str) -> Option<&TopicTreeNode> {
        self.root.find(id)
    }

    pub fn leaf_ids(&self) -> Vec<&str> {
        self.root.leaf_ids()
    }

    /// Every node id in pre-order.
    pub fn node_ids(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            out.push(node.id.as_str());
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Leaf ids below `id` (the node itself if it is a leaf).
    pub fn leaves_under(&self, id: &str) -> Vec<&str> {
        self.find(id).map(|n| n.leaf_ids()).unwrap_or_default()
    }
}

fn build_node(
    graph: &DiGraph<String, ()>,
    idx: NodeIndex,
    summaries: &BTreeMap<String, String>,
    keywords: &BTreeMap<String, Vec<String>>,
) -> TopicTreeNode {
    let id = graph[idx].clone();
    let summary = summaries
        .get(&id)
        .cloned()
        .or_else(|| keywords.get(&id).map(|k| keyword_summary(k)))
        .unwrap_or_default();
    // Neighbours come back newest edge first.
    let mut children: Vec<NodeIndex> = graph.neighbors_directed(idx, Direction::Outgoing).collect();
    children.reverse();
    TopicTreeNode {
        id,
        summary,
        children: children
            .into_iter()
            .map(|c| build_node(graph, c, summaries, keywords))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cuts::CutRow;

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn keywords() -> BTreeMap<ClusterLabel, Vec<String>> {
        BTreeMap::from([
            (0, kw(&["pipeline", "capacity"])),
            (1, kw(&["tariff", "pipeline"])),
            (2, kw(&["party", "holiday"])),
        ])
    }

    #[test]
    fn leaf_ids_round_trip() {
        assert_eq!(TopicTree::leaf_id(4), "topic-4");
        assert_eq!(TopicTree::parse_leaf_id("topic-4"), Some(4));
        assert_eq!(TopicTree::parse_leaf_id("group-1-0"), None);
    }

    #[test]
    fn nested_cuts_become_nested_groups() {
        let table = CutTable::new(
            3,
            vec![
                CutRow::new(0.1, vec![0, 0, 1]),
                CutRow::new(0.9, vec![0, 0, 0]),
            ],
        );
        let tree = TopicTree::from_cut_table(&table, &keywords()).unwrap();
        assert_eq!(tree.root().id, "root");
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.depth(), 2);
        let group = tree.find("group-0-0").unwrap();
        assert_eq!(group.children.len(), 2);
        assert_eq!(group.summary, "pipeline, tariff, capacity");
        assert_eq!(tree.find("topic-2").unwrap().summary, "party, holiday");
    }

    #[test]
    fn unresolved_top_row_gets_synthetic_root() {
        let table = CutTable::new(3, vec![CutRow::new(0.0, vec![0, 1, 2])]);
        let tree = TopicTree::from_cut_table(&table, &keywords()).unwrap();
        assert_eq!(tree.root().id, "root");
        assert_eq!(tree.root().children.len(), 3);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn single_cluster_is_a_single_leaf() {
        let table = CutTable::new(1, vec![CutRow::new(0.0, vec![0])]);
        let tree = TopicTree::from_cut_table(&table, &keywords()).unwrap();
        assert_eq!(tree.root().id, "topic-0");
        assert_eq!(tree.leaf_count(), 1);
    }

    #[test]
    fn zero_clusters_is_degenerate() {
        let err = TopicTree::from_cut_table(&CutTable::new(0, vec![]), &keywords()).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn json_round_trip_is_exact() {
        let table = CutTable::new(3, vec![CutRow::new(0.1, vec![0, 0, 1])]);
        let tree = TopicTree::from_cut_table(&table, &keywords()).unwrap();
        let json = tree.to_json().unwrap();
        let back = TopicTree::from_json(&json).unwrap();
        assert_eq!(back, tree);
        assert_eq!(back.to_json().unwrap(), json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("id").is_some() && value.get("children").is_some());
    }

    #[test]
    fn parent_links_round_trip() {
        let table = CutTable::new(3, vec![CutRow::new(0.1, vec![0, 0, 1])]);
        let tree = TopicTree::from_cut_table(&table, &keywords()).unwrap();
        let rebuilt =
            TopicTree::from_parent_links(&tree.parent_links(), &tree.summaries(), &BTreeMap::new())
                .unwrap();
        assert_eq!(rebuilt, tree);
    }

    fn links(pairs: &[(&str, Option<&str>)]) -> Vec<(String, Option<String>)> {
        pairs
            .iter()
            .map(|(n, p)| (n.to_string(), p.map(str::to_string)))
            .collect()
    }

    #[test]
    fn multiple_roots_are_rejected() {
        let err = tree_err(TopicTree::from_parent_links(
            &links(&[("a", None), ("b", None)]),
            &BTreeMap::new(),
            &BTreeMap::new(),
        ));
        assert!(matches!(err, TreeError::MultipleRoots { .. }));
    }

    #[test]
    fn zero_roots_are_rejected() {
        let err = tree_err(TopicTree::from_parent_links(
            &links(&[("a", Some("b")), ("b", Some("a"))]),
            &BTreeMap::new(),
            &BTreeMap::new(),
        ));
        assert!(matches!(err, TreeError::NoRoot { nodes: 2 }));
    }

    #[test]
    fn cycle_below_root_is_rejected() {
        let err = tree_err(TopicTree::from_parent_links(
            &links(&[("r", None), ("a", Some("b")), ("b", Some("a"))]),
            &BTreeMap::new(),
            &BTreeMap::new(),
        ));
        assert!(matches!(err, TreeError::Cycle { .. }));
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let err = tree_err(TopicTree::from_parent_links(
            &links(&[("r", None), ("a", Some("missing"))]),
            &BTreeMap::new(),
            &BTreeMap::new(),
        ));
        assert!(matches!(err, TreeError::UnknownParent { .. }));
    }

    #[test]
    fn keyword_fallback_when_summary_missing() {
        let tree = TopicTree::from_parent_links(
            &links(&[("r", None), ("a", Some("r")), ("b", Some("r"))]),
            &BTreeMap::from([("a".to_string(), "About A.".to_string())]),
            &BTreeMap::from([("b".to_string(), kw(&["x", "y"]))]),
        )
        .unwrap();
        assert_eq!(tree.find("a").unwrap().summary, "About A.");
        assert_eq!(tree.find("b").unwrap().summary, "x, y");
        assert_eq!(tree.find("r").unwrap().summary, "");
        assert_eq!(tree.leaf_ids(), vec!["a", "b"]);
    }

    fn tree_err(result: TopiaryResult<TopicTree>) -> TreeError {
        match result {
            Err(topiary_core::TopiaryError::Tree(e)) => e,
            other => panic!("expected tree error, got {other:?}"),
        }
    }
}
