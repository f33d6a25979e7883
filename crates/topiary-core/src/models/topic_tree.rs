use serde::{Deserialize, Serialize};

/// A node of the labelled topic hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicTreeNode {
    pub id: String,
    pub summary: String,
    #[serde(default)]
    pub children: Vec<TopicTreeNode>,
}

impl TopicTreeNode {
    pub fn leaf(id: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(Self::leaf_count).sum()
        }
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn find(&self, id: &str) -> Option<&TopicTreeNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Leaf ids in depth-first order.
    pub fn leaf_ids(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_leaf_ids(&mut out);
        out
    }

    fn collect_leaf_ids<'a>(&'a self, out: &mut Vec<&'a str>) {
        if self.is_leaf() {
            out.push(&self.id);
        }
        for child in &self.children {
            child.collect_leaf_ids(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_depth() {
        let tree = TopicTreeNode {
            id: "root".into(),
            summary: String::new(),
            children: vec![
                TopicTreeNode::leaf("a", "alpha"),
                TopicTreeNode {
                    id: "g".into(),
                    summary: String::new(),
                    children: vec![TopicTreeNode::leaf("b", "b"), TopicTreeNode::leaf("c", "c")],
                },
            ],
        };
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.leaf_ids(), vec!["a", "b", "c"]);
        assert_eq!(tree.find("c").map(|n| n.summary.as_str()), Some("c"));
    }

    #[test]
    fn missing_children_deserialize_as_leaf() {
        let node: TopicTreeNode = serde_json::from_str(r#"{"id":"x","summary":"s"}"#).unwrap();
        assert!(node.is_leaf());
    }
}
