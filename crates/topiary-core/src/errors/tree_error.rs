/// Structural errors while assembling a topic tree or dendrogram.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("no root found among {nodes} node(s)")]
    NoRoot { nodes: usize },

    #[error("multiple roots found: {roots:?}")]
    MultipleRoots { roots: Vec<String> },

    #[error("node {node} references unknown parent {parent}")]
    UnknownParent { node: String, parent: String },

    #[error("duplicate node id {id}")]
    DuplicateNode { id: String },

    #[error("cycle detected through node {node}")]
    Cycle { node: String },

    #[error("dendrogram has no leaves")]
    EmptyDendrogram,

    #[error("merge history references unknown node {id}")]
    UnknownHistoryNode { id: usize },
}
