use crate::error::StoreError;
use crate::types::{Edge, EdgeKind, Node};

/// Durable home of the graph.
///
/// Writers are the indexer (nodes, edges) and the summarizer (`summary` only);
/// everything else reads.
pub trait GraphStore: Send + Sync {
    /// Insert or update by id. An existing `summary` is preserved.
    fn upsert_node(&self, node: &Node) -> Result<(), StoreError>;

    /// Insert or ignore; `(source, target, kind)` is the natural key.
    /// Edges with an empty endpoint are ignored.
    fn add_edge(&self, source: &str, target: &str, kind: EdgeKind) -> Result<(), StoreError>;

    /// All nodes, ordered by id
    fn get_all_nodes(&self) -> Result<Vec<Node>, StoreError>;

    /// All edges, ordered by source, target, kind
    fn get_edges(&self) -> Result<Vec<Edge>, StoreError>;

    fn get_node(&self, id: &str) -> Result<Option<Node>, StoreError>;

    fn get_summary(&self, id: &str) -> Result<Option<String>, StoreError>;

    fn update_summary(&self, id: &str, summary: &str) -> Result<(), StoreError>;
}
