use crate::types::{Edge, EdgeKind, Node};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

/// In-memory directed graph materialized from the store.
///
/// A read model: rebuilt wholesale, never patched.
#[derive(Debug, Clone, Default)]
pub struct CodeGraph {
    graph: DiGraph<Node, EdgeKind>,
    index: HashMap<String, NodeIndex>,
}

impl CodeGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from persisted rows. Edges whose endpoints are not nodes are skipped.
    #[must_use]
    pub fn from_parts(nodes: Vec<Node>, edges: &[Edge]) -> Self {
        let mut graph = Self::new();
        for node in nodes {
            graph.add_node(node);
        }

        let mut dangling = 0usize;
        for edge in edges {
            if graph.find_node(&edge.source_id).is_none()
                || graph.find_node(&edge.target_id).is_none()
            {
                dangling += 1;
                continue;
            }
            graph.add_edge(&edge.source_id, &edge.target_id, edge.kind);
        }
        if dangling > 0 {
            log::debug!("Skipped {dangling} edges with unknown endpoints");
        }

        graph
    }

    /// Add a node, replacing the attributes of an existing node with the same id
    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        if let Some(&idx) = self.index.get(&node.id) {
            self.graph[idx] = node;
            return idx;
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        idx
    }

    /// Returns false when an endpoint is unknown or the edge already exists
    pub fn add_edge(&mut self, source_id: &str, target_id: &str, kind: EdgeKind) -> bool {
        let (Some(source), Some(target)) = (self.find_node(source_id), self.find_node(target_id))
        else {
            return false;
        };
        let exists = self
            .graph
            .edges_connecting(source, target)
            .any(|e| *e.weight() == kind);
        if exists {
            return false;
        }
        self.graph.add_edge(source, target, kind);
        true
    }

    #[must_use]
    pub fn find_node(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    #[must_use]
    pub fn get_node(&self, idx: NodeIndex) -> Option<&Node> {
        self.graph.node_weight(idx)
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.find_node(id).and_then(|idx| self.get_node(idx))
    }

    /// Distinct targets of outgoing `calls` edges, ordered by node id
    #[must_use]
    pub fn get_callees(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let targets = self
            .graph
            .edges(node)
            .filter(|e| *e.weight() == EdgeKind::Calls)
            .map(|e| e.target());
        self.distinct_by_id(targets)
    }

    /// Distinct sources of incoming `calls` edges, ordered by node id
    #[must_use]
    pub fn get_callers(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let sources = self
            .graph
            .edges_directed(node, Direction::Incoming)
            .filter(|e| *e.weight() == EdgeKind::Calls)
            .map(|e| e.source());
        self.distinct_by_id(sources)
    }

    /// Incoming plus outgoing `calls` edges; a self-call counts twice
    #[must_use]
    pub fn call_degree(&self, node: NodeIndex) -> usize {
        let outgoing = self
            .graph
            .edges(node)
            .filter(|e| *e.weight() == EdgeKind::Calls)
            .count();
        let incoming = self
            .graph
            .edges_directed(node, Direction::Incoming)
            .filter(|e| *e.weight() == EdgeKind::Calls)
            .count();
        outgoing + incoming
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &Node)> + '_ {
        self.graph
            .node_indices()
            .filter_map(|idx| self.graph.node_weight(idx).map(|n| (idx, n)))
    }

    /// `(source, target)` pairs of every `calls` edge
    pub fn call_edges(&self) -> impl Iterator<Item = (&Node, &Node)> + '_ {
        self.graph
            .edge_references()
            .filter(|e| *e.weight() == EdgeKind::Calls)
            .map(|e| (&self.graph[e.source()], &self.graph[e.target()]))
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn distinct_by_id(&self, indices: impl Iterator<Item = NodeIndex>) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = indices.collect();
        out.sort_by(|a, b| self.graph[*a].id.cmp(&self.graph[*b].id));
        out.dedup();
        out
    }
}
