use crate::error::StoreError;
use crate::graph::CodeGraph;
use crate::store::GraphStore;
use crate::types::{
    Connectivity, Context, Dependency, FunctionEntry, Projection, VisualEdge, VisualNode,
};
use std::sync::Arc;

/// Answers context and visualization queries over a materialized copy of the store.
///
/// The in-memory graph is only as fresh as the last [`GraphService::refresh`].
pub struct GraphService {
    store: Arc<dyn GraphStore>,
    graph: CodeGraph,
}

impl GraphService {
    /// Create the service and load the current graph
    pub fn new(store: Arc<dyn GraphStore>) -> Result<Self, StoreError> {
        let mut service = Self {
            store,
            graph: CodeGraph::new(),
        };
        service.refresh()?;
        Ok(service)
    }

    /// Rebuild the read model from every persisted node and edge.
    ///
    /// On a store error the previous model stays in place.
    pub fn refresh(&mut self) -> Result<(), StoreError> {
        let nodes = self.store.get_all_nodes()?;
        let edges = self.store.get_edges()?;
        self.graph = CodeGraph::from_parts(nodes, &edges);
        log::debug!(
            "Graph refreshed: {} nodes, {} edges",
            self.graph.node_count(),
            self.graph.edge_count()
        );
        Ok(())
    }

    /// Target attributes, resolved callees and caller names. `None` if the id is unknown.
    #[must_use]
    pub fn get_context(&self, node_id: &str) -> Option<Context> {
        let idx = self.graph.find_node(node_id)?;
        let target = self.graph.get_node(idx)?.clone();

        let dependencies = self
            .graph
            .get_callees(idx)
            .into_iter()
            .filter_map(|callee| self.graph.get_node(callee))
            .map(|node| Dependency {
                id: node.id.clone(),
                name: node.name.clone(),
                summary: node.summary.clone(),
                file_path: node.file_path.clone(),
            })
            .collect();

        let usages = self
            .graph
            .get_callers(idx)
            .into_iter()
            .filter_map(|caller| self.graph.get_node(caller))
            .map(|node| node.name.clone())
            .collect();

        Some(Context {
            target,
            dependencies,
            usages,
        })
    }

    /// Function nodes and the `calls` edges between them, with a connectivity class per node
    #[must_use]
    pub fn visualization(&self) -> Projection {
        let mut nodes: Vec<VisualNode> = self
            .graph
            .nodes()
            .filter(|(_, node)| node.is_function())
            .map(|(idx, node)| {
                let degree = self.graph.call_degree(idx);
                VisualNode {
                    id: node.id.clone(),
                    label: node.name.clone(),
                    file_path: node.file_path.clone(),
                    degree,
                    connectivity: Connectivity::from_degree(degree),
                }
            })
            .collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));

        let mut edges: Vec<VisualEdge> = self
            .graph
            .call_edges()
            .filter(|(source, target)| source.is_function() && target.is_function())
            .map(|(source, target)| VisualEdge {
                source: source.id.clone(),
                target: target.id.clone(),
            })
            .collect();
        edges.sort_by(|a, b| a.source.cmp(&b.source).then_with(|| a.target.cmp(&b.target)));

        Projection { nodes, edges }
    }

    /// Case-insensitive substring search over `<basename> :: <name>` labels
    #[must_use]
    pub fn find_functions(&self, query: &str) -> Vec<FunctionEntry> {
        let needle = query.trim().to_lowercase();
        let mut entries: Vec<FunctionEntry> = self
            .graph
            .nodes()
            .filter(|(_, node)| node.is_function())
            .map(|(_, node)| FunctionEntry {
                id: node.id.clone(),
                label: node.label(),
            })
            .filter(|entry| needle.is_empty() || entry.label.to_lowercase().contains(&needle))
            .collect();
        entries.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.id.cmp(&b.id)));
        entries
    }

    #[must_use]
    pub fn graph(&self) -> &CodeGraph {
        &self.graph
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn GraphStore> {
        &self.store
    }
}
