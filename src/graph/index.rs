use crate::model::GraphDocument;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;

/// Undirected adjacency over a graph document.
///
/// Built once per document; node weights index into `document.nodes` and
/// edge weights index into `document.links`. Links with an endpoint that is
/// not a node are left out of the adjacency but stay in the document.
pub struct LinkGraph {
    document: GraphDocument,
    graph: UnGraph<usize, usize>,
    node_indices: HashMap<String, NodeIndex>,
}

impl LinkGraph {
    pub fn build(document: GraphDocument) -> Self {
        let mut graph = UnGraph::default();
        let mut node_indices = HashMap::new();

        for (i, node) in document.nodes.iter().enumerate() {
            if node_indices.contains_key(&node.id) {
                continue;
            }
            let idx = graph.add_node(i);
            node_indices.insert(node.id.clone(), idx);
        }

        for (i, link) in document.links.iter().enumerate() {
            let (Some(&a), Some(&b)) = (
                node_indices.get(&link.source),
                node_indices.get(&link.target),
            ) else {
                continue;
            };
            graph.add_edge(a, b, i);
        }

        Self {
            document,
            graph,
            node_indices,
        }
    }

    pub fn document(&self) -> &GraphDocument {
        &self.document
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_indices.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Ids adjacent to `id` in either direction; repeated for parallel links.
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        match self.node_indices.get(id) {
            Some(&idx) => self
                .graph
                .neighbors(idx)
                .map(|n| self.document.nodes[self.graph[n]].id.as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Number of links touching `id`, counting both directions.
    pub fn degree(&self, id: &str) -> usize {
        self.node_indices
            .get(id)
            .map(|&idx| self.graph.edges(idx).count())
            .unwrap_or(0)
    }
}
