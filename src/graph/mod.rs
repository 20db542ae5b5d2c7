use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Vertices compare by handle, not by contents.
pub trait Graph {
    type Vertex: Copy + Eq + Hash;

    /// Traversal entry points, in order.
    fn roots(&self) -> Vec<Self::Vertex>;

    fn type_label(&self, vertex: Self::Vertex) -> &str;

    /// Outgoing edges of `vertex`, in declaration order.
    fn outs(&self, vertex: Self::Vertex) -> Vec<Self::Vertex>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceNode {
    pub name: String,
    pub resource_type: String,
}

#[derive(Debug)]
pub struct ResourceGraph {
    pub graph: DiGraph<ResourceNode, ()>,
    pub name_index: HashMap<String, NodeIndex>,
    roots: Vec<NodeIndex>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            name_index: HashMap::new(),
            roots: Vec::new(),
        }
    }

    pub fn add_resource(&mut self, resource: ResourceNode) -> NodeIndex {
        let name = resource.name.clone();
        let node_idx = self.graph.add_node(resource);
        self.name_index.insert(name, node_idx);
        node_idx
    }

    pub fn add_dependency(&mut self, from: NodeIndex, to: NodeIndex) {
        self.graph.add_edge(from, to, ());
    }

    pub fn mark_root(&mut self, node: NodeIndex) {
        if !self.roots.contains(&node) {
            self.roots.push(node);
        }
    }

    /// Marks as roots every resource nothing depends on, then enough extra
    /// resources (in insertion order) that every resource is reachable from
    /// some root. The extra roots only occur when resources sit on a cycle.
    pub fn mark_default_roots(&mut self) {
        let sources: Vec<_> = self
            .graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, petgraph::Direction::Incoming)
                    .next()
                    .is_none()
            })
            .collect();
        for idx in sources {
            self.mark_root(idx);
        }

        let mut reached = HashSet::new();
        for &root in &self.roots {
            self.reach_from(root, &mut reached);
        }
        let unreached: Vec<_> = self.graph.node_indices().collect();
        for idx in unreached {
            if !reached.contains(&idx) {
                self.mark_root(idx);
                self.reach_from(idx, &mut reached);
            }
        }
    }

    fn reach_from(&self, start: NodeIndex, reached: &mut HashSet<NodeIndex>) {
        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(idx) = dfs.next(&self.graph) {
            reached.insert(idx);
        }
    }

    pub fn find(&self, name: &str) -> Option<NodeIndex> {
        self.name_index.get(name).copied()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}

impl Default for ResourceGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph for ResourceGraph {
    type Vertex = NodeIndex;

    fn roots(&self) -> Vec<NodeIndex> {
        self.roots.clone()
    }

    fn type_label(&self, vertex: NodeIndex) -> &str {
        self.graph
            .node_weight(vertex)
            .map_or("", |node| node.resource_type.as_str())
    }

    fn outs(&self, vertex: NodeIndex) -> Vec<NodeIndex> {
        // petgraph lists neighbors newest edge first.
        let mut outs: Vec<_> = self
            .graph
            .neighbors_directed(vertex, petgraph::Direction::Outgoing)
            .collect();
        outs.reverse();
        outs
    }
}
