//! Candidate topologies and evaluated pipelines.

use std::fmt;
use std::sync::Arc;

use super::dataset::Dataset;
use super::node::{ModelNode, NodeId, NodeKind};

/// One candidate DAG of model nodes, in creation order.
///
/// Topologies are append-only: a node may only reference nodes that already
/// exist, which keeps every topology acyclic by construction. `new` and
/// `push` are the only way to build one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    nodes: Vec<ModelNode>,
}

impl Topology {
    /// Empty topology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node and return its id.
    ///
    /// # Panics
    ///
    /// Panics if the node's upstream references an id that is not yet
    /// present. Ids are handed out by this method, so a forward reference
    /// is a bug in the caller, not a recoverable condition.
    pub fn push(&mut self, node: ModelNode) -> NodeId {
        for &id in &node.upstream {
            assert!(
                id < self.nodes.len(),
                "upstream id {id} does not refer to an existing node"
            );
        }
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> &[ModelNode] {
        &self.nodes
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the topology has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of primary (leaf) nodes.
    pub fn primary_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Primary)
            .count()
    }

    /// The aggregating node, if one was drawn.
    pub fn secondary(&self) -> Option<&ModelNode> {
        self.nodes.iter().find(|n| n.kind == NodeKind::Secondary)
    }

    fn into_nodes(self) -> Vec<ModelNode> {
        self.nodes
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_nodes(&self.nodes, f)
    }
}

/// A topology bound to the dataset it is evaluated against.
///
/// The engine hands pipelines to the metric function; only the model layer
/// reads the dataset behind the handle.
#[derive(Debug, Clone)]
pub struct Pipeline {
    nodes: Vec<ModelNode>,
    data: Arc<Dataset>,
}

impl Pipeline {
    /// Bind a topology's nodes to a dataset, preserving node order.
    pub fn from_topology(topology: Topology, data: Arc<Dataset>) -> Self {
        Self {
            nodes: topology.into_nodes(),
            data,
        }
    }

    /// Nodes in creation order. The last node produces the pipeline output.
    pub fn nodes(&self) -> &[ModelNode] {
        &self.nodes
    }

    /// Dataset this pipeline is bound to.
    pub fn data(&self) -> &Dataset {
        &self.data
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the pipeline has no nodes. An empty pipeline means the
    /// search produced no usable candidate.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The output node, if the pipeline is non-empty.
    pub fn output_node(&self) -> Option<&ModelNode> {
        self.nodes.last()
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_nodes(&self.nodes, f)
    }
}

/// Render nodes as "a, b -> agg": primaries comma-separated, the
/// aggregating node after an arrow.
fn fmt_nodes(nodes: &[ModelNode], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if nodes.is_empty() {
        return f.write_str("(empty)");
    }
    let mut first = true;
    for node in nodes {
        match node.kind {
            NodeKind::Primary => {
                if !first {
                    f.write_str(", ")?;
                }
                write!(f, "{}", node.descriptor)?;
                first = false;
            }
            NodeKind::Secondary => write!(f, " -> {}", node.descriptor)?,
        }
    }
    Ok(())
}
