//! Node types for pipeline topologies.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Position of a node within its topology.
///
/// Upstream edges refer to nodes by position, so ids are only meaningful
/// inside the topology that produced them.
pub type NodeId = usize;

/// Role a node plays in the pipeline graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Leaf node fitted directly on the input data.
    Primary,
    /// Aggregating node fed by the outputs of upstream nodes.
    Secondary,
}

/// Opaque selector for the model a node carries.
///
/// The composition engine never interprets descriptors; the node factory,
/// the metric function and the model repository give them meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Model identifier, e.g. "polyfit" or "moving_average".
    pub id: String,
    /// Optional parameters forwarded to whatever builds the model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl ModelDescriptor {
    /// Descriptor with an id and no parameters.
    pub fn named(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            params: None,
        }
    }

    /// Attach parameters to the descriptor.
    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        self.params = Some(params);
        self
    }
}

impl From<&str> for ModelDescriptor {
    fn from(id: &str) -> Self {
        Self::named(id)
    }
}

impl fmt::Display for ModelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// One model unit in a pipeline DAG.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelNode {
    /// Primary (leaf) or secondary (aggregating).
    pub kind: NodeKind,
    /// Which model this node represents.
    pub descriptor: ModelDescriptor,
    /// Ids of the nodes this node consumes. Empty for primary nodes.
    pub upstream: Vec<NodeId>,
}

/// Builds nodes from descriptors.
///
/// Implement this to attach repository- or dataset-specific state to nodes
/// at construction time. A secondary node receives its upstream ids in the
/// same call that creates it, so factories never see a half-wired node.
pub trait NodeFactory {
    /// Build a primary node for `descriptor`.
    fn primary(&self, descriptor: &ModelDescriptor) -> ModelNode;

    /// Build a secondary node for `descriptor` consuming `upstream`.
    fn secondary(&self, descriptor: &ModelDescriptor, upstream: Vec<NodeId>) -> ModelNode;
}

/// Factory producing plain nodes that carry the descriptor as given.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardNodeFactory;

impl NodeFactory for StandardNodeFactory {
    fn primary(&self, descriptor: &ModelDescriptor) -> ModelNode {
        ModelNode {
            kind: NodeKind::Primary,
            descriptor: descriptor.clone(),
            upstream: Vec::new(),
        }
    }

    fn secondary(&self, descriptor: &ModelDescriptor, upstream: Vec<NodeId>) -> ModelNode {
        ModelNode {
            kind: NodeKind::Secondary,
            descriptor: descriptor.clone(),
            upstream,
        }
    }
}
