//! Core types for network representation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Device polarity of a transistor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    /// N-channel device, conducts when its gate is high
    Nmos,
    /// P-channel device, conducts when its gate is low
    Pmos,
}

impl DeviceType {
    /// Check if this is a P-channel device (drawn with a gate bubble).
    pub fn is_pmos(&self) -> bool {
        matches!(self, DeviceType::Pmos)
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceType::Nmos => write!(f, "NMOS"),
            DeviceType::Pmos => write!(f, "PMOS"),
        }
    }
}

/// Discriminant of a [`NetworkNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Transistor,
    Series,
    Parallel,
}

impl NodeKind {
    /// Tag used for this kind in the canonical JSON form.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Transistor => "transistor",
            NodeKind::Series => "series",
            NodeKind::Parallel => "parallel",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single transistor leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transistor {
    /// Display label of the gate signal, including any inversion marker
    pub name: String,
    /// Device polarity
    pub device_type: DeviceType,
    /// Bare gate signal name, when it differs from the label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate: Option<String>,
    /// Whether the gate signal is logically negated
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub gate_inverted: bool,
    /// Upstream conduction sense bit; carried through, never drawn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_when: Option<u8>,
}

impl Transistor {
    /// Create a transistor whose label is its gate signal.
    pub fn new(name: impl Into<String>, device_type: DeviceType) -> Self {
        Self {
            name: name.into(),
            device_type,
            gate: None,
            gate_inverted: false,
            on_when: None,
        }
    }

    /// Bare gate signal name, without the inversion marker.
    pub fn gate(&self) -> &str {
        self.gate.as_deref().unwrap_or(&self.name)
    }
}

/// A node in a series/parallel transistor network.
///
/// Children order is preserved by every pass in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NetworkNode {
    /// Leaf device
    Transistor(Transistor),
    /// Chained conduction paths: all must conduct
    Series { children: Vec<NetworkNode> },
    /// Alternative conduction paths: any one conducts
    Parallel { children: Vec<NetworkNode> },
}

impl NetworkNode {
    /// Create a transistor leaf.
    pub fn transistor(name: impl Into<String>, device_type: DeviceType) -> Self {
        NetworkNode::Transistor(Transistor::new(name, device_type))
    }

    /// Create a series block.
    pub fn series(children: Vec<NetworkNode>) -> Self {
        NetworkNode::Series { children }
    }

    /// Create a parallel block.
    pub fn parallel(children: Vec<NetworkNode>) -> Self {
        NetworkNode::Parallel { children }
    }

    /// Get the node's discriminant.
    pub fn kind(&self) -> NodeKind {
        match self {
            NetworkNode::Transistor(_) => NodeKind::Transistor,
            NetworkNode::Series { .. } => NodeKind::Series,
            NetworkNode::Parallel { .. } => NodeKind::Parallel,
        }
    }

    /// Children of a composite; empty for a transistor.
    pub fn children(&self) -> &[NetworkNode] {
        match self {
            NetworkNode::Transistor(_) => &[],
            NetworkNode::Series { children } | NetworkNode::Parallel { children } => children,
        }
    }

    /// Number of transistor leaves in this subtree.
    pub fn transistor_count(&self) -> usize {
        match self {
            NetworkNode::Transistor(_) => 1,
            _ => self.children().iter().map(NetworkNode::transistor_count).sum(),
        }
    }

    /// Nesting depth; a lone transistor has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(NetworkNode::depth)
            .max()
            .unwrap_or(0)
    }

    /// All transistor leaves, left to right.
    pub fn leaves(&self) -> Vec<&Transistor> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                NetworkNode::Transistor(t) => out.push(t),
                _ => stack.extend(node.children().iter().rev()),
            }
        }
        out
    }

    fn fmt_expr(&self, f: &mut fmt::Formatter<'_>, parent: Option<NodeKind>) -> fmt::Result {
        let (children, sep) = match self {
            NetworkNode::Transistor(t) => return f.write_str(&t.name),
            NetworkNode::Series { children } => (children, " & "),
            NetworkNode::Parallel { children } => (children, " | "),
        };
        if children.is_empty() {
            return f.write_str("()");
        }
        // OR binds looser than AND
        let wrap = children.len() > 1
            && self.kind() == NodeKind::Parallel
            && parent == Some(NodeKind::Series);
        if wrap {
            f.write_str("(")?;
        }
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            child.fmt_expr(f, Some(self.kind()))?;
        }
        if wrap {
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl fmt::Display for NetworkNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_expr(f, None)
    }
}

/// The pull-up and pull-down networks of one gate, drawn side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CmosNetwork {
    /// Pull-up network (PMOS devices)
    pub pun: NetworkNode,
    /// Pull-down network (NMOS devices)
    pub pdn: NetworkNode,
}
