//! Layout engine and layout tree.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{DEFAULT_H_SPACING, DEFAULT_TRANSISTOR_SIZE, DEFAULT_V_SPACING};
use crate::error::{DiagramError, Result};
use crate::network::NetworkNode;

/// Configuration for the layout engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width and height of a transistor footprint.
    pub transistor_size: f64,
    /// Gap between parallel branches.
    pub h_spacing: f64,
    /// Gap between series elements.
    pub v_spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            transistor_size: DEFAULT_TRANSISTOR_SIZE,
            h_spacing: DEFAULT_H_SPACING,
            v_spacing: DEFAULT_V_SPACING,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transistor footprint size.
    pub fn with_transistor_size(mut self, size: f64) -> Self {
        self.transistor_size = size;
        self
    }

    /// Set the gap between parallel branches.
    pub fn with_h_spacing(mut self, spacing: f64) -> Self {
        self.h_spacing = spacing;
        self
    }

    /// Set the gap between series elements.
    pub fn with_v_spacing(mut self, spacing: f64) -> Self {
        self.v_spacing = spacing;
        self
    }

    /// Check that every dimension is finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("transistor_size", self.transistor_size),
            ("h_spacing", self.h_spacing),
            ("v_spacing", self.v_spacing),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DiagramError::invalid_config(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// A sized and positioned mirror of one [`NetworkNode`].
///
/// `x` and `y` are relative to the parent's origin; the root sits at (0, 0).
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode<'a> {
    /// The network node this entry lays out
    pub node: &'a NetworkNode,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Layouts of the node's children, in the node's order
    pub children: Vec<LayoutNode<'a>>,
}

impl LayoutNode<'_> {
    /// Horizontal centerline in the parent's frame.
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Vertical centerline in the parent's frame.
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Bottom edge in the parent's frame.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Right edge in the parent's frame.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// Computes layout trees for network trees.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// Create a layout engine with default spacing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a layout engine with custom spacing.
    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Get the active configuration.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out a whole tree. Each call builds a fresh layout tree.
    pub fn layout<'a>(&self, root: &'a NetworkNode) -> LayoutNode<'a> {
        let layout = self.place(root);
        debug!(
            kind = %root.kind(),
            width = layout.width,
            height = layout.height,
            "computed layout"
        );
        layout
    }

    fn place<'a>(&self, node: &'a NetworkNode) -> LayoutNode<'a> {
        match node {
            NetworkNode::Transistor(_) => LayoutNode {
                node,
                x: 0.0,
                y: 0.0,
                width: self.config.transistor_size,
                height: self.config.transistor_size,
                children: Vec::new(),
            },

            NetworkNode::Series { children } => {
                let mut children: Vec<LayoutNode<'a>> =
                    children.iter().map(|c| self.place(c)).collect();

                let width = max_extent(children.iter().map(|c| c.width));
                let height = chained_extent(children.iter().map(|c| c.height), self.config.v_spacing);

                let mut y = 0.0;
                for child in &mut children {
                    child.x = (width - child.width) / 2.0;
                    child.y = y;
                    y += child.height + self.config.v_spacing;
                }

                LayoutNode {
                    node,
                    x: 0.0,
                    y: 0.0,
                    width,
                    height,
                    children,
                }
            }

            NetworkNode::Parallel { children } => {
                let mut children: Vec<LayoutNode<'a>> =
                    children.iter().map(|c| self.place(c)).collect();

                let width = chained_extent(children.iter().map(|c| c.width), self.config.h_spacing);
                let height = max_extent(children.iter().map(|c| c.height));

                let mut x = 0.0;
                for child in &mut children {
                    child.x = x;
                    child.y = (height - child.height) / 2.0;
                    x += child.width + self.config.h_spacing;
                }

                LayoutNode {
                    node,
                    x: 0.0,
                    y: 0.0,
                    width,
                    height,
                    children,
                }
            }
        }
    }
}

/// Largest extent, or 0 for no extents.
fn max_extent(extents: impl Iterator<Item = f64>) -> f64 {
    extents.fold(0.0, f64::max)
}

/// Sum of extents plus one gap between each adjacent pair, or 0 for none.
fn chained_extent(extents: impl Iterator<Item = f64>, gap: f64) -> f64 {
    let (count, total) = extents.fold((0usize, 0.0), |(n, sum), e| (n + 1, sum + e));
    if count == 0 {
        0.0
    } else {
        total + gap * (count - 1) as f64
    }
}

/// Lay out a tree with the default configuration.
pub fn calculate_layout(root: &NetworkNode) -> LayoutNode<'_> {
    LayoutEngine::new().layout(root)
}
