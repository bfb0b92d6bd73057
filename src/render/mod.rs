//! Composition of layout trees into drawable geometry.
//!
//! This module turns a positioned [`LayoutNode`] tree into a flat, ordered
//! list of [`Primitive`]s in global coordinates:
//! - Transistor leaves become [`TransistorGlyph`]s
//! - Series blocks add one wire between each pair of adjacent children
//! - Parallel blocks add a top and bottom rail plus two drops per child
//!
//! A [`Diagram`] wraps the primitive list with padding, optional supply and
//! output labels, and an overall bounding box. [`svg`] serializes diagrams.

mod compose;
mod geometry;
pub mod svg;

pub use compose::{compose, rail_span, Composer};
pub use geometry::{
    transistor_glyph, Circle, GlyphConfig, GlyphLines, Point, Segment, TransistorGlyph,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DiagramError, Result};
use crate::layout::{LayoutEngine, LayoutNode};
use crate::network::{CmosNetwork, NetworkNode};
use crate::Config;

/// Default whitespace around the drawn network.
pub const DEFAULT_PADDING: f64 = 16.0;

/// Default vertical room reserved for a rail label.
pub const DEFAULT_LABEL_SPACE: f64 = 30.0;

/// Distance from the label band's outer edge to the top label's baseline.
const LABEL_BASELINE: f64 = 12.0;

/// Distance from the label band's outer edge to where the label wire starts.
/// `label_space` must be at least this much or the wire would run backwards.
pub const LABEL_WIRE_START: f64 = 16.0;

/// Bottom label baseline, measured up from the label band's outer edge.
const LABEL_DESCENT: f64 = 4.0;

/// A drawable element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Primitive {
    /// A straight wire
    Wire(Segment),
    /// A transistor symbol
    Transistor(TransistorGlyph),
}

/// Settings for turning layouts into diagrams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Whitespace on every side of the network.
    pub padding: f64,
    /// Vertical room for each rail label.
    pub label_space: f64,
    /// Whether to draw VDD/OUT/GND labels on CMOS panels.
    pub rail_labels: bool,
    /// Transistor glyph proportions.
    pub glyph: GlyphConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            label_space: DEFAULT_LABEL_SPACE,
            rail_labels: true,
            glyph: GlyphConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the padding around the network.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Enable or disable rail labels.
    pub fn with_rail_labels(mut self, enabled: bool) -> Self {
        self.rail_labels = enabled;
        self
    }

    /// Set the vertical room for each rail label.
    pub fn with_label_space(mut self, label_space: f64) -> Self {
        self.label_space = label_space;
        self
    }

    /// Check that every dimension is finite and non-negative, and that rail
    /// labels have room for their connecting wire.
    pub fn validate(&self) -> Result<()> {
        let glyph = &self.glyph;
        for (name, value) in [
            ("padding", self.padding),
            ("label_space", self.label_space),
            ("glyph.channel_length", glyph.channel_length),
            ("glyph.gate_gap", glyph.gate_gap),
            ("glyph.bubble_offset", glyph.bubble_offset),
            ("glyph.bubble_radius", glyph.bubble_radius),
            ("glyph.label_rise", glyph.label_rise),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DiagramError::invalid_config(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        if self.rail_labels && self.label_space < LABEL_WIRE_START {
            return Err(DiagramError::invalid_config(format!(
                "label_space must be at least {LABEL_WIRE_START} when rail labels are drawn, got {}",
                self.label_space
            )));
        }
        Ok(())
    }
}

/// Labels drawn above and below a network, e.g. `VDD` and `OUT`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RailLabels {
    pub top: Option<String>,
    pub bottom: Option<String>,
}

impl RailLabels {
    /// Label both rails.
    pub fn new(top: impl Into<String>, bottom: impl Into<String>) -> Self {
        Self {
            top: Some(top.into()),
            bottom: Some(bottom.into()),
        }
    }

    /// Supply above, output below.
    pub fn pull_up() -> Self {
        Self::new("VDD", "OUT")
    }

    /// Output above, ground below.
    pub fn pull_down() -> Self {
        Self::new("OUT", "GND")
    }
}

/// A rail label placed in a diagram, with the wire joining it to the network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLabel {
    pub text: String,
    /// Center of the text baseline
    pub anchor: Point,
    pub wire: Segment,
}

/// A complete network drawing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagram {
    pub title: String,
    pub width: f64,
    pub height: f64,
    /// Where the layout root's origin sits
    pub content_origin: Point,
    pub primitives: Vec<Primitive>,
    pub labels: Vec<PlacedLabel>,
}

impl Diagram {
    /// Number of transistor glyphs.
    pub fn glyph_count(&self) -> usize {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Transistor(_)))
            .count()
    }

    /// Number of wires, excluding label connections.
    pub fn wire_count(&self) -> usize {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Wire(_)))
            .count()
    }
}

/// Wrap a layout in a padded, labelled diagram.
///
/// The bounding box is `layout.width + 2·padding` by
/// `layout.height + 2·padding`, plus `label_space` per present label.
pub fn render_diagram(
    title: impl Into<String>,
    layout: &LayoutNode<'_>,
    labels: &RailLabels,
    config: &RenderConfig,
) -> Diagram {
    let p = config.padding;
    let top_space = if labels.top.is_some() { config.label_space } else { 0.0 };
    let bottom_space = if labels.bottom.is_some() { config.label_space } else { 0.0 };

    let width = layout.width + 2.0 * p;
    let height = layout.height + 2.0 * p + top_space + bottom_space;
    let content_origin = Point::new(p, p + top_space);
    let cx = width / 2.0;

    let primitives = Composer::new(&config.glyph).compose(layout, content_origin);

    let mut placed = Vec::new();
    if let Some(text) = &labels.top {
        placed.push(PlacedLabel {
            text: text.clone(),
            anchor: Point::new(cx, p + LABEL_BASELINE),
            wire: Segment::new(
                Point::new(cx, p + LABEL_WIRE_START),
                Point::new(cx, content_origin.y),
            ),
        });
    }
    if let Some(text) = &labels.bottom {
        placed.push(PlacedLabel {
            text: text.clone(),
            anchor: Point::new(cx, height - p - LABEL_DESCENT),
            wire: Segment::new(
                Point::new(cx, content_origin.y + layout.height),
                Point::new(cx, height - p - LABEL_WIRE_START),
            ),
        });
    }

    let diagram = Diagram {
        title: title.into(),
        width,
        height,
        content_origin,
        primitives,
        labels: placed,
    };
    debug!(
        title = %diagram.title,
        width = diagram.width,
        height = diagram.height,
        glyphs = diagram.glyph_count(),
        wires = diagram.wire_count(),
        "rendered diagram"
    );
    diagram
}

/// Lay out and render one network.
pub fn render_network(
    title: impl Into<String>,
    network: &NetworkNode,
    labels: &RailLabels,
    config: &Config,
) -> Diagram {
    let layout = LayoutEngine::with_config(config.layout.clone()).layout(network);
    render_diagram(title, &layout, labels, &config.render)
}

/// The two panels of a CMOS gate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CmosDiagram {
    pub pun: Diagram,
    pub pdn: Diagram,
}

/// Lay out and render both networks of a CMOS gate.
pub fn render_cmos(network: &CmosNetwork, config: &Config) -> CmosDiagram {
    let (pun_labels, pdn_labels) = if config.render.rail_labels {
        (RailLabels::pull_up(), RailLabels::pull_down())
    } else {
        (RailLabels::default(), RailLabels::default())
    };
    CmosDiagram {
        pun: render_network("PUN", &network.pun, &pun_labels, config),
        pdn: render_network("PDN", &network.pdn, &pdn_labels, config),
    }
}
