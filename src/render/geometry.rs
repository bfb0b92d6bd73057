//! Transistor glyph and wire geometry.
//!
//! A glyph is generated in its own frame (origin at the top-left of the
//! transistor footprint) and then shifted to its global origin:
//!
//! ```text
//!             │          top terminal
//!          ┃  │
//!   ───o───┨  │          gate lead, bubble (PMOS), plate, channel
//!          ┃  │
//!             │          bottom terminal
//! ```

use serde::{Deserialize, Serialize};

use crate::network::{DeviceType, Transistor};

/// Length of the channel and gate plate.
pub const DEFAULT_CHANNEL_LENGTH: f64 = 20.0;

/// Horizontal gap between the gate plate and the channel.
pub const DEFAULT_GATE_GAP: f64 = 8.0;

/// Distance from the gate plate to the PMOS bubble center.
pub const DEFAULT_BUBBLE_OFFSET: f64 = 5.0;

/// PMOS bubble radius.
pub const DEFAULT_BUBBLE_RADIUS: f64 = 3.0;

/// Height of the label baseline above the gate lead.
pub const DEFAULT_LABEL_RISE: f64 = 10.0;

/// A point in diagram coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The diagram origin, top left.
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    /// Create a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This point shifted by `(dx, dy)`.
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A straight segment between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

impl Segment {
    /// Create a segment from `from` to `to`.
    pub fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }

    /// Segment from `(x1, y1)` to `(x2, y2)` in the frame whose origin is `origin`.
    pub fn at(origin: Point, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            from: origin.offset(x1, y1),
            to: origin.offset(x2, y2),
        }
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        (self.to.x - self.from.x).hypot(self.to.y - self.from.y)
    }

    /// Whether both ends share an x coordinate.
    pub fn is_vertical(&self) -> bool {
        self.from.x == self.to.x
    }

    /// Whether both ends share a y coordinate.
    pub fn is_horizontal(&self) -> bool {
        self.from.y == self.to.y
    }
}

/// A circle outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

/// Proportions of the transistor glyph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlyphConfig {
    pub channel_length: f64,
    pub gate_gap: f64,
    pub bubble_offset: f64,
    pub bubble_radius: f64,
    pub label_rise: f64,
}

impl Default for GlyphConfig {
    fn default() -> Self {
        Self {
            channel_length: DEFAULT_CHANNEL_LENGTH,
            gate_gap: DEFAULT_GATE_GAP,
            bubble_offset: DEFAULT_BUBBLE_OFFSET,
            bubble_radius: DEFAULT_BUBBLE_RADIUS,
            label_rise: DEFAULT_LABEL_RISE,
        }
    }
}

impl GlyphConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the channel line length.
    pub fn with_channel_length(mut self, length: f64) -> Self {
        self.channel_length = length;
        self
    }

    /// Set the gap between the gate plate and the channel.
    pub fn with_gate_gap(mut self, gap: f64) -> Self {
        self.gate_gap = gap;
        self
    }
}

/// The line work of one transistor glyph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GlyphLines {
    pub top_terminal: Segment,
    pub bottom_terminal: Segment,
    pub channel: Segment,
    pub gate_plate: Segment,
    pub gate_lead: Segment,
}

impl GlyphLines {
    /// All segments in drawing order.
    pub fn segments(&self) -> [Segment; 5] {
        [
            self.top_terminal,
            self.bottom_terminal,
            self.gate_plate,
            self.channel,
            self.gate_lead,
        ]
    }
}

/// A positioned transistor symbol with its label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransistorGlyph {
    /// Top-left corner of the footprint
    pub origin: Point,
    pub width: f64,
    pub height: f64,
    pub device_type: DeviceType,
    /// Gate signal label
    pub label: String,
    /// Baseline start of the label text
    pub label_anchor: Point,
    pub lines: GlyphLines,
    /// Active-low marker, PMOS only
    pub bubble: Option<Circle>,
}

/// Generate the glyph for `transistor` in a `width` × `height` footprint at `origin`.
pub fn transistor_glyph(
    origin: Point,
    width: f64,
    height: f64,
    transistor: &Transistor,
    config: &GlyphConfig,
) -> TransistorGlyph {
    let cx = width / 2.0;
    let cy = height / 2.0;
    let channel = config.channel_length.min(height);
    let terminal = (height - channel) / 2.0;
    let plate_x = cx - config.gate_gap;

    let lines = GlyphLines {
        top_terminal: Segment::at(origin, cx, 0.0, cx, terminal),
        bottom_terminal: Segment::at(origin, cx, height, cx, height - terminal),
        channel: Segment::at(origin, cx, terminal, cx, height - terminal),
        gate_plate: Segment::at(origin, plate_x, terminal, plate_x, height - terminal),
        gate_lead: Segment::at(origin, plate_x, cy, 0.0, cy),
    };

    let bubble = transistor.device_type.is_pmos().then(|| Circle {
        center: origin.offset(plate_x - config.bubble_offset, cy),
        radius: config.bubble_radius,
    });

    TransistorGlyph {
        origin,
        width,
        height,
        device_type: transistor.device_type,
        label: transistor.name.clone(),
        label_anchor: origin.offset(0.0, cy - config.label_rise),
        lines,
        bubble,
    }
}
