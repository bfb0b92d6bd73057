//! Layout tree → primitive list.

use super::geometry::{transistor_glyph, GlyphConfig, Point, Segment};
use super::Primitive;
use crate::layout::LayoutNode;
use crate::network::NetworkNode;

/// Emits drawing primitives for a layout tree.
///
/// Positions come from the layout verbatim; the composer only adds the
/// wiring that each junction implies.
#[derive(Debug, Clone, Copy)]
pub struct Composer<'c> {
    glyph: &'c GlyphConfig,
}

impl<'c> Composer<'c> {
    /// Create a composer drawing glyphs with the given proportions.
    pub fn new(glyph: &'c GlyphConfig) -> Self {
        Self { glyph }
    }

    /// Primitives for `layout` with its frame placed at `origin`.
    pub fn compose(&self, layout: &LayoutNode<'_>, origin: Point) -> Vec<Primitive> {
        let mut out = Vec::new();
        self.emit(layout, origin, &mut out);
        out
    }

    fn emit(&self, layout: &LayoutNode<'_>, origin: Point, out: &mut Vec<Primitive>) {
        match layout.node {
            NetworkNode::Transistor(t) => out.push(Primitive::Transistor(transistor_glyph(
                origin,
                layout.width,
                layout.height,
                t,
                self.glyph,
            ))),

            NetworkNode::Series { .. } => {
                self.emit_children(layout, origin, out);

                let cx = layout.width / 2.0;
                for pair in layout.children.windows(2) {
                    out.push(Primitive::Wire(Segment::at(
                        origin,
                        cx,
                        pair[0].bottom(),
                        cx,
                        pair[1].y,
                    )));
                }
            }

            NetworkNode::Parallel { .. } => {
                if layout.children.is_empty() {
                    return;
                }
                self.emit_children(layout, origin, out);

                let (min_x, max_x) = rail_span(layout);
                let h = layout.height;
                out.push(Primitive::Wire(Segment::at(origin, min_x, 0.0, max_x, 0.0)));
                out.push(Primitive::Wire(Segment::at(origin, min_x, h, max_x, h)));

                for child in &layout.children {
                    let cx = child.center_x();
                    out.push(Primitive::Wire(Segment::at(origin, cx, 0.0, cx, child.y)));
                    out.push(Primitive::Wire(Segment::at(origin, cx, child.bottom(), cx, h)));
                }
            }
        }
    }

    fn emit_children(&self, layout: &LayoutNode<'_>, origin: Point, out: &mut Vec<Primitive>) {
        for child in &layout.children {
            self.emit(child, origin.offset(child.x, child.y), out);
        }
    }
}

/// Leftmost and rightmost child centerline of a block, in the block's frame.
///
/// Children may differ in width, so the rails follow the centerlines rather
/// than the bounding box.
pub fn rail_span(layout: &LayoutNode<'_>) -> (f64, f64) {
    layout
        .children
        .iter()
        .map(LayoutNode::center_x)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
            (lo.min(c), hi.max(c))
        })
}

/// Primitives for a layout tree rooted at the origin.
pub fn compose(layout: &LayoutNode<'_>, glyph: &GlyphConfig) -> Vec<Primitive> {
    Composer::new(glyph).compose(layout, Point::ORIGIN)
}
