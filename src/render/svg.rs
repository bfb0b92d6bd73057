//! SVG serialization of diagrams.

use std::fmt::Write;

use super::{CmosDiagram, Diagram, Point, Primitive, Segment, TransistorGlyph};

/// Height of the title band above each panel.
pub const TITLE_HEIGHT: f64 = 24.0;

/// Horizontal gap between the PUN and PDN panels.
pub const PANEL_GAP: f64 = 24.0;

const STYLES: &str = r#"
.cmos-wire, .cmos-glyph line { stroke: #000000; stroke-width: 2px; stroke-linecap: round; }
.cmos-glyph circle { stroke: #000000; stroke-width: 2px; fill: #ffffff; }
.cmos-label { font-family: sans-serif; font-size: 12px; font-weight: bold; fill: #000000; }
.cmos-rail { stroke: #374151; stroke-width: 2px; }
.cmos-rail-label { font-family: sans-serif; font-size: 12px; font-weight: bold; fill: #374151; text-anchor: middle; }
.cmos-title { font-family: sans-serif; font-size: 14px; font-weight: bold; fill: #111827; text-anchor: middle; }
"#;

/// Format a coordinate with at most two decimals.
pub fn fmt_num(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Escape text content for XML (inside elements)
pub fn escape_xml_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

fn line(svg: &mut String, seg: &Segment, class: Option<&str>) {
    let class = class.map(|c| format!(" class=\"{c}\"")).unwrap_or_default();
    // Writing into a String cannot fail
    let _ = write!(
        svg,
        "<line{class} x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"/>",
        fmt_num(seg.from.x),
        fmt_num(seg.from.y),
        fmt_num(seg.to.x),
        fmt_num(seg.to.y),
    );
}

fn text(svg: &mut String, at: Point, class: &str, body: &str) {
    let _ = write!(
        svg,
        "<text class=\"{class}\" x=\"{}\" y=\"{}\">{}</text>",
        fmt_num(at.x),
        fmt_num(at.y),
        escape_xml_text(body),
    );
}

fn glyph(svg: &mut String, g: &TransistorGlyph) {
    let device = g.device_type.to_string().to_lowercase();
    let _ = write!(svg, "<g class=\"cmos-glyph {device}\">");
    for seg in g.lines.segments() {
        line(svg, &seg, None);
    }
    if let Some(bubble) = g.bubble {
        let _ = write!(
            svg,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"/>",
            fmt_num(bubble.center.x),
            fmt_num(bubble.center.y),
            fmt_num(bubble.radius),
        );
    }
    text(svg, g.label_anchor, "cmos-label", &g.label);
    svg.push_str("</g>");
}

/// Append the body of a diagram (no `<svg>` wrapper) in its own coordinates.
fn diagram_body(svg: &mut String, diagram: &Diagram) {
    for primitive in &diagram.primitives {
        match primitive {
            Primitive::Wire(seg) => line(svg, seg, Some("cmos-wire")),
            Primitive::Transistor(g) => glyph(svg, g),
        }
    }
    for label in &diagram.labels {
        line(svg, &label.wire, Some("cmos-rail"));
        text(svg, label.anchor, "cmos-rail-label", &label.text);
    }
}

fn open_svg(svg: &mut String, width: f64, height: f64) {
    let (w, h) = (fmt_num(width), fmt_num(height));
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">"
    );
    svg.push_str("<style>");
    svg.push_str(STYLES);
    svg.push_str("</style>");
    let _ = write!(
        svg,
        "<rect width=\"{w}\" height=\"{h}\" fill=\"#ffffff\"/>"
    );
}

fn panel(svg: &mut String, diagram: &Diagram, dx: f64) {
    let _ = write!(svg, "<g transform=\"translate({},0)\">", fmt_num(dx));
    text(
        svg,
        Point::new(diagram.width / 2.0, TITLE_HEIGHT - 6.0),
        "cmos-title",
        &diagram.title,
    );
    let _ = write!(
        svg,
        "<g transform=\"translate(0,{})\">",
        fmt_num(TITLE_HEIGHT)
    );
    diagram_body(svg, diagram);
    svg.push_str("</g></g>");
}

/// Standalone SVG document for one diagram, with its title band.
pub fn to_svg(diagram: &Diagram) -> String {
    let mut svg = String::new();
    open_svg(&mut svg, diagram.width, diagram.height + TITLE_HEIGHT);
    panel(&mut svg, diagram, 0.0);
    svg.push_str("</svg>");
    svg
}

/// Standalone SVG document with the PUN and PDN panels side by side.
pub fn cmos_to_svg(diagram: &CmosDiagram) -> String {
    let width = diagram.pun.width + PANEL_GAP + diagram.pdn.width;
    let height = diagram.pun.height.max(diagram.pdn.height) + TITLE_HEIGHT;

    let mut svg = String::new();
    open_svg(&mut svg, width, height);
    panel(&mut svg, &diagram.pun, 0.0);
    panel(&mut svg, &diagram.pdn, diagram.pun.width + PANEL_GAP);
    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{CmosNetwork, DeviceType, NetworkNode};
    use crate::render::{render_cmos, render_network, RailLabels};
    use crate::Config;

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(60.0), "60");
        assert_eq!(fmt_num(12.5), "12.5");
        assert_eq!(fmt_num(1.0 / 3.0), "0.33");
        assert_eq!(fmt_num(-0.001), "0");
        assert_eq!(fmt_num(0.0), "0");
    }

    #[test]
    fn test_escape_xml_text() {
        assert_eq!(escape_xml_text("A & <B>"), "A &amp; &lt;B&gt;");
    }

    #[test]
    fn test_single_pmos_svg() {
        let net = NetworkNode::transistor("~A", DeviceType::Pmos);
        let diagram = render_network("PUN", &net, &RailLabels::default(), &Config::default());
        let svg = to_svg(&diagram);

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("viewBox=\"0 0 92 116\""));
        assert!(svg.contains("<g class=\"cmos-glyph pmos\">"));
        assert_eq!(svg.matches("<circle").count(), 1);
        assert!(svg.contains(">~A</text>"));
        assert!(svg.contains(">PUN</text>"));
        assert!(!svg.contains("class=\"cmos-wire\""));
    }

    #[test]
    fn test_label_is_escaped() {
        let net = NetworkNode::transistor("<A&B>", DeviceType::Nmos);
        let diagram = render_network("PDN", &net, &RailLabels::default(), &Config::default());
        let svg = to_svg(&diagram);
        assert!(svg.contains("&lt;A&amp;B&gt;"));
        assert!(!svg.contains("<A&B>"));
    }

    #[test]
    fn test_cmos_svg_has_both_panels() {
        let cmos = CmosNetwork {
            pun: NetworkNode::parallel(vec![
                NetworkNode::transistor("A", DeviceType::Pmos),
                NetworkNode::transistor("B", DeviceType::Pmos),
            ]),
            pdn: NetworkNode::series(vec![
                NetworkNode::transistor("A", DeviceType::Nmos),
                NetworkNode::transistor("B", DeviceType::Nmos),
            ]),
        };
        let svg = cmos_to_svg(&render_cmos(&cmos, &Config::default()));
        assert!(svg.contains(">PUN</text>"));
        assert!(svg.contains(">PDN</text>"));
        assert!(svg.contains(">VDD</text>"));
        assert!(svg.contains(">GND</text>"));
        // 6 PUN wires + 1 PDN wire
        assert_eq!(svg.matches("class=\"cmos-wire\"").count(), 7);
        assert_eq!(svg.matches("<circle").count(), 2);
        // PDN panel starts after the PUN panel and the gap
        assert!(svg.contains("translate(216,0)"));
    }
}
