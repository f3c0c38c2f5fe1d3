//! SVG scene for a mind map: the vector export and the input of the PNG
//! rasterizer.
//!
//! Connections are painted first, then visible nodes in flatten order so a
//! later sibling draws over an earlier one.

use crate::geometry::{
    DIAMOND_HALF, ELLIPSE_RADII, RECT_CORNER_RADIUS, RECT_HALF, TOGGLE_OFFSET, TOGGLE_RADIUS,
};
use crate::theme::RenderTheme;
use mm_core::id::NodeId;
use mm_core::model::{MindMap, MindNode, Shape};

/// Visible world rectangle, as an SVG `viewBox`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for ViewBox {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SvgOptions {
    pub view_box: ViewBox,
    pub selected: Option<NodeId>,
    pub theme: RenderTheme,
}

pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render the visible part of `tree` as a standalone SVG document.
pub fn render_svg(tree: &MindMap, options: &SvgOptions) -> String {
    let vb = options.view_box;
    let theme = &options.theme;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"{} {} {} {}\">\n",
        vb.width, vb.height, vb.x, vb.y, vb.width, vb.height
    ));
    svg.push_str("<style>\n");
    svg.push_str("  text { font-family: Inter, system-ui, sans-serif; }\n");
    svg.push_str("</style>\n");

    svg.push_str("<g class=\"connections\">\n");
    for conn in tree.connections() {
        let (x1, y1) = conn.from.position();
        let (x2, y2) = conn.to.position();
        svg.push_str(&format!(
            "  <line x1=\"{x1}\" y1=\"{y1}\" x2=\"{x2}\" y2=\"{y2}\" stroke=\"{}\" stroke-width=\"2\" opacity=\"0.6\" />\n",
            theme.connection
        ));
    }
    svg.push_str("</g>\n");

    svg.push_str("<g class=\"nodes\">\n");
    for flat in tree.flatten() {
        let selected = options.selected == Some(flat.node.id);
        render_node_svg(&mut svg, flat.node, selected, theme);
    }
    svg.push_str("</g>\n</svg>\n");
    svg
}

fn render_node_svg(out: &mut String, node: &MindNode, selected: bool, theme: &RenderTheme) {
    let (x, y) = node.position();
    let fill = escape_xml(node.color_or_default());
    let stroke = if selected { theme.selection } else { "transparent" };

    out.push_str(&format!(
        "  <g data-id=\"{}\" transform=\"translate({x}, {y})\">\n",
        escape_xml(node.id.as_str())
    ));
    out.push_str(&shape_svg(node.shape, &fill, stroke));
    out.push_str(&format!(
        "    <text text-anchor=\"middle\" dy=\"0.35em\" fill=\"{}\" font-size=\"{}\" font-weight=\"600\">{}</text>\n",
        theme.node_text,
        node.font_size_or_default(),
        escape_xml(&node.text)
    ));

    if node.has_children() {
        let (tx, ty) = TOGGLE_OFFSET;
        let glyph = if node.collapsed { "+" } else { "\u{2212}" };
        out.push_str(&format!(
            "    <circle class=\"toggle\" cx=\"{tx}\" cy=\"{ty}\" r=\"{TOGGLE_RADIUS}\" fill=\"{}\" stroke=\"{fill}\" stroke-width=\"2\" />\n",
            theme.toggle_fill
        ));
        out.push_str(&format!(
            "    <text x=\"{tx}\" y=\"{ty}\" text-anchor=\"middle\" dy=\"0.35em\" font-size=\"10\" fill=\"{}\">{glyph}</text>\n",
            theme.toggle_text
        ));
    }
    out.push_str("  </g>\n");
}

/// One outline element, centered on the origin of the node group.
fn shape_svg(shape: Shape, fill: &str, stroke: &str) -> String {
    match shape {
        Shape::Rectangle => {
            let (hw, hh) = RECT_HALF;
            format!(
                "    <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{RECT_CORNER_RADIUS}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"3\" opacity=\"0.8\" />\n",
                -hw,
                -hh,
                hw * 2.0,
                hh * 2.0
            )
        }
        Shape::Ellipse => {
            let (rx, ry) = ELLIPSE_RADII;
            format!(
                "    <ellipse rx=\"{rx}\" ry=\"{ry}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"3\" opacity=\"0.8\" />\n"
            )
        }
        Shape::Diamond => {
            let (hw, hh) = DIAMOND_HALF;
            format!(
                "    <polygon points=\"{},0 0,{} {hw},0 0,{hh}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"3\" opacity=\"0.8\" />\n",
                -hw, -hh
            )
        }
    }
}
