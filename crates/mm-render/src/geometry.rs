//! Node outlines in world coordinates.
//!
//! Every node is drawn centered on its position. The outline is chosen by
//! its `Shape`; nodes with children also carry a collapse toggle on their
//! right-hand side.

use kurbo::{BezPath, Circle, Ellipse, Point, Rect, RoundedRect, Shape as _};
use mm_core::model::{MindNode, Shape};

/// Half extents of the rectangle outline.
pub const RECT_HALF: (f64, f64) = (60.0, 20.0);
pub const RECT_CORNER_RADIUS: f64 = 8.0;
pub const ELLIPSE_RADII: (f64, f64) = (60.0, 30.0);
/// Half diagonals of the diamond outline.
pub const DIAMOND_HALF: (f64, f64) = (50.0, 25.0);
/// Toggle center, relative to the node center.
pub const TOGGLE_OFFSET: (f64, f64) = (45.0, 0.0);
pub const TOGGLE_RADIUS: f64 = 8.0;

/// The outline of one node, positioned in world space.
#[derive(Debug, Clone)]
pub enum Outline {
    Rect(RoundedRect),
    Ellipse(Ellipse),
    Diamond(BezPath),
}

impl Outline {
    pub fn for_node(node: &MindNode) -> Self {
        let center = node_center(node);
        match node.shape {
            Shape::Rectangle => {
                let rect = Rect::from_center_size(center, (RECT_HALF.0 * 2.0, RECT_HALF.1 * 2.0));
                Outline::Rect(RoundedRect::from_rect(rect, RECT_CORNER_RADIUS))
            }
            Shape::Ellipse => Outline::Ellipse(Ellipse::new(center, ELLIPSE_RADII, 0.0)),
            Shape::Diamond => {
                let (hw, hh) = DIAMOND_HALF;
                let mut path = BezPath::new();
                path.move_to((center.x - hw, center.y));
                path.line_to((center.x, center.y - hh));
                path.line_to((center.x + hw, center.y));
                path.line_to((center.x, center.y + hh));
                path.close_path();
                Outline::Diamond(path)
            }
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        match self {
            Outline::Rect(r) => r.contains(point),
            Outline::Ellipse(e) => e.contains(point),
            Outline::Diamond(p) => p.contains(point),
        }
    }

    pub fn bounding_box(&self) -> Rect {
        match self {
            Outline::Rect(r) => r.bounding_box(),
            Outline::Ellipse(e) => e.bounding_box(),
            Outline::Diamond(p) => p.bounding_box(),
        }
    }
}

pub fn node_center(node: &MindNode) -> Point {
    let (x, y) = node.position();
    Point::new(x, y)
}

/// The collapse toggle, present only on nodes that have children.
pub fn toggle_circle(node: &MindNode) -> Option<Circle> {
    if !node.has_children() {
        return None;
    }
    let c = node_center(node);
    Some(Circle::new(
        (c.x + TOGGLE_OFFSET.0, c.y + TOGGLE_OFFSET.1),
        TOGGLE_RADIUS,
    ))
}

/// Union of the outlines of all given nodes, or `None` for no nodes.
pub fn union_bounds<'a>(nodes: impl IntoIterator<Item = &'a MindNode>) -> Option<Rect> {
    nodes
        .into_iter()
        .map(|n| Outline::for_node(n).bounding_box())
        .reduce(|a, b| a.union(b))
}
