//! Hit testing: world point → node lookup.
//!
//! Walks the visible nodes back to front (last painted = topmost). Within
//! one node the collapse toggle sits above the outline.

use crate::geometry::{Outline, toggle_circle};
use kurbo::{Point, Shape as _};
use mm_core::id::NodeId;
use mm_core::model::MindMap;

/// Which part of a node was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    Toggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub id: NodeId,
    pub part: HitPart,
}

/// Find the topmost visible node at `point`, or `None` for background.
pub fn hit_test(tree: &MindMap, point: Point) -> Option<Hit> {
    for flat in tree.flatten().iter().rev() {
        let node = flat.node;
        if toggle_circle(node).is_some_and(|c| c.contains(point)) {
            return Some(Hit {
                id: node.id,
                part: HitPart::Toggle,
            });
        }
        if Outline::for_node(node).contains(point) {
            return Some(Hit {
                id: node.id,
                part: HitPart::Body,
            });
        }
    }
    None
}
