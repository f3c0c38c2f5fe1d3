//! Core data model for mind-map documents.
//!
//! A document is a single tree of `MindNode` values hanging off a root with
//! the fixed id `root`. Children are reference-counted so an edit rebuilds
//! only the path from the root to the changed node and shares every
//! untouched sibling subtree with the previous version.

use crate::id::NodeId;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

// ─── Defaults ────────────────────────────────────────────────────────────

/// Text of the root node in a fresh document.
pub const DEFAULT_ROOT_TEXT: &str = "Main Topic";
/// Root color in a fresh document, also the fill for nodes without a color.
pub const DEFAULT_COLOR: &str = "#3b82f6";
/// Root position in a fresh document.
pub const DEFAULT_ROOT_POSITION: (f64, f64) = (400.0, 300.0);
/// Font size of the root node in a fresh document.
pub const DEFAULT_ROOT_FONT_SIZE: f64 = 16.0;
/// Font size used when a node carries none.
pub const DEFAULT_FONT_SIZE: f64 = 14.0;

// ─── Shape ───────────────────────────────────────────────────────────────

/// Outline drawn for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Rectangle,
    Ellipse,
    Diamond,
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::Rectangle, Shape::Ellipse, Shape::Diamond];

    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Rectangle => "rectangle",
            Shape::Ellipse => "ellipse",
            Shape::Diamond => "diamond",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

/// Unknown shape names decode as `Rectangle`, which is how they render.
impl<'de> Deserialize<'de> for Shape {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Shape::from_name(&name).unwrap_or_else(|| {
            log::debug!("unknown shape `{name}`, using rectangle");
            Shape::Rectangle
        }))
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

fn is_false(b: &bool) -> bool {
    !*b
}

/// Stored levels are advisory: any non-negative number is accepted and
/// the real depth is recomputed on load.
fn lenient_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = f64::deserialize(deserializer)?;
    if raw.is_finite() && raw >= 0.0 {
        Ok(raw.min(f64::from(u32::MAX)) as u32)
    } else {
        Ok(0)
    }
}

/// One topic in the mind map.
///
/// Field order is the canonical JSON key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindNode {
    pub id: NodeId,

    #[serde(default)]
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,

    /// Ordered children; the order drives the angle of newly added children.
    #[serde(default)]
    pub children: Vec<Arc<MindNode>>,

    /// Hides the subtree from flattening and rendering. The subtree is kept.
    #[serde(default, skip_serializing_if = "is_false")]
    pub collapsed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,

    #[serde(default)]
    pub shape: Shape,

    /// Depth from the root (root = 0).
    #[serde(default, deserialize_with = "lenient_level")]
    pub level: u32,
}

impl MindNode {
    pub fn new(id: NodeId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            x: None,
            y: None,
            children: Vec::new(),
            collapsed: false,
            color: None,
            font_size: None,
            shape: Shape::default(),
            level: 0,
        }
    }

    /// Position with missing coordinates read as 0.
    pub fn position(&self) -> (f64, f64) {
        (self.x.unwrap_or(0.0), self.y.unwrap_or(0.0))
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn font_size_or_default(&self) -> f64 {
        self.font_size.unwrap_or(DEFAULT_FONT_SIZE)
    }

    pub fn color_or_default(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_COLOR)
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|c| c.subtree_len())
            .sum::<usize>()
    }
}

// ─── Document ────────────────────────────────────────────────────────────

/// A mind-map document: an immutable tree addressed through its root.
///
/// Every edit in [`crate::ops`] returns a new `MindMap`; cloning is an
/// `Arc` bump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MindMap {
    root: Arc<MindNode>,
}

impl MindMap {
    pub fn new(root: MindNode) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    pub fn from_arc(root: Arc<MindNode>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &MindNode {
        &self.root
    }

    pub fn root_arc(&self) -> &Arc<MindNode> {
        &self.root
    }

    /// True when both documents are the very same tree (no edit happened
    /// between them).
    pub fn same_tree(&self, other: &MindMap) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    /// Recompute every `level` from the tree structure.
    /// Subtrees whose levels are already right are shared, not copied.
    #[must_use]
    pub fn relevel(&self) -> MindMap {
        match relevel_node(&self.root, 0) {
            Some(root) => MindMap::from_arc(root),
            None => self.clone(),
        }
    }
}

/// Returns `None` when the subtree already has correct levels.
fn relevel_node(node: &Arc<MindNode>, level: u32) -> Option<Arc<MindNode>> {
    let rebuilt: Vec<Option<Arc<MindNode>>> = node
        .children
        .iter()
        .map(|c| relevel_node(c, level + 1))
        .collect();
    if node.level == level && rebuilt.iter().all(Option::is_none) {
        return None;
    }
    let mut copy = MindNode::clone(node);
    copy.level = level;
    copy.children = rebuilt
        .into_iter()
        .zip(node.children.iter())
        .map(|(new, old)| new.unwrap_or_else(|| Arc::clone(old)))
        .collect();
    Some(Arc::new(copy))
}

impl Default for MindMap {
    /// The single-root document used for empty or unreadable content.
    fn default() -> Self {
        let mut root = MindNode::new(NodeId::root(), DEFAULT_ROOT_TEXT);
        root.x = Some(DEFAULT_ROOT_POSITION.0);
        root.y = Some(DEFAULT_ROOT_POSITION.1);
        root.color = Some(DEFAULT_COLOR.to_string());
        root.font_size = Some(DEFAULT_ROOT_FONT_SIZE);
        root.shape = Shape::Ellipse;
        MindMap::new(root)
    }
}
