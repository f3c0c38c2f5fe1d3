//! Tree queries and pure structural edits.
//!
//! Every edit takes `&MindMap` and returns a new `MindMap`. Only the nodes
//! on the path from the root to the edited node are rebuilt; every other
//! subtree is shared. An edit that matches nothing (unknown id, root
//! deletion, a rename to the same text) returns the input tree itself,
//! which callers detect with [`MindMap::same_tree`].

use crate::config::LayoutConfig;
use crate::id::NodeId;
use crate::model::{MindMap, MindNode};
use std::collections::HashSet;
use std::sync::Arc;

/// A visible node in render order, with its depth from the root.
#[derive(Debug, Clone, Copy)]
pub struct FlatNode<'a> {
    pub node: &'a MindNode,
    pub level: u32,
}

/// A visible parent → child link.
#[derive(Debug, Clone, Copy)]
pub struct Connection<'a> {
    pub from: &'a MindNode,
    pub to: &'a MindNode,
}

// ─── Queries ─────────────────────────────────────────────────────────────

impl MindMap {
    /// Pre-order list of visible nodes. Children of a collapsed node are
    /// skipped; the collapsed node itself is listed.
    pub fn flatten(&self) -> Vec<FlatNode<'_>> {
        fn walk<'a>(node: &'a MindNode, level: u32, out: &mut Vec<FlatNode<'a>>) {
            out.push(FlatNode { node, level });
            if !node.collapsed {
                for child in &node.children {
                    walk(child, level + 1, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(self.root(), 0, &mut out);
        out
    }

    /// Parent → child pairs inside non-collapsed subtrees, in pre-order.
    pub fn connections(&self) -> Vec<Connection<'_>> {
        fn walk<'a>(node: &'a MindNode, out: &mut Vec<Connection<'a>>) {
            if node.collapsed {
                return;
            }
            for child in &node.children {
                out.push(Connection {
                    from: node,
                    to: child,
                });
                walk(child, out);
            }
        }
        let mut out = Vec::new();
        walk(self.root(), &mut out);
        out
    }

    /// Every node in pre-order, collapsed subtrees included.
    pub fn nodes(&self) -> Vec<&MindNode> {
        fn walk<'a>(node: &'a MindNode, out: &mut Vec<&'a MindNode>) {
            out.push(node);
            for child in &node.children {
                walk(child, out);
            }
        }
        let mut out = Vec::new();
        walk(self.root(), &mut out);
        out
    }

    /// First node with `id` in pre-order.
    pub fn find(&self, id: NodeId) -> Option<&MindNode> {
        fn walk(node: &MindNode, id: NodeId) -> Option<&MindNode> {
            if node.id == id {
                return Some(node);
            }
            node.children.iter().find_map(|c| walk(c, id))
        }
        walk(self.root(), id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.find(id).is_some()
    }

    pub fn parent_of(&self, id: NodeId) -> Option<&MindNode> {
        fn walk(node: &MindNode, id: NodeId) -> Option<&MindNode> {
            if node.children.iter().any(|c| c.id == id) {
                return Some(node);
            }
            node.children.iter().find_map(|c| walk(c, id))
        }
        walk(self.root(), id)
    }

    pub fn ids(&self) -> HashSet<NodeId> {
        self.nodes().into_iter().map(|n| n.id).collect()
    }

    /// Total node count, collapsed subtrees included.
    pub fn len(&self) -> usize {
        self.root().subtree_len()
    }

    /// Always false: a document has at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }
}

// ─── Edits ───────────────────────────────────────────────────────────────

impl MindMap {
    /// Append a child with default placement. Unknown parent: unchanged tree.
    #[must_use]
    pub fn add_child(&self, parent: NodeId) -> MindMap {
        self.add_child_with(parent, &LayoutConfig::default()).0
    }

    /// Append a child using `config`, returning the new tree and the id of
    /// the inserted node (`None` when `parent` does not exist).
    #[must_use]
    pub fn add_child_with(&self, parent: NodeId, config: &LayoutConfig) -> (MindMap, Option<NodeId>) {
        if !self.contains(parent) {
            log::debug!("add_child: no node {parent}");
            return (self.clone(), None);
        }
        let taken = self.ids();
        let new_id = NodeId::fresh(|id| taken.contains(&id));

        let tree = self.edit_node(parent, |p| {
            let index = p.children.len();
            let (px, py) = p.position();
            let (dx, dy) = config.child_offset(index);

            let mut child = MindNode::new(new_id, config.text.clone());
            child.x = Some(px + dx);
            child.y = Some(py + dy);
            child.color = config.color_for(p.level, index);
            child.font_size = Some(config.font_size);
            child.shape = config.shape;
            child.level = p.level + 1;

            p.children.push(Arc::new(child));
            p.collapsed = false;
            true
        });
        log::debug!("add_child: {new_id} under {parent}");
        (tree, Some(new_id))
    }

    /// Remove a node and its whole subtree. The root is never removed.
    #[must_use]
    pub fn delete_node(&self, id: NodeId) -> MindMap {
        if id.is_root() {
            log::debug!("delete_node: refusing to delete the root");
            return self.clone();
        }
        match prune(self.root_arc(), id) {
            Some(root) => MindMap::from_arc(root),
            None => {
                log::debug!("delete_node: no node {id}");
                self.clone()
            }
        }
    }

    /// Flip `collapsed` on one node; descendants keep their own flags.
    #[must_use]
    pub fn toggle_collapse(&self, id: NodeId) -> MindMap {
        self.edit_node(id, |n| {
            n.collapsed = !n.collapsed;
            true
        })
    }

    #[must_use]
    pub fn rename_node(&self, id: NodeId, text: &str) -> MindMap {
        self.edit_node(id, |n| {
            if n.text == text {
                return false;
            }
            n.text = text.to_string();
            true
        })
    }

    /// Set the position of one node; its children do not follow.
    #[must_use]
    pub fn move_node(&self, id: NodeId, x: f64, y: f64) -> MindMap {
        self.edit_node(id, |n| {
            if n.x == Some(x) && n.y == Some(y) {
                return false;
            }
            n.x = Some(x);
            n.y = Some(y);
            true
        })
    }

    #[must_use]
    pub fn expand_all(&self) -> MindMap {
        self.set_collapsed_where(&|_| false)
    }

    /// Collapse every node except the root.
    #[must_use]
    pub fn collapse_all(&self) -> MindMap {
        self.set_collapsed_where(&|n| !n.id.is_root())
    }

    /// Rebuild the path to the first node with `id` and let `edit` change
    /// it. `edit` returns false to report that nothing changed.
    fn edit_node(&self, id: NodeId, mut edit: impl FnMut(&mut MindNode) -> bool) -> MindMap {
        match rewrite(self.root_arc(), id, &mut edit) {
            Some(root) => MindMap::from_arc(root),
            None => self.clone(),
        }
    }

    fn set_collapsed_where(&self, pred: &dyn Fn(&MindNode) -> bool) -> MindMap {
        match set_collapsed(self.root_arc(), pred) {
            Some(root) => MindMap::from_arc(root),
            None => self.clone(),
        }
    }
}

fn rewrite(
    node: &Arc<MindNode>,
    id: NodeId,
    edit: &mut dyn FnMut(&mut MindNode) -> bool,
) -> Option<Arc<MindNode>> {
    if node.id == id {
        let mut copy = MindNode::clone(node);
        return edit(&mut copy).then(|| Arc::new(copy));
    }
    for (i, child) in node.children.iter().enumerate() {
        if let Some(new_child) = rewrite(child, id, edit) {
            let mut copy = MindNode::clone(node);
            copy.children[i] = new_child;
            return Some(Arc::new(copy));
        }
    }
    None
}

/// Drop every child with `id` anywhere below `node`.
fn prune(node: &Arc<MindNode>, id: NodeId) -> Option<Arc<MindNode>> {
    let mut changed = false;
    let mut kept = Vec::with_capacity(node.children.len());
    for child in &node.children {
        if child.id == id {
            changed = true;
            continue;
        }
        match prune(child, id) {
            Some(new_child) => {
                changed = true;
                kept.push(new_child);
            }
            None => kept.push(Arc::clone(child)),
        }
    }
    if !changed {
        return None;
    }
    let mut copy = MindNode::clone(node);
    copy.children = kept;
    Some(Arc::new(copy))
}

fn set_collapsed(node: &Arc<MindNode>, pred: &dyn Fn(&MindNode) -> bool) -> Option<Arc<MindNode>> {
    let want = pred(node);
    let rebuilt: Vec<Option<Arc<MindNode>>> =
        node.children.iter().map(|c| set_collapsed(c, pred)).collect();
    if node.collapsed == want && rebuilt.iter().all(Option::is_none) {
        return None;
    }
    let mut copy = MindNode::clone(node);
    copy.collapsed = want;
    copy.children = rebuilt
        .into_iter()
        .zip(node.children.iter())
        .map(|(new, old)| new.unwrap_or_else(|| Arc::clone(old)))
        .collect();
    Some(Arc::new(copy))
}
