//! Sync engine: external document store ↔ in-memory mind map.
//!
//! - **Store → Tree**: content arriving from the store (or from a generator
//!   that is still streaming) replaces the local tree. While streaming,
//!   every update wins. Once idle, only content that differs from what was
//!   last received or last saved is loaded.
//!
//! - **Tree → Store**: every edit that changes the tree is serialized and
//!   handed to the store. Drag frames are applied with `apply_deferred`
//!   and saved once by `flush`.

use mm_core::codec::{deserialize, serialize};
use mm_core::id::NodeId;
use mm_core::model::MindMap;
use mm_core::LayoutConfig;

/// Persistence callback owned by the host.
pub trait DocumentStore {
    fn save(&mut self, content: &str, is_current_version: bool);
}

impl<F: FnMut(&str, bool)> DocumentStore for F {
    fn save(&mut self, content: &str, is_current_version: bool) {
        self(content, is_current_version);
    }
}

/// Whether an external generator is still producing the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentStatus {
    Streaming,
    #[default]
    Idle,
}

impl ContentStatus {
    /// `"streaming"` maps to `Streaming`; anything else is `Idle`.
    pub fn from_name(name: &str) -> Self {
        if name == "streaming" {
            ContentStatus::Streaming
        } else {
            ContentStatus::Idle
        }
    }
}

/// A structural edit, as issued by the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    AddChild { parent: NodeId },
    Delete { id: NodeId },
    ToggleCollapse { id: NodeId },
    Rename { id: NodeId, text: String },
    Move { id: NodeId, x: f64, y: f64 },
    ExpandAll,
    CollapseAll,
}

impl Edit {
    /// Apply to `tree`. The second value is the id of a node created by
    /// `AddChild`.
    pub fn apply(&self, tree: &MindMap, layout: &LayoutConfig) -> (MindMap, Option<NodeId>) {
        match self {
            Edit::AddChild { parent } => tree.add_child_with(*parent, layout),
            Edit::Delete { id } => (tree.delete_node(*id), None),
            Edit::ToggleCollapse { id } => (tree.toggle_collapse(*id), None),
            Edit::Rename { id, text } => (tree.rename_node(*id, text), None),
            Edit::Move { id, x, y } => (tree.move_node(*id, *x, *y), None),
            Edit::ExpandAll => (tree.expand_all(), None),
            Edit::CollapseAll => (tree.collapse_all(), None),
        }
    }
}

/// What an edit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditResult {
    pub changed: bool,
    pub created: Option<NodeId>,
}

/// Holds the authoritative tree and keeps the store in sync with it.
pub struct SyncEngine<S: DocumentStore> {
    tree: MindMap,

    /// Serialized form of `tree`; stale while `text_dirty`.
    text: String,
    text_dirty: bool,

    /// Set by deferred edits, cleared by `flush`.
    save_pending: bool,

    last_received: Option<String>,
    status: ContentStatus,

    /// Passed through to every save.
    pub is_current_version: bool,

    store: S,
}

impl<S: DocumentStore> SyncEngine<S> {
    /// Start from the default single-root document.
    pub fn new(store: S) -> Self {
        let tree = MindMap::default();
        let text = serialize(&tree);
        Self {
            tree,
            text,
            text_dirty: false,
            save_pending: false,
            last_received: None,
            status: ContentStatus::Idle,
            is_current_version: true,
            store,
        }
    }

    /// Start from store content. Nothing is saved.
    pub fn from_content(content: &str, status: ContentStatus, store: S) -> Self {
        let mut engine = Self::new(store);
        engine.receive_content(content, status);
        engine
    }

    pub fn tree(&self) -> &MindMap {
        &self.tree
    }

    pub fn status(&self) -> ContentStatus {
        self.status
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Serialized form of the current tree.
    pub fn current_text(&mut self) -> &str {
        if self.text_dirty {
            self.text = serialize(&self.tree);
            self.text_dirty = false;
        }
        &self.text
    }

    // ─── Store → Tree ────────────────────────────────────────────────────

    /// Take content from the store. Returns true when the local tree was
    /// replaced. Never saves.
    pub fn receive_content(&mut self, content: &str, status: ContentStatus) -> bool {
        self.status = status;
        if status == ContentStatus::Idle {
            let seen = self.last_received.as_deref() == Some(content);
            let echo = !self.text_dirty && self.text == content;
            if seen || echo {
                self.last_received = Some(content.to_string());
                return false;
            }
        }
        self.last_received = Some(content.to_string());
        self.tree = deserialize(content);
        self.text = serialize(&self.tree);
        self.text_dirty = false;
        self.save_pending = false;
        log::debug!(
            "loaded mind map ({} nodes, {:?})",
            self.tree.len(),
            self.status
        );
        true
    }

    // ─── Tree → Store ────────────────────────────────────────────────────

    /// Apply an edit and save if it changed the tree.
    pub fn apply_edit(&mut self, edit: &Edit, layout: &LayoutConfig) -> EditResult {
        let result = self.apply_deferred(edit, layout);
        self.flush();
        result
    }

    /// Apply an edit without saving. `flush` saves the accumulated change.
    pub fn apply_deferred(&mut self, edit: &Edit, layout: &LayoutConfig) -> EditResult {
        let (next, created) = edit.apply(&self.tree, layout);
        if next.same_tree(&self.tree) {
            log::debug!("edit {edit:?} changed nothing");
            return EditResult::default();
        }
        self.tree = next;
        self.text_dirty = true;
        self.save_pending = true;
        EditResult {
            changed: true,
            created,
        }
    }

    /// Save if deferred edits are pending. Returns true when it saved.
    pub fn flush(&mut self) -> bool {
        if !self.save_pending {
            return false;
        }
        self.save_pending = false;
        let is_current = self.is_current_version;
        let text = self.current_text().to_string();
        self.store.save(&text, is_current);
        true
    }

    /// Replace the tree (undo/redo) and save when it differs.
    pub fn set_tree(&mut self, tree: MindMap) -> bool {
        if tree.same_tree(&self.tree) {
            return false;
        }
        self.tree = tree;
        self.text_dirty = true;
        self.save_pending = true;
        self.flush()
    }

    /// Put back a tree that was never saved away (cancelled drag).
    pub fn restore(&mut self, tree: MindMap) {
        self.tree = tree;
        self.text_dirty = true;
        self.save_pending = false;
    }
}
