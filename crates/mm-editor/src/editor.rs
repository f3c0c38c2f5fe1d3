//! The editor session: one tree, its store, selection, drag, inline text
//! editing, viewport and undo history.
//!
//! Pointer coordinates are surface coordinates; the viewport maps them to
//! world space before hit testing.

use crate::commands::CommandStack;
use crate::config::EditorConfig;
use crate::export::{ExportArtifact, ExportError, ExportFormat};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::sync::{ContentStatus, DocumentStore, Edit, EditResult, SyncEngine};
use crate::viewport::Viewport;
use kurbo::{Point, Vec2};
use mm_core::id::NodeId;
use mm_core::model::MindMap;
use mm_render::{HitPart, RenderTheme, SvgOptions, hit_test, render_png, render_svg};

/// Node text being edited in place.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEdit {
    pub id: NodeId,
    pub buffer: String,
}

/// An active node drag.
#[derive(Debug, Clone, Copy)]
struct DragState {
    id: NodeId,
    /// Pointer position minus node position at pointer-down.
    grab: Vec2,
}

/// Result of a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyOutcome {
    /// The key was bound; the host should suppress its default action.
    pub handled: bool,
    /// The document changed.
    pub changed: bool,
}

pub struct MindMapEditor<S: DocumentStore> {
    engine: SyncEngine<S>,
    commands: CommandStack,
    config: EditorConfig,
    viewport: Viewport,
    selected: Option<NodeId>,
    editing: Option<TextEdit>,
    drag: Option<DragState>,
}

impl<S: DocumentStore> MindMapEditor<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, EditorConfig::default())
    }

    pub fn with_config(store: S, config: EditorConfig) -> Self {
        Self {
            engine: SyncEngine::new(store),
            commands: CommandStack::new(config.history_depth),
            viewport: Viewport::new(&config),
            config,
            selected: None,
            editing: None,
            drag: None,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn tree(&self) -> &MindMap {
        self.engine.tree()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn editing(&self) -> Option<&TextEdit> {
        self.editing.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn status(&self) -> ContentStatus {
        self.engine.status()
    }

    pub fn store(&self) -> &S {
        self.engine.store()
    }

    /// Serialized form of the current tree.
    pub fn current_text(&mut self) -> String {
        self.engine.current_text().to_string()
    }

    pub fn set_current_version(&mut self, is_current: bool) {
        self.engine.is_current_version = is_current;
    }

    pub fn set_dark_mode(&mut self, dark: bool) {
        self.config.dark_mode = dark;
    }

    /// Select a node. Returns false when the id is not in the tree.
    pub fn select(&mut self, id: NodeId) -> bool {
        if !self.engine.tree().contains(id) {
            return false;
        }
        self.selected = Some(id);
        true
    }

    pub fn deselect(&mut self) -> bool {
        self.selected.take().is_some()
    }

    // ─── Store → Editor ──────────────────────────────────────────────────

    /// Take content from the host. Returns true when the tree was replaced.
    pub fn receive_content(&mut self, content: &str, status: ContentStatus) -> bool {
        if !self.engine.receive_content(content, status) {
            return false;
        }
        self.commands.clear();
        self.drag = None;
        self.editing = None;
        if let Some(id) = self.selected
            && !self.engine.tree().contains(id)
        {
            self.selected = None;
        }
        true
    }

    // ─── Structural edits ────────────────────────────────────────────────

    /// Add a child under `parent` and select it.
    pub fn add_child(&mut self, parent: NodeId) -> Option<NodeId> {
        let created = self.run(Edit::AddChild { parent }, "Add node").created;
        if created.is_some() {
            self.selected = created;
        }
        created
    }

    /// Delete a node and its subtree. Clears the selection.
    pub fn delete_node(&mut self, id: NodeId) -> bool {
        let changed = self.run(Edit::Delete { id }, "Delete node").changed;
        if changed {
            self.selected = None;
            if let Some(edit) = &self.editing
                && !self.engine.tree().contains(edit.id)
            {
                self.editing = None;
            }
        }
        changed
    }

    pub fn toggle_collapse(&mut self, id: NodeId) -> bool {
        self.run(Edit::ToggleCollapse { id }, "Toggle collapse").changed
    }

    pub fn rename_node(&mut self, id: NodeId, text: &str) -> bool {
        self.run(
            Edit::Rename {
                id,
                text: text.to_string(),
            },
            "Rename node",
        )
        .changed
    }

    pub fn move_node(&mut self, id: NodeId, x: f64, y: f64) -> bool {
        self.run(Edit::Move { id, x, y }, "Move node").changed
    }

    pub fn expand_all(&mut self) -> bool {
        self.run(Edit::ExpandAll, "Expand all").changed
    }

    pub fn collapse_all(&mut self) -> bool {
        self.run(Edit::CollapseAll, "Collapse all").changed
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    /// Pointer pressed at a surface point. Returns true when a re-render is
    /// needed.
    pub fn pointer_down(&mut self, sx: f64, sy: f64) -> bool {
        let committed = self.commit_edit();
        let world = self.viewport.to_world(sx, sy);
        match hit_test(self.engine.tree(), world) {
            Some(hit) if hit.part == HitPart::Toggle => self.toggle_collapse(hit.id) || committed,
            Some(hit) => {
                self.selected = Some(hit.id);
                if let Some(node) = self.engine.tree().find(hit.id) {
                    let (x, y) = node.position();
                    self.drag = Some(DragState {
                        id: hit.id,
                        grab: world - Point::new(x, y),
                    });
                    self.commands.begin_batch(&self.engine, "Move node");
                }
                true
            }
            None => self.deselect() || committed,
        }
    }

    /// Pointer moved. Drags the grabbed node without saving.
    pub fn pointer_move(&mut self, sx: f64, sy: f64) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        let target = self.viewport.to_world(sx, sy) - drag.grab;
        self.move_node(drag.id, target.x, target.y)
    }

    /// Pointer released. Commits an active drag as one undo step and one
    /// save. Returns true when a step was recorded.
    pub fn pointer_up(&mut self) -> bool {
        if self.drag.take().is_none() {
            return false;
        }
        self.commands.end_batch(&mut self.engine)
    }

    /// Abandon an active drag and restore the pre-drag tree.
    pub fn cancel_drag(&mut self) -> bool {
        if self.drag.take().is_none() {
            return false;
        }
        self.commands.abort_batch(&mut self.engine);
        true
    }

    /// Double click opens the inline editor on the node under the pointer.
    pub fn double_click(&mut self, sx: f64, sy: f64) -> bool {
        let world = self.viewport.to_world(sx, sy);
        match hit_test(self.engine.tree(), world) {
            Some(hit) if hit.part == HitPart::Body => self.begin_edit(hit.id),
            _ => false,
        }
    }

    // ─── Inline text editing ─────────────────────────────────────────────

    /// Start editing a node's text, seeded with its current text.
    pub fn begin_edit(&mut self, id: NodeId) -> bool {
        let Some(node) = self.engine.tree().find(id) else {
            return false;
        };
        self.editing = Some(TextEdit {
            id,
            buffer: node.text.clone(),
        });
        self.selected = Some(id);
        true
    }

    pub fn set_edit_text(&mut self, text: &str) {
        if let Some(edit) = &mut self.editing {
            edit.buffer.clear();
            edit.buffer.push_str(text);
        }
    }

    /// Write the buffer back through `rename_node`. Also used on blur.
    pub fn commit_edit(&mut self) -> bool {
        match self.editing.take() {
            Some(edit) => self.rename_node(edit.id, &edit.buffer),
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) -> bool {
        self.editing.take().is_some()
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> KeyOutcome {
        if self.editing.is_some() {
            return match key {
                "Enter" => KeyOutcome {
                    handled: true,
                    changed: self.commit_edit(),
                },
                "Escape" => {
                    self.cancel_edit();
                    KeyOutcome {
                        handled: true,
                        changed: false,
                    }
                }
                _ => KeyOutcome::default(),
            };
        }

        match ShortcutMap::resolve(key, ctrl, shift, alt, meta) {
            Some(action) => KeyOutcome {
                handled: true,
                changed: self.dispatch_action(action),
            },
            None => KeyOutcome::default(),
        }
    }

    /// Run a shortcut action. Returns true when the document changed.
    pub fn dispatch_action(&mut self, action: ShortcutAction) -> bool {
        match action {
            ShortcutAction::AddChild => match self.selected {
                Some(id) => self.add_child(id).is_some(),
                None => false,
            },
            ShortcutAction::Delete => match self.selected {
                Some(id) => self.delete_node(id),
                None => false,
            },
            ShortcutAction::ToggleCollapse => match self.selected {
                Some(id) => self.toggle_collapse(id),
                None => false,
            },
            ShortcutAction::Rename => {
                if let Some(id) = self.selected {
                    self.begin_edit(id);
                }
                false
            }
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::ExpandAll => self.expand_all(),
            ShortcutAction::CollapseAll => self.collapse_all(),
            ShortcutAction::ZoomIn => {
                self.viewport.zoom_in();
                false
            }
            ShortcutAction::ZoomOut => {
                self.viewport.zoom_out();
                false
            }
            ShortcutAction::ResetView => {
                self.viewport.reset();
                false
            }
            ShortcutAction::Deselect => {
                self.deselect();
                false
            }
        }
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        if self.drag.is_some() {
            return false;
        }
        self.editing = None;
        let undone = self.commands.undo(&mut self.engine);
        if let Some(desc) = &undone {
            log::debug!("undo: {desc}");
            self.drop_stale_selection();
        }
        undone.is_some()
    }

    pub fn redo(&mut self) -> bool {
        if self.drag.is_some() {
            return false;
        }
        self.editing = None;
        let redone = self.commands.redo(&mut self.engine);
        if let Some(desc) = &redone {
            log::debug!("redo: {desc}");
            self.drop_stale_selection();
        }
        redone.is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.commands.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.commands.can_redo()
    }

    // ─── Rendering & export ──────────────────────────────────────────────

    pub fn svg_options(&self) -> SvgOptions {
        SvgOptions {
            view_box: self.viewport.view_box(),
            selected: self.selected,
            theme: RenderTheme::for_mode(self.config.dark_mode),
        }
    }

    /// The current view as SVG.
    pub fn render_svg(&self) -> String {
        render_svg(self.engine.tree(), &self.svg_options())
    }

    /// Export the current view. Never touches the tree or the store.
    ///
    /// # Errors
    /// Returns `ExportError::Render` when PNG rasterization fails.
    pub fn export(&self, format: ExportFormat) -> Result<ExportArtifact, ExportError> {
        let options = self.svg_options();
        let artifact = match format {
            ExportFormat::Svg => ExportArtifact::Svg(render_svg(self.engine.tree(), &options)),
            ExportFormat::Png => ExportArtifact::Png(render_png(
                self.engine.tree(),
                &options,
                self.config.export_width,
                self.config.export_height,
            )?),
        };
        log::debug!("exported {format} ({} bytes)", artifact.as_bytes().len());
        Ok(artifact)
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn run(&mut self, edit: Edit, description: &str) -> EditResult {
        let result = self
            .commands
            .execute(&mut self.engine, &edit, &self.config.layout, description);
        if result.changed && !self.commands.in_batch() {
            log::debug!("{description}: {} nodes", self.engine.tree().len());
        }
        result
    }

    fn drop_stale_selection(&mut self) {
        if let Some(id) = self.selected
            && !self.engine.tree().contains(id)
        {
            self.selected = None;
        }
    }
}
