//! Undo/Redo command stack.
//!
//! Trees are immutable and share structure, so every command is a pair of
//! snapshots: undo puts `before` back, redo puts `after` back.
//!
//! Drag gestures are batched: the tree is captured when the gesture
//! starts, every frame is applied without saving, and the closing
//! `end_batch` saves once and records a single undo step.

use crate::sync::{DocumentStore, Edit, EditResult, SyncEngine};
use mm_core::LayoutConfig;
use mm_core::model::MindMap;

/// One undoable step.
#[derive(Debug, Clone)]
pub struct Command {
    pub before: MindMap,
    pub after: MindMap,
    pub description: String,
}

/// Manages undo/redo stacks with batch grouping for drag gestures.
pub struct CommandStack {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    /// Maximum undo depth.
    max_depth: usize,
    /// Tree captured at the start of the open batch.
    batch_snapshot: Option<(MindMap, String)>,
}

impl CommandStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth.min(64)),
            redo_stack: Vec::new(),
            max_depth,
            batch_snapshot: None,
        }
    }

    /// Execute an edit via the sync engine and push it to the undo stack.
    /// Inside a batch the edit is applied live without saving.
    pub fn execute<S: DocumentStore>(
        &mut self,
        engine: &mut SyncEngine<S>,
        edit: &Edit,
        layout: &LayoutConfig,
        description: &str,
    ) -> EditResult {
        if self.in_batch() {
            return engine.apply_deferred(edit, layout);
        }

        let before = engine.tree().clone();
        let result = engine.apply_edit(edit, layout);
        if result.changed {
            self.push(Command {
                before,
                after: engine.tree().clone(),
                description: description.to_string(),
            });
        }
        result
    }

    /// Start a batch. Nested calls keep the outermost snapshot.
    pub fn begin_batch<S: DocumentStore>(&mut self, engine: &SyncEngine<S>, description: &str) {
        if self.batch_snapshot.is_none() {
            self.batch_snapshot = Some((engine.tree().clone(), description.to_string()));
        }
    }

    /// Close the batch: save once and record one step if anything changed.
    /// A gesture that ends where it started saves nothing.
    /// Returns true when a step was recorded.
    pub fn end_batch<S: DocumentStore>(&mut self, engine: &mut SyncEngine<S>) -> bool {
        let Some((before, description)) = self.batch_snapshot.take() else {
            return false;
        };
        if engine.tree().same_tree(&before) || *engine.tree() == before {
            engine.restore(before);
            return false;
        }
        engine.flush();
        self.push(Command {
            before,
            after: engine.tree().clone(),
            description,
        });
        true
    }

    /// Drop the batch and put the captured tree back without saving.
    pub fn abort_batch<S: DocumentStore>(&mut self, engine: &mut SyncEngine<S>) {
        if let Some((before, _)) = self.batch_snapshot.take() {
            engine.restore(before);
        }
    }

    pub fn in_batch(&self) -> bool {
        self.batch_snapshot.is_some()
    }

    /// Undo the last step. Returns its description.
    pub fn undo<S: DocumentStore>(&mut self, engine: &mut SyncEngine<S>) -> Option<String> {
        let cmd = self.undo_stack.pop()?;
        engine.set_tree(cmd.before.clone());
        let desc = cmd.description.clone();
        self.redo_stack.push(cmd);
        Some(desc)
    }

    /// Redo the last undone step. Returns its description.
    pub fn redo<S: DocumentStore>(&mut self, engine: &mut SyncEngine<S>) -> Option<String> {
        let cmd = self.redo_stack.pop()?;
        engine.set_tree(cmd.after.clone());
        let desc = cmd.description.clone();
        self.undo_stack.push(cmd);
        Some(desc)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Forget all history (new document loaded).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.batch_snapshot = None;
    }

    fn push(&mut self, cmd: Command) {
        self.undo_stack.push(cmd);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        // Clear redo stack on new action
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::id::NodeId;

    fn engine() -> SyncEngine<impl FnMut(&str, bool)> {
        SyncEngine::new(|_: &str, _: bool| {})
    }

    fn add_root_child() -> Edit {
        Edit::AddChild {
            parent: NodeId::root(),
        }
    }

    #[test]
    fn undo_redo_add() {
        let mut engine = engine();
        let mut stack = CommandStack::new(100);
        let layout = LayoutConfig::default();

        stack.execute(&mut engine, &add_root_child(), &layout, "Add node");
        assert_eq!(engine.tree().len(), 2);

        assert_eq!(stack.undo(&mut engine).as_deref(), Some("Add node"));
        assert_eq!(engine.tree(), &MindMap::default());

        assert_eq!(stack.redo(&mut engine).as_deref(), Some("Add node"));
        assert_eq!(engine.tree().len(), 2);
    }

    #[test]
    fn redo_clears_on_new_action() {
        let mut engine = engine();
        let mut stack = CommandStack::new(100);
        let layout = LayoutConfig::default();

        stack.execute(&mut engine, &add_root_child(), &layout, "add");
        stack.undo(&mut engine);
        assert!(stack.can_redo());

        stack.execute(&mut engine, &add_root_child(), &layout, "add again");
        assert!(!stack.can_redo());
    }

    #[test]
    fn noop_edits_are_not_recorded() {
        let mut engine = engine();
        let mut stack = CommandStack::new(100);
        stack.execute(
            &mut engine,
            &Edit::Delete { id: NodeId::root() },
            &LayoutConfig::default(),
            "delete root",
        );
        assert!(!stack.can_undo());
    }

    #[test]
    fn max_depth_trims_oldest() {
        let mut engine = engine();
        let mut stack = CommandStack::new(3);
        let layout = LayoutConfig::default();
        for _ in 0..5 {
            stack.execute(&mut engine, &add_root_child(), &layout, "add");
        }
        let mut undo_count = 0;
        while stack.undo(&mut engine).is_some() {
            undo_count += 1;
        }
        assert_eq!(undo_count, 3);
        assert_eq!(engine.tree().len(), 3);
    }

    #[test]
    fn batch_undo_is_single_step() {
        let mut engine = engine();
        let mut stack = CommandStack::new(100);
        let layout = LayoutConfig::default();

        stack.begin_batch(&engine, "drag");
        for i in 0..5 {
            stack.execute(
                &mut engine,
                &Edit::Move {
                    id: NodeId::root(),
                    x: 400.0 + f64::from(i) * 10.0,
                    y: 300.0,
                },
                &layout,
                "drag",
            );
        }
        assert!(stack.end_batch(&mut engine));
        assert_eq!(engine.tree().root().position(), (440.0, 300.0));

        stack.undo(&mut engine);
        assert_eq!(engine.tree().root().position(), (400.0, 300.0));
        assert!(!stack.can_undo());
    }

    #[test]
    fn empty_batch_no_undo_entry() {
        let mut engine = engine();
        let mut stack = CommandStack::new(100);
        stack.begin_batch(&engine, "drag");
        assert!(!stack.end_batch(&mut engine));
        assert!(!stack.can_undo());
    }

    #[test]
    fn batch_back_to_start_saves_nothing() {
        let saves = std::rc::Rc::new(std::cell::Cell::new(0));
        let counter = std::rc::Rc::clone(&saves);
        let mut engine = SyncEngine::new(move |_: &str, _: bool| counter.set(counter.get() + 1));
        let mut stack = CommandStack::new(100);
        let layout = LayoutConfig::default();

        stack.begin_batch(&engine, "drag");
        for x in [450.0, 400.0] {
            stack.execute(
                &mut engine,
                &Edit::Move {
                    id: NodeId::root(),
                    x,
                    y: 300.0,
                },
                &layout,
                "drag",
            );
        }
        assert!(!stack.end_batch(&mut engine));
        assert_eq!(saves.get(), 0);
        assert!(!stack.can_undo());
        assert_eq!(engine.tree(), &MindMap::default());
    }

    #[test]
    fn aborted_batch_restores_tree() {
        let mut engine = engine();
        let mut stack = CommandStack::new(100);
        stack.begin_batch(&engine, "drag");
        stack.execute(
            &mut engine,
            &Edit::Move {
                id: NodeId::root(),
                x: 0.0,
                y: 0.0,
            },
            &LayoutConfig::default(),
            "drag",
        );
        stack.abort_batch(&mut engine);
        assert_eq!(engine.tree(), &MindMap::default());
        assert!(!stack.in_batch());
        assert!(!stack.can_undo());
    }
}
