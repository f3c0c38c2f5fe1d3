//! Editor session for mind maps: store sync, undo/redo, selection, drag,
//! inline text editing, viewport, shortcuts, and export.

pub mod commands;
pub mod config;
pub mod editor;
pub mod export;
pub mod shortcuts;
pub mod sync;
pub mod viewport;

pub use commands::CommandStack;
pub use config::EditorConfig;
pub use editor::{KeyOutcome, MindMapEditor, TextEdit};
pub use export::{ExportArtifact, ExportError, ExportFormat};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use sync::{ContentStatus, DocumentStore, Edit, EditResult, SyncEngine};
pub use viewport::Viewport;
