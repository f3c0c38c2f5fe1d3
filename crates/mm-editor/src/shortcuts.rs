//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. Keys are
//! `KeyboardEvent.key` values. While a node's text is being edited the
//! editor handles `Enter`/`Escape` itself and does not consult this map.

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Edit ──
    AddChild,
    Delete,
    ToggleCollapse,
    Rename,
    Undo,
    Redo,
    ExpandAll,
    CollapseAll,

    // ── View ──
    ZoomIn,
    ZoomOut,
    ResetView,

    // ── UI ──
    Deselect,
}

/// Resolves key events into shortcut actions.
///
/// On macOS `meta` is ⌘, on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action, or `None` when unbound.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        // ── Modifier combos first (most specific) ──
        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ResetView),
                _ => None,
            };
        }

        if shift {
            return match key {
                "c" | "C" => Some(ShortcutAction::CollapseAll),
                _ => None,
            };
        }

        // ── Single keys (no modifiers) ──
        match key {
            "Tab" => Some(ShortcutAction::AddChild),
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            " " => Some(ShortcutAction::ToggleCollapse),
            "F2" => Some(ShortcutAction::Rename),
            "e" | "E" => Some(ShortcutAction::ExpandAll),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}
