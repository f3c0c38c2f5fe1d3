//! WASM bridge for MM — exposes the mind-map editor session to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host owns persistence:
//! it passes a `save(content, isCurrentVersion)` callback and forwards
//! document updates through `set_content`.

use mm_core::id::NodeId;
use mm_editor::{ContentStatus, DocumentStore, EditorConfig, ExportFormat, MindMapEditor};
use wasm_bindgen::prelude::*;

/// Forwards saves to a JS callback.
pub struct JsStore {
    on_save: Option<js_sys::Function>,
}

impl DocumentStore for JsStore {
    fn save(&mut self, content: &str, is_current_version: bool) {
        let Some(callback) = &self.on_save else {
            return;
        };
        if let Err(err) = callback.call2(
            &JsValue::NULL,
            &JsValue::from_str(content),
            &JsValue::from_bool(is_current_version),
        ) {
            log::warn!("save callback threw: {err:?}");
        }
    }
}

/// The main WASM-facing canvas controller.
///
/// All interaction from the webview goes through this struct. Methods that
/// mutate return `true` when the host should re-render.
#[wasm_bindgen]
pub struct MindMapCanvas {
    editor: MindMapEditor<JsStore>,
}

#[wasm_bindgen]
impl MindMapCanvas {
    #[wasm_bindgen(constructor)]
    pub fn new(on_save: Option<js_sys::Function>) -> Self {
        console_error_panic_hook_setup();
        Self {
            editor: MindMapEditor::new(JsStore { on_save }),
        }
    }

    /// Create a controller from a (possibly partial) JSON config.
    pub fn with_config(
        config_json: &str,
        on_save: Option<js_sys::Function>,
    ) -> Result<MindMapCanvas, JsValue> {
        console_error_panic_hook_setup();
        let config =
            EditorConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            editor: MindMapEditor::with_config(JsStore { on_save }, config),
        })
    }

    // ─── Document ────────────────────────────────────────────────────────

    /// Receive the document from the host. `status` is `"streaming"` or
    /// `"idle"`. Returns `true` when the tree was replaced.
    pub fn set_content(&mut self, content: &str, status: &str) -> bool {
        self.editor.receive_content(content, ContentStatus::from_name(status))
    }

    pub fn get_content(&mut self) -> String {
        self.editor.current_text()
    }

    pub fn set_current_version(&mut self, is_current: bool) {
        self.editor.set_current_version(is_current);
    }

    pub fn set_theme(&mut self, is_dark: bool) {
        self.editor.set_dark_mode(is_dark);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        let viewport = self.editor.viewport_mut();
        viewport.width = width;
        viewport.height = height;
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    pub fn handle_pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.editor.pointer_down(x, y)
    }

    pub fn handle_pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.editor.pointer_move(x, y)
    }

    pub fn handle_pointer_up(&mut self) -> bool {
        self.editor.pointer_up()
    }

    pub fn cancel_drag(&mut self) -> bool {
        self.editor.cancel_drag()
    }

    pub fn handle_double_click(&mut self, x: f64, y: f64) -> bool {
        self.editor.double_click(x, y)
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Handle a keyboard event. Returns JSON `{"handled":bool,"changed":bool}`.
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let out = self.editor.handle_key(key, ctrl, shift, alt, meta);
        format!(r#"{{"handled":{},"changed":{}}}"#, out.handled, out.changed)
    }

    // ─── Inline text editing ─────────────────────────────────────────────

    pub fn begin_edit(&mut self, node_id: &str) -> bool {
        self.editor.begin_edit(NodeId::intern(node_id))
    }

    pub fn set_edit_text(&mut self, text: &str) {
        self.editor.set_edit_text(text);
    }

    /// Commit the inline editor (Enter or blur).
    pub fn commit_edit(&mut self) -> bool {
        self.editor.commit_edit()
    }

    pub fn cancel_edit(&mut self) -> bool {
        self.editor.cancel_edit()
    }

    /// JSON `{"id":...,"text":...}` for the open inline editor, or `""`.
    pub fn get_edit_state(&self) -> String {
        self.editor
            .editing()
            .map(|edit| {
                serde_json::json!({ "id": edit.id.as_str(), "text": edit.buffer }).to_string()
            })
            .unwrap_or_default()
    }

    // ─── Structural edits ────────────────────────────────────────────────

    /// Returns the new node's id, or `""` when the parent is missing.
    pub fn add_child(&mut self, parent_id: &str) -> String {
        self.editor
            .add_child(NodeId::intern(parent_id))
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    pub fn delete_node(&mut self, node_id: &str) -> bool {
        self.editor.delete_node(NodeId::intern(node_id))
    }

    pub fn toggle_collapse(&mut self, node_id: &str) -> bool {
        self.editor.toggle_collapse(NodeId::intern(node_id))
    }

    pub fn rename_node(&mut self, node_id: &str, text: &str) -> bool {
        self.editor.rename_node(NodeId::intern(node_id), text)
    }

    pub fn move_node(&mut self, node_id: &str, x: f64, y: f64) -> bool {
        self.editor.move_node(NodeId::intern(node_id), x, y)
    }

    pub fn expand_all(&mut self) -> bool {
        self.editor.expand_all()
    }

    pub fn collapse_all(&mut self) -> bool {
        self.editor.collapse_all()
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// The selected node id, or `""`.
    pub fn get_selected_id(&self) -> String {
        self.editor
            .selected()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// Select by id; an empty id clears the selection.
    pub fn select_by_id(&mut self, node_id: &str) -> bool {
        if node_id.is_empty() {
            self.editor.deselect();
            return true;
        }
        self.editor.select(NodeId::intern(node_id))
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.editor.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.editor.can_redo()
    }

    // ─── Viewport ────────────────────────────────────────────────────────

    pub fn zoom_in(&mut self) {
        self.editor.viewport_mut().zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.editor.viewport_mut().zoom_out();
    }

    pub fn reset_view(&mut self) {
        self.editor.viewport_mut().reset();
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.editor.viewport_mut().pan_by(dx, dy);
    }

    pub fn get_zoom(&self) -> f64 {
        self.editor.viewport().zoom
    }

    // ─── Rendering & export ──────────────────────────────────────────────

    pub fn render_svg(&self) -> String {
        self.editor.render_svg()
    }

    /// `mindmap.svg` contents.
    pub fn export_svg(&self) -> Result<String, JsValue> {
        let artifact = self
            .editor
            .export(ExportFormat::Svg)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        String::from_utf8(artifact.into_bytes()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// `mindmap.png` bytes. Errors are meant for a transient notification.
    pub fn export_png(&self) -> Result<Vec<u8>, JsValue> {
        self.editor
            .export(ExportFormat::Png)
            .map(|artifact| artifact.into_bytes())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("MM WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone validation (no canvas needed) ────────────────────────────

/// Validate a document. Returns JSON `{"ok":bool,"diagnostics":[...]}` or
/// `{"ok":false,"error":"..."}` when the JSON does not parse.
#[wasm_bindgen]
pub fn validate(content: &str) -> String {
    match mm_core::codec::parse(content) {
        Ok(tree) => {
            let diags = mm_core::lint_mindmap(&tree);
            let ok = !mm_core::lint::has_errors(&diags);
            let diagnostics: Vec<serde_json::Value> = diags
                .iter()
                .map(|d| {
                    serde_json::json!({
                        "nodeId": d.node_id.as_str(),
                        "rule": d.rule,
                        "severity": d.severity.to_string(),
                        "message": d.message,
                    })
                })
                .collect();
            serde_json::json!({ "ok": ok, "diagnostics": diagnostics }).to_string()
        }
        Err(e) => serde_json::json!({ "ok": false, "error": e.to_string() }).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_reports_lint() {
        let report: serde_json::Value = serde_json::from_str(&validate(
            r#"{"id":"root","text":"","x":0,"y":0,"children":[],"level":0}"#,
        ))
        .unwrap();
        assert_eq!(report["ok"], true);
        assert_eq!(report["diagnostics"][0]["rule"], "empty-text");
    }

    #[test]
    fn validate_rejects_duplicates_and_garbage() {
        let dup = r#"{"id":"root","text":"a","x":0,"y":0,"level":0,"children":[
            {"id":"a","text":"a","x":0,"y":0,"level":1,"children":[]},
            {"id":"a","text":"b","x":0,"y":0,"level":1,"children":[]}]}"#;
        let report: serde_json::Value = serde_json::from_str(&validate(dup)).unwrap();
        assert_eq!(report["ok"], false);

        let report: serde_json::Value = serde_json::from_str(&validate("{")).unwrap();
        assert_eq!(report["ok"], false);
        assert!(report["error"].is_string());
    }
}
