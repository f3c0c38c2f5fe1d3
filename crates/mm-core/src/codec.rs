//! Canonical JSON form of a mind map.
//!
//! `serialize` writes 2-space indented JSON with keys in `MindNode` field
//! order. `deserialize` never fails: a foreign root id or repeated ids are
//! repaired, and unreadable content becomes the default single-root
//! document. `from_json` is the strict path and reports why a document was
//! rejected.

use crate::id::NodeId;
use crate::lint::{LintDiagnostic, LintSeverity, lint_mindmap};
use crate::model::{MindMap, MindNode};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Deepest `{`/`[` nesting accepted. Each node takes two levels (the
/// object and its `children` array).
pub const MAX_NESTING: usize = 1024;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid mind-map JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid mind-map structure: {}", summarize(.0))]
    Invalid(Vec<LintDiagnostic>),

    #[error("mind-map JSON nested {0} levels deep (limit {MAX_NESTING})")]
    TooDeep(usize),
}

fn summarize(diags: &[LintDiagnostic]) -> String {
    diags
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Canonical pretty JSON for `tree`.
pub fn serialize(tree: &MindMap) -> String {
    serde_json::to_string_pretty(tree).unwrap_or_else(|err| {
        log::error!("mind map serialization failed: {err}");
        String::new()
    })
}

/// Load `text`, repairing ids where possible and falling back to
/// `MindMap::default()` when the content cannot be read at all.
pub fn deserialize(text: &str) -> MindMap {
    if text.trim().is_empty() {
        return MindMap::default();
    }
    match parse(text) {
        Ok(tree) => repair(tree).relevel(),
        Err(err) => {
            log::warn!("using default mind map: {err}");
            MindMap::default()
        }
    }
}

/// Strict load: parse, reject structural errors, then recompute levels.
///
/// # Errors
/// `CodecError::Json` when `text` is not a mind-map shaped JSON value,
/// `CodecError::Invalid` with the `Error`-severity lint findings otherwise.
pub fn from_json(text: &str) -> Result<MindMap, CodecError> {
    let tree = parse(text)?;
    let errors: Vec<LintDiagnostic> = lint_mindmap(&tree)
        .into_iter()
        .filter(|d| d.severity == LintSeverity::Error)
        .collect();
    if !errors.is_empty() {
        return Err(CodecError::Invalid(errors));
    }
    Ok(tree.relevel())
}

/// Parse without any structural checks. Levels are left as written.
///
/// serde_json's own recursion limit (128) would cap trees at about 63
/// levels, so it is lifted and replaced by [`MAX_NESTING`].
///
/// # Errors
/// `CodecError::TooDeep` past [`MAX_NESTING`], `CodecError::Json` for
/// anything serde rejects.
pub fn parse(text: &str) -> Result<MindMap, CodecError> {
    let depth = nesting_depth(text);
    if depth > MAX_NESTING {
        return Err(CodecError::TooDeep(depth));
    }
    let mut json = serde_json::Deserializer::from_str(text);
    json.disable_recursion_limit();
    let tree = MindMap::deserialize(&mut json)?;
    json.end()?;
    Ok(tree)
}

/// Deepest bracket nesting outside string literals.
fn nesting_depth(text: &str) -> usize {
    let (mut depth, mut deepest) = (0usize, 0usize);
    let (mut in_string, mut escaped) = (false, false);
    for byte in text.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

/// Give the top node the root id and a fresh id to every node whose id
/// was already used earlier in document order. Unchanged trees come back
/// as the same `Arc`.
pub fn repair(tree: MindMap) -> MindMap {
    let taken = tree.ids();
    let mut seen = HashSet::new();
    let root = tree.root_arc();
    let top = if root.id.is_root() {
        Arc::clone(root)
    } else {
        log::warn!("renaming top-level node {} to {}", root.id, NodeId::root());
        let mut copy = MindNode::clone(root);
        copy.id = NodeId::root();
        Arc::new(copy)
    };
    let renamed = !Arc::ptr_eq(&top, root);
    match reid(&top, &mut seen, &taken) {
        Some(fixed) => MindMap::from_arc(fixed),
        None if renamed => MindMap::from_arc(top),
        None => tree,
    }
}

fn reid(
    node: &Arc<MindNode>,
    seen: &mut HashSet<NodeId>,
    taken: &HashSet<NodeId>,
) -> Option<Arc<MindNode>> {
    let new_id = if seen.insert(node.id) {
        None
    } else {
        let id = NodeId::fresh(|id| taken.contains(&id) || seen.contains(&id));
        log::warn!("duplicate node id {} replaced by {id}", node.id);
        seen.insert(id);
        Some(id)
    };
    let children: Vec<Option<Arc<MindNode>>> = node
        .children
        .iter()
        .map(|child| reid(child, seen, taken))
        .collect();
    if new_id.is_none() && children.iter().all(Option::is_none) {
        return None;
    }
    let mut copy = MindNode::clone(node);
    if let Some(id) = new_id {
        copy.id = id;
    }
    for (slot, fixed) in copy.children.iter_mut().zip(children) {
        if let Some(fixed) = fixed {
            *slot = fixed;
        }
    }
    Some(Arc::new(copy))
}

/// Strict load followed by canonical serialization. Idempotent.
///
/// # Errors
/// Same as [`from_json`].
pub fn format_document(text: &str) -> Result<String, CodecError> {
    Ok(serialize(&from_json(text)?))
}
