//! Structural lint for mind-map documents.
//!
//! Reports problems without modifying the document. `Error` findings make
//! a strict load fail; the rest are surfaced by `mindmap check`.

use crate::id::{NodeId, ROOT_ID};
use crate::model::{MindMap, MindNode};
use std::collections::HashSet;
use std::fmt;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LintSeverity {
    /// Breaks a document invariant; the document is rejected.
    Error,
    /// Recoverable inconsistency.
    Warning,
    /// Informational.
    Info,
}

impl fmt::Display for LintSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LintSeverity::Error => "error",
            LintSeverity::Warning => "warning",
            LintSeverity::Info => "info",
        })
    }
}

/// A single lint diagnostic for a node.
#[derive(Debug, Clone, PartialEq)]
pub struct LintDiagnostic {
    pub node_id: NodeId,
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "duplicate-id").
    pub rule: &'static str,
}

impl fmt::Display for LintDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}] {}", self.severity, self.rule, self.message)
    }
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the document.
#[must_use]
pub fn lint_mindmap(tree: &MindMap) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_root_id(tree, &mut diags);
    lint_duplicate_ids(tree, &mut diags);
    lint_levels(tree.root(), 0, &mut diags);
    lint_empty_text(tree, &mut diags);
    lint_missing_position(tree, &mut diags);
    diags
}

pub fn has_errors(diags: &[LintDiagnostic]) -> bool {
    diags.iter().any(|d| d.severity == LintSeverity::Error)
}

// ─── Rules ────────────────────────────────────────────────────────────────

fn lint_root_id(tree: &MindMap, diags: &mut Vec<LintDiagnostic>) {
    let root = tree.root();
    if !root.id.is_root() {
        diags.push(LintDiagnostic {
            node_id: root.id,
            message: format!("Root node has id `{}`; expected `{ROOT_ID}`.", root.id),
            severity: LintSeverity::Error,
            rule: "root-id",
        });
    }
}

fn lint_duplicate_ids(tree: &MindMap, diags: &mut Vec<LintDiagnostic>) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for node in tree.nodes() {
        if !seen.insert(node.id) && reported.insert(node.id) {
            diags.push(LintDiagnostic {
                node_id: node.id,
                message: format!("Id `{}` is used by more than one node.", node.id),
                severity: LintSeverity::Error,
                rule: "duplicate-id",
            });
        }
    }
}

fn lint_levels(node: &MindNode, depth: u32, diags: &mut Vec<LintDiagnostic>) {
    if node.level != depth {
        diags.push(LintDiagnostic {
            node_id: node.id,
            message: format!(
                "Node `{}` stores level {} but sits at depth {depth}.",
                node.id, node.level
            ),
            severity: LintSeverity::Warning,
            rule: "level-mismatch",
        });
    }
    for child in &node.children {
        lint_levels(child, depth + 1, diags);
    }
}

fn lint_empty_text(tree: &MindMap, diags: &mut Vec<LintDiagnostic>) {
    for node in tree.nodes() {
        if node.text.trim().is_empty() {
            diags.push(LintDiagnostic {
                node_id: node.id,
                message: format!("Node `{}` has no text.", node.id),
                severity: LintSeverity::Info,
                rule: "empty-text",
            });
        }
    }
}

fn lint_missing_position(tree: &MindMap, diags: &mut Vec<LintDiagnostic>) {
    for node in tree.nodes() {
        if node.x.is_none() || node.y.is_none() {
            diags.push(LintDiagnostic {
                node_id: node.id,
                message: format!("Node `{}` has no position; it is drawn at 0,0.", node.id),
                severity: LintSeverity::Info,
                rule: "missing-position",
            });
        }
    }
}
