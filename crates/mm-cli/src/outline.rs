//! Indented text outline of a mind map.

use mm_core::model::{MindMap, MindNode};

/// Render the tree as box-drawing lines, one node per line:
/// `text  (id)`. Collapsed subtrees are folded unless `expand_all`.
pub fn render_outline(tree: &MindMap, expand_all: bool) -> String {
    let mut out = String::new();
    let root = tree.root();
    push_line(&mut out, "", root, expand_all);
    write_children(&mut out, root, "", expand_all);
    out
}

fn write_children(out: &mut String, node: &MindNode, prefix: &str, expand_all: bool) {
    if node.collapsed && !expand_all {
        return;
    }
    let last = node.children.len().saturating_sub(1);
    for (i, child) in node.children.iter().enumerate() {
        let (branch, indent) = if i == last {
            ("└─ ", "   ")
        } else {
            ("├─ ", "│  ")
        };
        push_line(out, &format!("{prefix}{branch}"), child, expand_all);
        write_children(out, child, &format!("{prefix}{indent}"), expand_all);
    }
}

fn push_line(out: &mut String, lead: &str, node: &MindNode, expand_all: bool) {
    out.push_str(lead);
    out.push_str(&node.text);
    out.push_str(&format!("  ({})", node.id));
    if node.collapsed && node.has_children() {
        if expand_all {
            out.push_str(" [collapsed]");
        } else {
            let hidden = node.subtree_len() - 1;
            out.push_str(&format!(" [+{hidden} hidden]"));
        }
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::NodeId;
    use pretty_assertions::assert_eq;

    fn sample() -> MindMap {
        let tree = MindMap::default();
        let (tree, a) = tree.add_child_with(NodeId::root(), &Default::default());
        let a = a.unwrap();
        let tree = tree.rename_node(a, "Alpha");
        let (tree, b) = tree.add_child_with(a, &Default::default());
        let tree = tree.rename_node(b.unwrap(), "Beta");
        let (tree, c) = tree.add_child_with(NodeId::root(), &Default::default());
        tree.rename_node(c.unwrap(), "Gamma")
    }

    fn strip_ids(text: &str) -> String {
        text.lines()
            .map(|l| l.split("  (").next().unwrap_or(l).to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn draws_branches() {
        let text = render_outline(&sample(), false);
        assert_eq!(
            strip_ids(&text),
            "Main Topic\n├─ Alpha\n│  └─ Beta\n└─ Gamma"
        );
    }

    #[test]
    fn folds_collapsed_subtrees() {
        let tree = sample().collapse_all();
        let folded = render_outline(&tree, false);
        assert_eq!(folded.lines().count(), 3);
        assert!(folded.contains("[+1 hidden]"));

        let expanded = render_outline(&tree, true);
        assert_eq!(expanded.lines().count(), 4);
        assert!(expanded.contains("[collapsed]"));
    }
}
