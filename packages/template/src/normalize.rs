//! # Tree Normalizer
//!
//! Prunes blank text nodes and turns embedded newlines into `hardBreak`
//! nodes. Run this before handing content to the placeholder transform or
//! the cell index; both assume no blank text nodes remain.
//!
//! Containers are never pruned, only their descendant text. A container
//! whose children all disappear keeps an empty `content` array.

use crate::node::{DocumentNode, NodeOutput};

/// Drop text nodes that are empty or whitespace-only, recursively
///
/// Returns `None` only when `node` is itself a blank text node.
/// Idempotent.
pub fn remove_empty_text_nodes(node: &DocumentNode) -> Option<DocumentNode> {
    if node.is_text() {
        let blank = node.text.as_deref().map_or(true, |t| t.trim().is_empty());
        return if blank { None } else { Some(node.clone()) };
    }

    let mut result = node.clone();
    if let Some(children) = &node.content {
        result.content = Some(children.iter().filter_map(remove_empty_text_nodes).collect());
    }
    Some(result)
}

/// Split every text node containing a newline into text and `hardBreak`
/// siblings
///
/// Siblings need a parent to live in, so a bare text root is returned
/// unchanged; use `split_hard_breaks` to expand one directly.
pub fn normalize_hard_breaks(node: &DocumentNode) -> DocumentNode {
    match expand_hard_breaks(node) {
        NodeOutput::Single(node) => node,
        NodeOutput::Many(_) => node.clone(),
    }
}

fn expand_hard_breaks(node: &DocumentNode) -> NodeOutput {
    if node.is_text() {
        return split_hard_breaks(node);
    }

    let mut result = node.clone();
    if let Some(children) = &node.content {
        result.content = Some(
            children
                .iter()
                .flat_map(|child| expand_hard_breaks(child).into_vec())
                .collect(),
        );
    }
    NodeOutput::Single(result)
}

/// Expand a single text node around its line breaks
///
/// `"a\nb"` becomes `[text "a", hardBreak, text "b"]`. Blank pieces are
/// omitted, so `"\n"` becomes a lone `hardBreak`. `\r\n` counts as one
/// break. Text without a newline comes back unchanged.
pub fn split_hard_breaks(node: &DocumentNode) -> NodeOutput {
    let text = match node.text.as_deref() {
        Some(text) if node.is_text() && text.contains('\n') => text,
        _ => return NodeOutput::Single(node.clone()),
    };

    let mut pieces = Vec::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            pieces.push(DocumentNode::hard_break());
        }
        let line = line.strip_suffix('\r').unwrap_or(line);
        if !line.trim().is_empty() {
            pieces.push(node.with_text(line));
        }
    }
    NodeOutput::Many(pieces)
}

/// Prune blank text, then split hard breaks
pub fn normalize_content(node: &DocumentNode) -> Option<DocumentNode> {
    remove_empty_text_nodes(node).map(|pruned| normalize_hard_breaks(&pruned))
}
