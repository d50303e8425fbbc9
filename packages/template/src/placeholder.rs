//! # Placeholder Transform
//!
//! Converts between literal `{{fieldKey}}` markup inside text nodes and
//! first-class `placeholder` nodes, in both directions.
//!
//! ```text
//! text "Dear {{ client }},"   ⇄   text "Dear " · placeholder(client) · text ","
//! ```
//!
//! Both directions are total: malformed placeholder attrs are coerced,
//! never rejected. A marker must name a field, so `{{}}` and `{{   }}` stay
//! literal text on the way in.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::node::{DocumentNode, NodeOutput, FIELD_KEY_ATTR};

fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{([^}]*)\}\}").expect("placeholder pattern is valid"))
}

/// Replace `{{key}}` markup in every text node with placeholder nodes
///
/// Always returns a single root. Should the root itself expand into
/// siblings, an empty `doc` is returned instead.
pub fn text_to_placeholder(doc: &DocumentNode) -> DocumentNode {
    match transform_node(doc) {
        NodeOutput::Single(root) => root,
        NodeOutput::Many(_) => DocumentNode::empty_doc(),
    }
}

/// Transform one node without flattening
///
/// Text nodes may come back as `Many`; containers always come back as
/// `Single` with their children already flattened.
pub fn transform_node(node: &DocumentNode) -> NodeOutput {
    if node.is_text() {
        return split_placeholders(node);
    }

    if node.is_placeholder() {
        return NodeOutput::Single(coerce_placeholder(node));
    }

    let mut result = node.clone();
    if let Some(children) = &node.content {
        result.content = Some(
            children
                .iter()
                .flat_map(|child| transform_node(child).into_vec())
                .collect(),
        );
    }
    NodeOutput::Single(result)
}

/// Split one text node around its placeholder markers
///
/// Literal runs keep the source node's marks and attrs. A node with no
/// convertible marker comes back unchanged as `Single`.
pub fn split_placeholders(node: &DocumentNode) -> NodeOutput {
    let Some(text) = node.text.as_deref() else {
        return NodeOutput::Single(node.clone());
    };

    let mut pieces = Vec::new();
    let mut last = 0;

    for captures in marker_pattern().captures_iter(text) {
        let Some(marker) = captures.get(0) else {
            continue;
        };
        let key = captures.get(1).map_or("", |m| m.as_str()).trim();
        if key.is_empty() {
            // stays inside the surrounding literal run
            continue;
        }

        if marker.start() > last {
            pieces.push(node.with_text(&text[last..marker.start()]));
        }
        pieces.push(DocumentNode::placeholder(key));
        last = marker.end();
    }

    if pieces.is_empty() {
        return NodeOutput::Single(node.clone());
    }

    if last < text.len() {
        pieces.push(node.with_text(&text[last..]));
    }
    NodeOutput::Many(pieces)
}

/// Replace every placeholder node with literal `{{key}}` text
pub fn placeholder_to_text(doc: &DocumentNode) -> DocumentNode {
    if doc.is_placeholder() {
        let key = field_key_of(doc);
        return DocumentNode::text(format!("{{{{{}}}}}", key));
    }

    let mut result = doc.clone();
    if let Some(children) = &doc.content {
        result.content = Some(children.iter().map(placeholder_to_text).collect());
    }
    result
}

/// Placeholder with `attrs.fieldKey` forced to a string
fn coerce_placeholder(node: &DocumentNode) -> DocumentNode {
    let key = field_key_of(node);
    let mut result = node.clone();
    result
        .attrs
        .get_or_insert_with(Default::default)
        .insert(FIELD_KEY_ATTR.to_string(), Value::String(key));
    result
}

fn field_key_of(node: &DocumentNode) -> String {
    match node.attr(FIELD_KEY_ATTR) {
        Some(Value::String(key)) => key.clone(),
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    }
}
