//! # Document Tree
//!
//! The JSON-shaped rich document tree exchanged with the editor.
//!
//! ```text
//! { "type": "doc", "content": [
//!     { "type": "paragraph", "content": [
//!         { "type": "text", "text": "Dear ", "marks": [...] },
//!         { "type": "placeholder", "attrs": { "fieldKey": "client_name" } }
//!     ]}
//! ]}
//! ```
//!
//! A node is a *text node* iff its type is `"text"`; a node is a *container*
//! iff it carries `content` (possibly empty).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::TemplateError;

pub const DOC: &str = "doc";
pub const TEXT: &str = "text";
pub const HARD_BREAK: &str = "hardBreak";
pub const PLACEHOLDER: &str = "placeholder";
pub const TABLE: &str = "table";
pub const TABLE_ROW: &str = "tableRow";
pub const TABLE_CELL: &str = "tableCell";
pub const TABLE_HEADER: &str = "tableHeader";

/// Attribute carrying a placeholder's bound form field
pub const FIELD_KEY_ATTR: &str = "fieldKey";

/// A single node of the document tree
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentNode {
    #[serde(rename = "type")]
    pub node_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Child nodes. A non-array value in the source JSON is read as childless.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_content"
    )]
    pub content: Option<Vec<DocumentNode>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<Vec<Value>>,

    /// Keys this model does not know about, kept so they survive a round trip
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of transforming one node: either one node or a run of siblings
///
/// A text node may expand into several siblings (placeholder splitting,
/// hard-break splitting). Flattening is the parent's job.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeOutput {
    Single(DocumentNode),
    Many(Vec<DocumentNode>),
}

impl NodeOutput {
    pub fn into_vec(self) -> Vec<DocumentNode> {
        match self {
            NodeOutput::Single(node) => vec![node],
            NodeOutput::Many(nodes) => nodes,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            NodeOutput::Single(_) => 1,
            NodeOutput::Many(nodes) => nodes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentNode {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            ..Default::default()
        }
    }

    /// Empty `doc` root
    pub fn empty_doc() -> Self {
        Self::container(DOC, Vec::new())
    }

    pub fn doc(content: Vec<DocumentNode>) -> Self {
        Self::container(DOC, content)
    }

    pub fn container(node_type: impl Into<String>, content: Vec<DocumentNode>) -> Self {
        Self {
            content: Some(content),
            ..Self::new(node_type)
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(TEXT)
        }
    }

    pub fn hard_break() -> Self {
        Self::new(HARD_BREAK)
    }

    pub fn placeholder(field_key: impl Into<String>) -> Self {
        Self::new(PLACEHOLDER).with_attr(FIELD_KEY_ATTR, Value::String(field_key.into()))
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attrs
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
        self
    }

    pub fn with_marks(mut self, marks: Vec<Value>) -> Self {
        self.marks = Some(marks);
        self
    }

    pub fn is_text(&self) -> bool {
        self.node_type == TEXT
    }

    pub fn is_placeholder(&self) -> bool {
        self.node_type == PLACEHOLDER
    }

    pub fn is_table(&self) -> bool {
        self.node_type == TABLE
    }

    pub fn is_table_row(&self) -> bool {
        self.node_type == TABLE_ROW
    }

    pub fn is_table_cell(&self) -> bool {
        self.node_type == TABLE_CELL || self.node_type == TABLE_HEADER
    }

    pub fn is_container(&self) -> bool {
        self.content.is_some()
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.as_ref().and_then(|attrs| attrs.get(key))
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attr(key).and_then(Value::as_str)
    }

    /// The placeholder's field key, if this is a placeholder with a string key
    pub fn field_key(&self) -> Option<&str> {
        if self.is_placeholder() {
            self.attr_str(FIELD_KEY_ATTR)
        } else {
            None
        }
    }

    /// Children, or an empty slice for leaves
    pub fn children(&self) -> &[DocumentNode] {
        self.content.as_deref().unwrap_or(&[])
    }

    /// Copy of this node carrying the same attrs and marks but different text
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            content: None,
            ..self.clone()
        }
    }

    pub fn from_json(source: &str) -> Result<Self, TemplateError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_value(value: Value) -> Result<Self, TemplateError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> Result<String, TemplateError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, TemplateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn lenient_content<'de, D>(deserializer: D) -> Result<Option<Vec<DocumentNode>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        Some(Value::Array(items)) => {
            let nodes = items
                .into_iter()
                .map(DocumentNode::deserialize)
                .collect::<Result<Vec<_>, _>>()
                .map_err(serde::de::Error::custom)?;
            Ok(Some(nodes))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_prosemirror_shape() {
        let doc = DocumentNode::from_value(json!({
            "type": "doc",
            "content": [{
                "type": "paragraph",
                "content": [
                    { "type": "text", "text": "Hello", "marks": [{ "type": "bold" }] },
                    { "type": "placeholder", "attrs": { "fieldKey": "name" } }
                ]
            }]
        }))
        .unwrap();

        assert_eq!(doc.node_type, DOC);
        let paragraph = &doc.children()[0];
        assert_eq!(paragraph.children().len(), 2);
        assert_eq!(paragraph.children()[0].marks.as_ref().unwrap().len(), 1);
        assert_eq!(paragraph.children()[1].field_key(), Some("name"));
    }

    #[test]
    fn test_non_array_content_is_childless() {
        let node = DocumentNode::from_value(json!({
            "type": "paragraph",
            "content": "oops"
        }))
        .unwrap();

        assert!(node.content.is_none());
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let source = r#"{"type":"widget","version":3,"attrs":{"a":1}}"#;
        let node = DocumentNode::from_json(source).unwrap();
        assert_eq!(node.extra.get("version"), Some(&json!(3)));

        let printed = node.to_json().unwrap();
        let reparsed = DocumentNode::from_json(&printed).unwrap();
        assert_eq!(node, reparsed);
    }

    #[test]
    fn test_with_text_keeps_marks_and_attrs() {
        let source = DocumentNode::text("abc")
            .with_marks(vec![json!({ "type": "italic" })])
            .with_attr("lang", json!("en"));

        let copy = source.with_text("xyz");
        assert_eq!(copy.text.as_deref(), Some("xyz"));
        assert_eq!(copy.marks, source.marks);
        assert_eq!(copy.attrs, source.attrs);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(DocumentNode::from_json("{ not json").is_err());
        assert!(DocumentNode::from_json(r#"{"content": []}"#).is_err());
    }
}
