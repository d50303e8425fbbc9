//! # Lexform Template
//!
//! Pure operations over the rich document tree used for legal templates.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ editor JSON → normalize_content              │
//! │  - drop blank text, split hard breaks        │
//! └──────────────────────────────────────────────┘
//!                     ↓
//! ┌──────────────────────────────────────────────┐
//! │ text_to_placeholder / placeholder_to_text    │
//! │  - {{fieldKey}} markup ⇄ placeholder nodes   │
//! └──────────────────────────────────────────────┘
//!                     ↓
//! ┌──────────────────────────────────────────────┐
//! │ render_visibility   extract_all_cells        │
//! │  - conditional regions, per-cell bindings    │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Every function here is synchronous and side-effect free. Traversal
//! counters live on the stack of a single call.
//!
//! ## Usage
//!
//! ```rust
//! use lexform_template::{extract_all_cells, normalize_content, text_to_placeholder, DocumentNode};
//!
//! let doc = DocumentNode::from_json(
//!     r#"{"type":"doc","content":[{"type":"paragraph","content":[
//!         {"type":"text","text":"Client: {{ client_name }}"}]}]}"#,
//! )?;
//!
//! let doc = normalize_content(&doc).unwrap_or_else(DocumentNode::empty_doc);
//! let doc = text_to_placeholder(&doc);
//! assert_eq!(doc.children()[0].children()[1].field_key(), Some("client_name"));
//! assert!(extract_all_cells(&doc).is_empty());
//! # Ok::<(), lexform_template::TemplateError>(())
//! ```

pub mod cells;
pub mod error;
pub mod form;
pub mod node;
pub mod normalize;
pub mod placeholder;
pub mod visibility;
pub mod visitor;

pub use cells::{
    cell_id, extract_all_cells, extract_cells_in_view, find_cell_by_id, find_cell_by_position,
    CellInfo, CellView,
};
pub use error::TemplateError;
pub use form::{FieldValue, FormData};
pub use node::{DocumentNode, NodeOutput};
pub use normalize::{normalize_content, normalize_hard_breaks, remove_empty_text_nodes, split_hard_breaks};
pub use placeholder::{placeholder_to_text, split_placeholders, text_to_placeholder, transform_node};
pub use visibility::{
    evaluate_visibility, render_visibility, resolve_rule_for_selector, visibility_for,
    ConditionEvaluator, ConditionalRule, HideBehavior, RuleTarget, Visibility,
};
pub use visitor::{collect_field_keys, walk_node, Visitor};
