use crate::node::DocumentNode;

/// Visitor pattern for traversing document trees immutably
///
/// The default implementation walks the entire tree in document order.
/// Override `visit_node` to act on nodes, calling `walk_node` to descend.
pub trait Visitor: Sized {
    fn visit_node(&mut self, node: &DocumentNode) {
        walk_node(self, node);
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &DocumentNode) {
    for child in node.children() {
        visitor.visit_node(child);
    }
}

/// Collects placeholder field keys in document order, duplicates kept
#[derive(Debug, Default)]
pub struct FieldKeyCollector {
    pub keys: Vec<String>,
}

impl Visitor for FieldKeyCollector {
    fn visit_node(&mut self, node: &DocumentNode) {
        if node.is_placeholder() {
            self.keys.push(node.field_key().unwrap_or_default().to_string());
        }
        walk_node(self, node);
    }
}

/// Every placeholder `fieldKey` under `node` (inclusive), in document order
pub fn collect_field_keys(node: &DocumentNode) -> Vec<String> {
    let mut collector = FieldKeyCollector::default();
    collector.visit_node(node);
    collector.keys
}
