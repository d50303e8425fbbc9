//! # Conditional Visibility
//!
//! Decides whether a region of the document is shown and, if not, how it is
//! hidden. The condition language is not ours: the boolean comes from a
//! caller-supplied [`ConditionEvaluator`].
//!
//! | shown | hideBehavior  | rendered output                              |
//! |-------|---------------|----------------------------------------------|
//! | true  | any           | region as authored                           |
//! | false | `remove`      | nothing; the node leaves the tree            |
//! | false | `display-none`| node kept, marked hidden                     |
//! | false | `collapse`    | node kept, marked hidden and inert           |
//!
//! `remove` changes node counts for anything that runs on the rendered tree
//! (exports, the cell index); the other two do not.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::form::FormData;
use crate::node::DocumentNode;

/// Attribute naming the rule selector a node answers to
pub const SELECTOR_ATTR: &str = "selector";
pub const HIDDEN_ATTR: &str = "hidden";
pub const HIDE_BEHAVIOR_ATTR: &str = "hideBehavior";
pub const INERT_ATTR: &str = "inert";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HideBehavior {
    #[default]
    DisplayNone,
    Collapse,
    Remove,
}

impl HideBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            HideBehavior::DisplayNone => "display-none",
            HideBehavior::Collapse => "collapse",
            HideBehavior::Remove => "remove",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTarget {
    pub selector: String,
}

/// Declarative mapping from a selector to a condition and a hide strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalRule<C = Value> {
    pub target: RuleTarget,
    pub condition: C,
    #[serde(default)]
    pub hide_behavior: HideBehavior,
}

impl<C> ConditionalRule<C> {
    pub fn new(selector: impl Into<String>, condition: C, hide_behavior: HideBehavior) -> Self {
        Self {
            target: RuleTarget {
                selector: selector.into(),
            },
            condition,
            hide_behavior,
        }
    }
}

/// External predicate deciding whether a condition holds for the form
pub trait ConditionEvaluator<C> {
    fn evaluate(&self, condition: &C, form: &FormData) -> bool;
}

impl<C, F> ConditionEvaluator<C> for F
where
    F: Fn(&C, &FormData) -> bool,
{
    fn evaluate(&self, condition: &C, form: &FormData) -> bool {
        self(condition, form)
    }
}

/// How a region should appear in rendered output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden(HideBehavior),
}

impl Visibility {
    pub fn is_visible(&self) -> bool {
        matches!(self, Visibility::Visible)
    }
}

pub fn evaluate_visibility<C, E>(rule: &ConditionalRule<C>, form: &FormData, evaluator: &E) -> bool
where
    E: ConditionEvaluator<C> + ?Sized,
{
    evaluator.evaluate(&rule.condition, form)
}

/// First rule whose selector matches exactly
///
/// `None` means no rule applies, which callers treat as visible.
pub fn resolve_rule_for_selector<'a, C>(
    selector: &str,
    rules: &'a [ConditionalRule<C>],
) -> Option<&'a ConditionalRule<C>> {
    rules.iter().find(|rule| rule.target.selector == selector)
}

/// Visibility of the region named `selector`
pub fn visibility_for<C, E>(
    selector: &str,
    rules: &[ConditionalRule<C>],
    form: &FormData,
    evaluator: &E,
) -> Visibility
where
    E: ConditionEvaluator<C> + ?Sized,
{
    match resolve_rule_for_selector(selector, rules) {
        Some(rule) if !evaluate_visibility(rule, form, evaluator) => {
            Visibility::Hidden(rule.hide_behavior)
        }
        _ => Visibility::Visible,
    }
}

/// Apply every rule to the tree, producing the rendered view
///
/// Nodes carrying `attrs.selector` are looked up in `rules`. Descendants of a
/// removed node are never evaluated.
pub fn render_visibility<C, E>(
    doc: &DocumentNode,
    rules: &[ConditionalRule<C>],
    form: &FormData,
    evaluator: &E,
) -> DocumentNode
where
    E: ConditionEvaluator<C> + ?Sized,
{
    render_node(doc, rules, form, evaluator).unwrap_or_else(DocumentNode::empty_doc)
}

fn render_node<C, E>(
    node: &DocumentNode,
    rules: &[ConditionalRule<C>],
    form: &FormData,
    evaluator: &E,
) -> Option<DocumentNode>
where
    E: ConditionEvaluator<C> + ?Sized,
{
    let visibility = match node.attr_str(SELECTOR_ATTR) {
        Some(selector) => visibility_for(selector, rules, form, evaluator),
        None => Visibility::Visible,
    };

    let mut result = match visibility {
        Visibility::Hidden(HideBehavior::Remove) => return None,
        Visibility::Hidden(behavior) => mark_hidden(node, behavior),
        Visibility::Visible => node.clone(),
    };

    if let Some(children) = &node.content {
        result.content = Some(
            children
                .iter()
                .filter_map(|child| render_node(child, rules, form, evaluator))
                .collect(),
        );
    }
    Some(result)
}

fn mark_hidden(node: &DocumentNode, behavior: HideBehavior) -> DocumentNode {
    let mut marked = node
        .clone()
        .with_attr(HIDDEN_ATTR, Value::Bool(true))
        .with_attr(HIDE_BEHAVIOR_ATTR, Value::String(behavior.as_str().to_string()));
    if behavior == HideBehavior::Collapse {
        marked = marked.with_attr(INERT_ATTR, Value::Bool(true));
    }
    marked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldValue;
    use serde_json::json;

    fn field_is_set(condition: &Value, form: &FormData) -> bool {
        condition
            .as_str()
            .and_then(|key| form.get(key))
            .map_or(false, |value| !value.is_empty())
    }

    fn section(selector: &str) -> DocumentNode {
        DocumentNode::container("section", vec![DocumentNode::text("body")])
            .with_attr(SELECTOR_ATTR, json!(selector))
    }

    #[test]
    fn test_parse_rule_defaults_to_display_none() {
        let rule: ConditionalRule = serde_json::from_value(json!({
            "target": { "selector": "#spouse" },
            "condition": "married"
        }))
        .unwrap();
        assert_eq!(rule.hide_behavior, HideBehavior::DisplayNone);

        let rule: ConditionalRule = serde_json::from_value(json!({
            "target": { "selector": "#spouse" },
            "condition": "married",
            "hideBehavior": "remove"
        }))
        .unwrap();
        assert_eq!(rule.hide_behavior, HideBehavior::Remove);
    }

    #[test]
    fn test_resolve_first_exact_match() {
        let rules = vec![
            ConditionalRule::new("a", json!(1), HideBehavior::Remove),
            ConditionalRule::new("a", json!(2), HideBehavior::Collapse),
        ];
        assert_eq!(resolve_rule_for_selector("a", &rules).unwrap().condition, json!(1));
        assert!(resolve_rule_for_selector("A", &rules).is_none());

        let none: Vec<ConditionalRule> = vec![];
        assert!(resolve_rule_for_selector("foo", &none).is_none());
    }

    #[test]
    fn test_missing_rule_is_visible() {
        let form = FormData::new();
        let rules: Vec<ConditionalRule> = vec![];
        assert_eq!(visibility_for("x", &rules, &form, &field_is_set), Visibility::Visible);
    }

    #[test]
    fn test_hidden_behaviors() {
        let rules = vec![
            ConditionalRule::new("gone", json!("flag"), HideBehavior::Remove),
            ConditionalRule::new("none", json!("flag"), HideBehavior::DisplayNone),
            ConditionalRule::new("fold", json!("flag"), HideBehavior::Collapse),
        ];
        let doc = DocumentNode::doc(vec![section("gone"), section("none"), section("fold")]);

        let rendered = render_visibility(&doc, &rules, &FormData::new(), &field_is_set);
        assert_eq!(rendered.children().len(), 2);

        let none = &rendered.children()[0];
        assert_eq!(none.attr(HIDDEN_ATTR), Some(&json!(true)));
        assert_eq!(none.attr_str(HIDE_BEHAVIOR_ATTR), Some("display-none"));
        assert!(none.attr(INERT_ATTR).is_none());
        assert_eq!(none.children().len(), 1);

        let fold = &rendered.children()[1];
        assert_eq!(fold.attr_str(HIDE_BEHAVIOR_ATTR), Some("collapse"));
        assert_eq!(fold.attr(INERT_ATTR), Some(&json!(true)));
    }

    #[test]
    fn test_shown_when_condition_holds() {
        let rules = vec![ConditionalRule::new("gone", json!("flag"), HideBehavior::Remove)];
        let mut form = FormData::new();
        form.insert("flag".to_string(), FieldValue::from("yes"));

        let doc = DocumentNode::doc(vec![section("gone")]);
        let rendered = render_visibility(&doc, &rules, &form, &field_is_set);
        assert_eq!(rendered, doc);
    }

    #[test]
    fn test_removed_root_renders_empty_doc() {
        let rules = vec![ConditionalRule::new("root", json!("flag"), HideBehavior::Remove)];
        let doc = DocumentNode::doc(vec![]).with_attr(SELECTOR_ATTR, json!("root"));
        let rendered = render_visibility(&doc, &rules, &FormData::new(), &field_is_set);
        assert_eq!(rendered, DocumentNode::empty_doc());
    }
}
