use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// User-supplied values keyed by placeholder `fieldKey`
pub type FormData = BTreeMap<String, FieldValue>;

/// A single form value: a primitive or a checkbox group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    /// Kept as parsed so integers round-trip exactly
    Number(Number),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Empty text, an empty list and null all count as "not filled in"
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Bool(_) | FieldValue::Number(_) => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

/// Non-finite floats have no JSON form and become `Null`
impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(FieldValue::Null, FieldValue::Number)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n.into())
    }
}

impl From<u64> for FieldValue {
    fn from(n: u64) -> Self {
        FieldValue::Number(n.into())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_form_data() {
        let json = r#"{
            "name": "Ada",
            "age": 36,
            "agreed": true,
            "services": ["drafting", "review"],
            "notes": null
        }"#;

        let form: FormData = serde_json::from_str(json).unwrap();
        assert_eq!(form["name"], FieldValue::Text("Ada".to_string()));
        assert_eq!(form["age"], FieldValue::from(36_u64));
        assert_eq!(form["agreed"], FieldValue::Bool(true));
        assert_eq!(
            form["services"],
            FieldValue::List(vec!["drafting".to_string(), "review".to_string()])
        );
        assert_eq!(form["notes"], FieldValue::Null);
    }

    #[test]
    fn test_numbers_round_trip_exactly() {
        let json = r#"{"age":36,"fee":12.5,"id":9007199254740993}"#;

        let form: FormData = serde_json::from_str(json).unwrap();
        assert_eq!(form["age"].to_string(), "36");
        assert_eq!(serde_json::to_string(&form).unwrap(), json);

        assert_eq!(FieldValue::from(f64::NAN), FieldValue::Null);
        assert_eq!(FieldValue::from(-3_i64).to_string(), "-3");
    }

    #[test]
    fn test_display_and_emptiness() {
        assert_eq!(FieldValue::from("x").to_string(), "x");
        assert_eq!(
            FieldValue::from(vec!["a".to_string(), "b".to_string()]).to_string(),
            "a, b"
        );
        assert!(FieldValue::from("  ").is_empty());
        assert!(FieldValue::Null.is_empty());
        assert!(!FieldValue::from(false).is_empty());
    }
}
