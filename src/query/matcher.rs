//! Rule matching
//!
//! A rule pairs a key expression with a required value. The key expression
//! may list `|`-separated alternative field names (`slug|_id`); the rule
//! holds when any alternative strictly equals the value. A record passes a
//! rule set only when every rule holds.

use crate::store::record::{Record, Value};

/// A single equality rule against a record
#[derive(Debug, Clone)]
pub struct Rule {
    keys: Vec<String>,
    value: Value,
}

impl Rule {
    /// Rule requiring a field named by `expr` to equal `value`.
    ///
    /// `expr` may be a single field name or `|`-delimited alternatives;
    /// `_id` and `_path` address a record's transient attributes.
    pub fn eq(expr: impl AsRef<str>, value: impl Into<Value>) -> Self {
        Self {
            keys: expr.as_ref().split('|').map(str::to_string).collect(),
            value: value.into(),
        }
    }

    /// Whether any alternative field equals the required value
    pub fn matches(&self, record: &Record) -> bool {
        self.keys
            .iter()
            .any(|key| record.lookup(key).map_or(false, |v| v == self.value))
    }
}

/// Conjunction across rules
pub fn matches_all(rules: &[Rule], record: &Record) -> bool {
    rules.iter().all(|rule| rule.matches(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::record::{Fields, Revision};
    use std::path::PathBuf;

    fn record(id: &str, pairs: &[(&str, Value)]) -> Record {
        let fields: Fields = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        Record {
            id: id.into(),
            path: PathBuf::from(format!("/store/posts/{}.yaml", id)),
            rev: Revision::default(),
            fields,
        }
    }

    #[test]
    fn test_single_field_equality() {
        let r = record("a", &[("status", "published".into())]);
        assert!(Rule::eq("status", "published").matches(&r));
        assert!(!Rule::eq("status", "draft").matches(&r));
    }

    #[test]
    fn test_strict_equality_no_coercion() {
        let r = record("a", &[("count", Value::Int(1))]);
        assert!(Rule::eq("count", Value::Int(1)).matches(&r));
        assert!(!Rule::eq("count", Value::Float(1.0)).matches(&r));
        assert!(!Rule::eq("count", "1").matches(&r));
    }

    #[test]
    fn test_alternation() {
        let by_slug = record("x1", &[("slug", "hello".into())]);
        let by_id = record("y2", &[]);

        let rule = Rule::eq("slug|_id", "y2");
        assert!(!rule.matches(&by_slug));
        assert!(rule.matches(&by_id));

        let rule = Rule::eq("slug|_id", "hello");
        assert!(rule.matches(&by_slug));
        assert!(!rule.matches(&by_id));
    }

    #[test]
    fn test_conjunction() {
        let r = record(
            "a",
            &[("status", "published".into()), ("author", "asko".into())],
        );

        let both = [
            Rule::eq("status", "published"),
            Rule::eq("author", "asko"),
        ];
        assert!(matches_all(&both, &r));

        let one_off = [
            Rule::eq("status", "published"),
            Rule::eq("author", "someone-else"),
        ];
        assert!(!matches_all(&one_off, &r));
    }

    #[test]
    fn test_missing_field_never_matches() {
        let r = record("a", &[]);
        assert!(!Rule::eq("status", "published").matches(&r));
        assert!(!Rule::eq("status", Value::Null).matches(&r));
    }
}
