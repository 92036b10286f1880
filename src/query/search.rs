//! Snapshot filtering and ordering

use super::matcher::{matches_all, Rule};
use crate::store::record::{Record, Value};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy)]
enum Direction {
    Asc,
    Desc,
}

/// A chainable query over a snapshot of records.
///
/// Consumes and returns itself so calls read as a pipeline:
///
/// ```ignore
/// let published = Search::new(store.list("posts").await?)
///     .filter(&[Rule::eq("status", "published")])
///     .order_asc("published_at")
///     .get();
/// ```
#[derive(Debug)]
pub struct Search {
    items: Vec<Record>,
}

impl Search {
    pub fn new(items: Vec<Record>) -> Self {
        Self { items }
    }

    /// Keep only records matching every rule
    pub fn filter(mut self, rules: &[Rule]) -> Self {
        self.items.retain(|record| matches_all(rules, record));
        self
    }

    /// Stable sort by a field, ascending
    pub fn order_asc(self, key: &str) -> Self {
        self.order_by(key, Direction::Asc)
    }

    /// Stable sort by a field, descending
    pub fn order_desc(self, key: &str) -> Self {
        self.order_by(key, Direction::Desc)
    }

    fn order_by(mut self, key: &str, direction: Direction) -> Self {
        self.items
            .sort_by(|a, b| compare_records(a, b, key, direction));
        self
    }

    /// The current sequence of records
    pub fn get(self) -> Vec<Record> {
        self.items
    }

    /// The first record of the current sequence
    pub fn first(self) -> Option<Record> {
        self.items.into_iter().next()
    }
}

/// Records missing the sort key come first under either direction; the
/// direction only reverses comparisons between present values.
fn compare_records(a: &Record, b: &Record, key: &str, direction: Direction) -> Ordering {
    match (a.fields.get(key), b.fields.get(key)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => {
            let ordering = compare_values(a, b);
            match direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            }
        }
    }
}

/// Natural ordering per dynamic type; int/float cross-compare, any other
/// mixed pair is left in place
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Int(a), Value::Float(b)) => {
            (*a as f64).partial_cmp(b).unwrap_or(Ordering::Equal)
        }
        (Value::Float(a), Value::Int(b)) => {
            a.partial_cmp(&(*b as f64)).unwrap_or(Ordering::Equal)
        }
        _ => Ordering::Equal,
    }
}
