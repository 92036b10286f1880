//! Record representation
//!
//! A record is a single YAML file inside a collection directory. The file
//! holds the persisted field mapping; the identifier, location, and revision
//! are derived from the file at read time and never written back into it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Fingerprint of a record file's raw bytes at read time.
///
/// Used by `Store::update_checked` to detect a conflicting write between
/// reading a record and writing it back. The revision of a missing record
/// is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Revision(pub u32);

/// A record in the store
#[derive(Debug, Clone)]
pub struct Record {
    /// Unique identifier (filename without the .yaml extension)
    pub id: String,

    /// Absolute path of the backing file
    pub path: PathBuf,

    /// Revision of the content this record was read from
    pub rev: Revision,

    /// The persisted field mapping
    pub fields: Fields,
}

/// Field values that can be stored in a record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(HashMap<String, Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// A map of field names to values
pub type Fields = HashMap<String, Value>;

impl Record {
    /// Get a persisted field value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Resolve a rule key against this record.
    ///
    /// `_id` and `_path` address the transient attributes; any other key is
    /// a plain field lookup.
    pub fn lookup(&self, key: &str) -> Option<Value> {
        match key {
            "_id" => Some(Value::String(self.id.clone())),
            "_path" => Some(Value::String(self.path.display().to_string())),
            _ => self.fields.get(key).cloned(),
        }
    }
}
