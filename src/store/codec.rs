//! YAML record codec
//!
//! A record file is a single YAML mapping:
//!
//! ```yaml
//! title: My Post
//! status: published
//! published_at: 1691244000
//! ```
//!
//! The codec is stateless and knows nothing about identifiers or
//! locations; `_id`/`_path` are stripped by the write path before
//! encoding ever sees a mapping.

use super::record::{Fields, Value};
use std::collections::HashMap;
use thiserror::Error;

/// Decode failure for a stored record
#[derive(Debug, Error)]
#[error("{0}")]
pub struct DecodeError(String);

/// Decode a YAML document into a field mapping
///
/// An empty document decodes to an empty mapping. A non-mapping top level
/// or malformed YAML is an error, never coerced to a default.
pub fn decode(content: &str) -> Result<Fields, DecodeError> {
    if content.trim().is_empty() {
        return Ok(Fields::new());
    }

    let yaml: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| DecodeError(e.to_string()))?;

    match yaml {
        serde_yaml::Value::Mapping(map) => {
            let mut fields = Fields::new();
            for (k, v) in map {
                let key = k
                    .as_str()
                    .ok_or_else(|| DecodeError("non-string key in record".into()))?
                    .to_string();
                fields.insert(key, yaml_to_value(v));
            }
            Ok(fields)
        }
        serde_yaml::Value::Null => Ok(Fields::new()),
        _ => Err(DecodeError("record must be a YAML mapping".into())),
    }
}

/// Encode a field mapping as a YAML document
pub fn encode(fields: &Fields) -> String {
    let map: serde_yaml::Mapping = fields
        .iter()
        .map(|(k, v)| (serde_yaml::Value::String(k.clone()), value_to_yaml(v)))
        .collect();

    serde_yaml::to_string(&serde_yaml::Value::Mapping(map)).unwrap_or_default()
}

fn yaml_to_value(v: serde_yaml::Value) -> Value {
    match v {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::Null
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => {
            Value::Array(seq.into_iter().map(yaml_to_value).collect())
        }
        serde_yaml::Value::Mapping(map) => {
            let obj: HashMap<String, Value> = map
                .into_iter()
                .filter_map(|(k, v)| k.as_str().map(|key| (key.to_string(), yaml_to_value(v))))
                .collect();
            Value::Object(obj)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_value(tagged.value),
    }
}

fn value_to_yaml(v: &Value) -> serde_yaml::Value {
    match v {
        Value::Null => serde_yaml::Value::Null,
        Value::Bool(b) => serde_yaml::Value::Bool(*b),
        Value::Int(i) => serde_yaml::Value::Number((*i).into()),
        Value::Float(f) => serde_yaml::Value::Number(serde_yaml::Number::from(*f)),
        Value::String(s) => serde_yaml::Value::String(s.clone()),
        Value::Array(arr) => serde_yaml::Value::Sequence(arr.iter().map(value_to_yaml).collect()),
        Value::Object(obj) => {
            let map: serde_yaml::Mapping = obj
                .iter()
                .map(|(k, v)| (serde_yaml::Value::String(k.clone()), value_to_yaml(v)))
                .collect();
            serde_yaml::Value::Mapping(map)
        }
    }
}
