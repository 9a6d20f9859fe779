// src/record/player.rs

use serde_json::{Map, Value};

use crate::error::RecordError;

/// One loosely-typed record from the API: ordered field name → JSON value.
///
/// Nested objects are flattened into dotted names (`stats.minutes`) so every
/// field maps onto a single table column. Arrays are kept as JSON values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerRecord {
    fields: Map<String, Value>,
}

impl PlayerRecord {
    /// Build a record from a JSON object, flattening nested objects.
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            _ => Err(RecordError::WrongType {
                key: "<record>".to_string(),
                expected: "object",
            }),
        }
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        let mut fields = Map::new();
        flatten_into("", map, &mut fields);
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in the order the API emitted them.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Result<&Value, RecordError> {
        self.fields
            .get(key)
            .ok_or_else(|| RecordError::MissingKey(key.to_string()))
    }

    pub fn get_str(&self, key: &str) -> Result<&str, RecordError> {
        self.get(key)?
            .as_str()
            .ok_or_else(|| wrong_type(key, "string"))
    }

    pub fn get_i64(&self, key: &str) -> Result<i64, RecordError> {
        self.get(key)?
            .as_i64()
            .ok_or_else(|| wrong_type(key, "integer"))
    }

    pub fn get_f64(&self, key: &str) -> Result<f64, RecordError> {
        self.get(key)?
            .as_f64()
            .ok_or_else(|| wrong_type(key, "number"))
    }

    pub fn get_bool(&self, key: &str) -> Result<bool, RecordError> {
        self.get(key)?
            .as_bool()
            .ok_or_else(|| wrong_type(key, "boolean"))
    }
}

fn wrong_type(key: &str, expected: &'static str) -> RecordError {
    RecordError::WrongType {
        key: key.to_string(),
        expected,
    }
}

fn flatten_into(prefix: &str, map: Map<String, Value>, out: &mut Map<String, Value>) {
    for (key, value) in map {
        let name = if prefix.is_empty() {
            key
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Object(inner) if !inner.is_empty() => flatten_into(&name, inner, out),
            other => {
                out.insert(name, other);
            }
        }
    }
}

/// Pull `payload[key]` as an array of records.
pub fn records_from_array(payload: &Value, key: &str) -> Result<Vec<PlayerRecord>, RecordError> {
    let items = payload
        .get(key)
        .ok_or_else(|| RecordError::MissingKey(key.to_string()))?
        .as_array()
        .ok_or_else(|| RecordError::NotAnArray(key.to_string()))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(PlayerRecord::from_map(map.clone())),
            _ => Err(wrong_type(&format!("{}[{}]", key, i), "object")),
        })
        .collect()
}
