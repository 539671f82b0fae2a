use crate::core::{MirrorError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A mirrored row: an open JSON object map.
///
/// The mirror treats every field except the configured identity field as
/// opaque payload. Validation of the identity field happens at the write
/// boundary, not here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a record from a JSON value. Anything other than an object is
    /// rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(MirrorError::InvalidRecord(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    /// The record's identity value under `field`, if present and non-null.
    ///
    /// A record without a usable identity cannot participate in
    /// reconciliation and is rejected at the write boundary.
    pub fn identity(&self, field: &str) -> Option<&Value> {
        match self.0.get(field) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_rejects_non_objects() {
        assert!(Record::from_value(json!([1, 2])).is_err());
        assert!(Record::from_value(json!("row")).is_err());
        assert!(Record::from_value(json!({"id": 1})).is_ok());
    }

    #[test]
    fn identity_treats_null_as_absent() {
        let rec = Record::from_value(json!({"client_id": null, "company": "Acme"})).unwrap();
        assert!(rec.identity("client_id").is_none());
        assert!(rec.identity("missing").is_none());

        let rec = Record::from_value(json!({"client_id": "C1"})).unwrap();
        assert_eq!(rec.identity("client_id"), Some(&json!("C1")));
    }
}
