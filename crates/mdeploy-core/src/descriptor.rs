//! Application descriptor: the JSON object submitted to the orchestrator.

use serde_json::{Map, Value};

use crate::error::{DeployError, Result};

/// JSON object describing an application deployment.
///
/// Only `id` and `env` are interpreted; every other field is passed through
/// verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    fields: Map<String, Value>,
}

impl Descriptor {
    /// Wrap a JSON value, which must be a non-empty object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) if !fields.is_empty() => Ok(Self { fields }),
            Value::Object(_) => Err(DeployError::missing("application descriptor is empty")),
            Value::Null => Err(DeployError::missing("application descriptor is null")),
            other => Err(DeployError::missing(format!(
                "application descriptor must be a JSON object, got {}",
                kind_of(&other)
            ))),
        }
    }

    /// Parse a JSON-encoded object.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|err| {
            DeployError::missing(format!("application descriptor is not valid JSON: {err}"))
        })?;
        Self::from_value(value)
    }

    /// Presence checks: a non-empty string `id`, and `env` (if any) an object.
    pub fn validate(&self) -> Result<()> {
        match self.fields.get("id") {
            Some(Value::String(id)) if !id.is_empty() => {}
            Some(Value::String(_)) => return Err(DeployError::invalid("'id' is empty")),
            Some(other) => {
                return Err(DeployError::invalid(format!(
                    "'id' must be a string, got {}",
                    kind_of(other)
                )));
            }
            None => return Err(DeployError::invalid("descriptor is missing 'id' key")),
        }

        match self.fields.get("env") {
            None | Some(Value::Object(_)) => Ok(()),
            Some(other) => Err(DeployError::invalid(format!(
                "'env' must be an object, got {}",
                kind_of(other)
            ))),
        }
    }

    /// Application id, if present as a string.
    pub fn id(&self) -> Option<&str> {
        self.fields.get("id").and_then(Value::as_str)
    }

    pub fn env(&self) -> Option<&Map<String, Value>> {
        self.fields.get("env").and_then(Value::as_object)
    }

    pub fn env_mut(&mut self) -> Option<&mut Map<String, Value>> {
        self.fields.get_mut("env").and_then(Value::as_object_mut)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Pretty-printed JSON, used for the audit output.
    pub fn to_pretty_json(&self) -> String {
        // Serializing a Map<String, Value> cannot fail
        serde_json::to_string_pretty(&self.fields).unwrap_or_default()
    }
}

impl serde::Serialize for Descriptor {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.fields.serialize(serializer)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_keeps_unknown_fields() {
        let descriptor =
            Descriptor::from_json(r#"{"id":"myapp","cpus":0.5,"labels":{"team":"core"}}"#)
                .unwrap();

        assert_eq!(descriptor.id(), Some("myapp"));
        assert_eq!(descriptor.fields()["cpus"], json!(0.5));
        assert_eq!(descriptor.fields()["labels"], json!({"team": "core"}));
    }

    #[test]
    fn from_json_rejects_garbage() {
        let err = Descriptor::from_json("{ nope").unwrap_err();
        assert!(matches!(err, DeployError::MissingConfiguration { .. }));
    }

    #[test]
    fn from_value_rejects_non_objects() {
        for value in [json!(null), json!([]), json!("myapp"), json!({})] {
            let err = Descriptor::from_value(value).unwrap_err();
            assert!(matches!(err, DeployError::MissingConfiguration { .. }));
        }
    }

    #[test]
    fn validate_requires_string_id() {
        let missing = Descriptor::from_value(json!({"cpus": 1})).unwrap();
        assert!(matches!(
            missing.validate(),
            Err(DeployError::InvalidDescriptor { .. })
        ));

        let numeric = Descriptor::from_value(json!({"id": 7})).unwrap();
        assert!(matches!(
            numeric.validate(),
            Err(DeployError::InvalidDescriptor { .. })
        ));

        let empty = Descriptor::from_value(json!({"id": ""})).unwrap();
        assert!(empty.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_object_env() {
        let descriptor = Descriptor::from_value(json!({"id": "a", "env": ["X=1"]})).unwrap();
        let err = descriptor.validate().unwrap_err();
        assert!(err.to_string().contains("'env' must be an object"));
    }

    #[test]
    fn serializes_as_plain_object() {
        let descriptor = Descriptor::from_value(json!({"id": "a", "env": {"K": "v"}})).unwrap();
        let text = serde_json::to_string(&descriptor).unwrap();
        assert_eq!(text, r#"{"id":"a","env":{"K":"v"}}"#);
    }
}
