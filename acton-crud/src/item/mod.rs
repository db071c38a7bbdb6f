//! Item value access
//!
//! The controller never touches item attributes directly. It reads and writes
//! them through [`FieldAccess`], which concrete entity types implement, or
//! through the overridable hooks on [`CrudStore`](crate::store::CrudStore).
//!
//! Two generic shapes are provided: [`Record`] (id plus ordered key/value
//! pairs) and `serde_json::Value`, which is accessible only when it holds a
//! JSON object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CrudError;
use crate::fields::value_text;

/// Read/write capability over an item's named attributes
pub trait FieldAccess {
    /// Identifier of a persisted item, `None` for an item not yet saved
    fn id(&self) -> Option<String>;

    /// Read a field value; missing fields read as `Value::Null`
    ///
    /// # Errors
    ///
    /// Returns [`CrudError::UnsupportedItemShape`] if the item cannot be
    /// addressed by field name.
    fn get_field(&self, name: &str) -> Result<Value, CrudError>;

    /// Write a field value
    ///
    /// # Errors
    ///
    /// Returns [`CrudError::UnsupportedItemShape`] if the item cannot be
    /// addressed by field name.
    fn set_field(&mut self, name: &str, value: Value) -> Result<(), CrudError>;
}

/// Generic key/value item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Identifier, assigned by the store on first save
    pub id: Option<String>,
    /// Attribute values
    pub values: Map<String, Value>,
}

impl Record {
    /// Create an unsaved record
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record with a known id
    #[must_use]
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            values: Map::new(),
        }
    }

    /// Builder-style setter used when seeding data
    #[must_use]
    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Borrow a value without cloning
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

impl FieldAccess for Record {
    fn id(&self) -> Option<String> {
        self.id.clone()
    }

    fn get_field(&self, name: &str) -> Result<Value, CrudError> {
        match self.values.get(name) {
            Some(value) => Ok(value.clone()),
            None if name == "id" => Ok(self.id.clone().map_or(Value::Null, Value::String)),
            None => Ok(Value::Null),
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<(), CrudError> {
        // "id" is the record's key, not a stored value
        if name == "id" {
            self.values.remove(name);
            self.id = Some(value_text(&value)).filter(|id| !id.is_empty());
        } else {
            self.values.insert(name.to_string(), value);
        }
        Ok(())
    }
}

impl FieldAccess for Value {
    fn id(&self) -> Option<String> {
        self.as_object()
            .and_then(|object| object.get("id"))
            .map(value_text)
            .filter(|id| !id.is_empty())
    }

    fn get_field(&self, name: &str) -> Result<Value, CrudError> {
        match self {
            Self::Object(object) => Ok(object.get(name).cloned().unwrap_or(Self::Null)),
            other => Err(unsupported(other)),
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<(), CrudError> {
        match self {
            Self::Object(object) => {
                object.insert(name.to_string(), value);
                Ok(())
            }
            other => Err(unsupported(other)),
        }
    }
}

fn unsupported(value: &Value) -> CrudError {
    let shape = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    CrudError::UnsupportedItemShape(format!(
        "expected item to be an object or a record, got {shape}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_access() {
        let mut record = Record::with_id("7").set("title", "Hello");
        assert_eq!(record.id(), Some("7".to_string()));
        assert_eq!(record.get_field("title").unwrap(), json!("Hello"));
        assert_eq!(record.get_field("missing").unwrap(), Value::Null);

        record.set_field("title", json!("Bye")).unwrap();
        assert_eq!(record.get("title"), Some(&json!("Bye")));
    }

    #[test]
    fn test_record_id_as_field() {
        let mut record = Record::with_id("7");
        assert_eq!(record.get_field("id").unwrap(), json!("7"));
        assert_eq!(Record::new().get_field("id").unwrap(), Value::Null);

        record.set_field("id", json!(8)).unwrap();
        assert_eq!(record.id(), Some("8".to_string()));
        assert!(record.get("id").is_none());

        record.set_field("id", json!("")).unwrap();
        assert_eq!(record.id(), None);
    }

    #[test]
    fn test_json_object_access() {
        let mut item = json!({"id": 3, "title": "Hello"});
        assert_eq!(item.id(), Some("3".to_string()));
        assert_eq!(item.get_field("title").unwrap(), json!("Hello"));

        item.set_field("title", json!("Bye")).unwrap();
        assert_eq!(item["title"], json!("Bye"));
    }

    #[test]
    fn test_json_without_id() {
        assert_eq!(json!({"title": "x"}).id(), None);
        assert_eq!(json!({"id": ""}).id(), None);
    }

    #[test]
    fn test_unsupported_shape() {
        let mut item = json!(["not", "an", "object"]);
        assert!(matches!(
            item.get_field("title"),
            Err(CrudError::UnsupportedItemShape(_))
        ));
        assert!(matches!(
            item.set_field("title", json!(1)),
            Err(CrudError::UnsupportedItemShape(ref msg)) if msg.contains("array")
        ));
        assert_eq!(json!(5).id(), None);
    }
}
