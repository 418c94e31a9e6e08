//! Dynamic table row

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use super::Value;

static NULL: Value = Value::Null;

/// One record as returned by a table read or a create call.
///
/// Rows are open field maps; the column descriptors shipped alongside them
/// decide which fields are shown. A row has no identity of its own: table
/// positions identify rows within the current page only.
///
/// # Example
///
/// ```
/// use backoffice_lib::model::Row;
///
/// let row = Row::new().set("name", "Acme").set("quantity", 3i64);
/// assert_eq!(row.get("name").to_display_string(), "Acme");
/// assert!(row.get("missing").is_null());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: HashMap<String, Value>,
}

impl Row {
    /// Creates a new empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of a field, or `Null` when the field is absent.
    pub fn get(&self, field: &str) -> &Value {
        self.fields.get(field).unwrap_or(&NULL)
    }

    /// Returns `true` if the row contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_open_object() {
        let json = r#"{"id": 7, "name": "Acme", "price": "10.50", "is_active": true, "note": null}"#;
        let row: Row = serde_json::from_str(json).unwrap();

        assert_eq!(row.len(), 5);
        assert_eq!(row.get("id"), &Value::Int(7));
        assert_eq!(row.get("price").as_str(), Some("10.50"));
        assert!(row.get("note").is_null());
        assert!(row.get("absent").is_null());
        assert!(!row.contains("absent"));
    }

    #[test]
    fn test_serialize_roundtrip_keeps_fields() {
        let row = Row::new().set("name", "Widget").set("quantity", 4i64);
        let json = serde_json::to_value(&row).unwrap();

        assert_eq!(json["name"], "Widget");
        assert_eq!(json["quantity"], 4);
    }
}
