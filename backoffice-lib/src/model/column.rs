//! Server-declared table schema

use serde::Deserialize;
use serde::Serialize;

use super::Row;

/// Metadata describing one table column, as declared by the backend.
///
/// `column_type` is the presentation category. The backend emits serializer
/// class names (`"BooleanField"`, `"DecimalField"`, ...); see
/// [`ColumnKind`](crate::columns::ColumnKind) for the accepted names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Key into each row.
    pub field: String,
    /// Display name.
    pub label: String,
    /// Presentation category.
    #[serde(rename = "type")]
    pub column_type: String,
}

impl ColumnDescriptor {
    /// Creates a new column descriptor.
    pub fn new(
        field: impl Into<String>,
        label: impl Into<String>,
        column_type: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            column_type: column_type.into(),
        }
    }
}

/// A table read payload: `{ "columns": [...], "rows": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    /// Column descriptors, in display order.
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
    /// Row data.
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl TableData {
    /// Creates a table payload.
    pub fn new(columns: Vec<ColumnDescriptor>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_table_payload() {
        let json = r#"{
            "columns": [
                {"label": "Name", "field": "name", "type": "CharField"},
                {"label": "Active", "field": "is_active", "type": "BooleanField"}
            ],
            "rows": [{"name": "Acme", "is_active": true}]
        }"#;
        let data: TableData = serde_json::from_str(json).unwrap();

        assert_eq!(data.columns.len(), 2);
        assert_eq!(data.columns[1].column_type, "BooleanField");
        assert_eq!(data.rows[0].get("name").to_display_string(), "Acme");
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let data: TableData = serde_json::from_str("{}").unwrap();
        assert!(data.is_empty());
        assert!(data.columns.is_empty());
    }
}
