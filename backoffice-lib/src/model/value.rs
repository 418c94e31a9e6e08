//! Value enum for dynamic cell values

use std::fmt;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;

/// A dynamic value held by one field of a [`Row`](super::Row).
///
/// Rows arrive from the backend as open JSON objects, so values are kept
/// loosely typed and only interpreted when a column presentation asks for it.
///
/// | JSON | Rust Variant |
/// |------|--------------|
/// | null | `Null` |
/// | true / false | `Bool` |
/// | integer | `Int` |
/// | fraction / out-of-range integer | `Float` |
/// | string | `String` |
/// | array / object | `Json` |
///
/// # Example
///
/// ```
/// use backoffice_lib::model::Value;
///
/// assert_eq!(Value::from("Acme").to_display_string(), "Acme");
/// assert_eq!(Value::from(3i64).to_display_string(), "3");
/// assert_eq!(Value::Null.to_display_string(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// Null/missing value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    String(String),
    /// Fallback for nested JSON the table does not interpret.
    Json(serde_json::Value),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Json(_) => "json",
        }
    }

    /// String form used for searching, sorting and fallback rendering.
    ///
    /// Null renders as the empty string.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => s.clone(),
            Value::Json(serde_json::Value::String(s)) => s.clone(),
            Value::Json(v) => v.to_string(),
        }
    }

    /// Truthiness used by boolean presentations.
    ///
    /// Empty strings, zero and null are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0 && !f.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Json(_) => true,
        }
    }

    /// Interprets the value as a number.
    ///
    /// Numeric strings such as `"1999.90"` (how decimal fields are serialized)
    /// are parsed. Returns `None` for anything that is not a finite number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) if f.is_finite() => Some(*f),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        }
    }

    /// Interprets the value as an exact decimal.
    ///
    /// Prefer this over [`as_f64`](Self::as_f64) for money so that
    /// `"0.10"` does not pick up binary rounding noise.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Int(n) => Some(Decimal::from(*n)),
            Value::Float(f) if f.is_finite() => Decimal::try_from(*f).ok(),
            Value::String(s) => s.trim().parse::<Decimal>().ok(),
            _ => None,
        }
    }

    /// Returns the string slice if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s),
            other => Value::Json(other),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_variants() {
        let values: Vec<Value> =
            serde_json::from_str(r#"[null, true, 3, 2.5, "x", [1, 2], {"a": 1}]"#).unwrap();

        assert_eq!(values[0], Value::Null);
        assert_eq!(values[1], Value::Bool(true));
        assert_eq!(values[2], Value::Int(3));
        assert_eq!(values[3], Value::Float(2.5));
        assert_eq!(values[4], Value::String("x".to_string()));
        assert_eq!(values[5].type_name(), "json");
        assert_eq!(values[6].type_name(), "json");
    }

    #[test]
    fn test_display_string() {
        assert_eq!(Value::Null.to_display_string(), "");
        assert_eq!(Value::Bool(false).to_display_string(), "false");
        assert_eq!(Value::Float(3.0).to_display_string(), "3");
        assert_eq!(Value::Float(0.5).to_display_string(), "0.5");
        assert_eq!(
            Value::Json(serde_json::json!([1, 2])).to_display_string(),
            "[1,2]"
        );
    }

    #[test]
    fn test_numeric_interpretation() {
        assert_eq!(Value::from("1999.90").as_f64(), Some(1999.9));
        assert_eq!(Value::from(" 12 ").as_f64(), Some(12.0));
        assert_eq!(Value::from("abc").as_f64(), None);
        assert_eq!(Value::Null.as_f64(), None);
        assert_eq!(
            Value::from("0.10").as_decimal(),
            Some(Decimal::new(10, 2))
        );
    }

    #[test]
    fn test_truthiness() {
        assert!(Value::Bool(true).is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::from(1i64).is_truthy());
    }
}
