//! Attribute values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value an attribute declares or computes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// No value.
    #[default]
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Whole number.
    Integer(i64),
    /// Text.
    String(String),
}

impl AttributeValue {
    /// Whether this is [`AttributeValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Convert into a JSON value for template variables.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Integer(i) => serde_json::Value::from(*i),
            Self::String(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u32> for AttributeValue {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_untagged_serialization() {
        assert_eq!(serde_json::to_value(AttributeValue::from(5)).unwrap(), json!(5));
        assert_eq!(serde_json::to_value(AttributeValue::from(true)).unwrap(), json!(true));
        assert_eq!(serde_json::to_value(AttributeValue::from("bar")).unwrap(), json!("bar"));
        assert_eq!(serde_json::to_value(AttributeValue::Null).unwrap(), json!(null));
    }

    #[test]
    fn test_deserialize_picks_variant() {
        let value: AttributeValue = serde_json::from_str("42").unwrap();
        assert_eq!(value, AttributeValue::Integer(42));

        let value: AttributeValue = serde_json::from_str("false").unwrap();
        assert_eq!(value, AttributeValue::Bool(false));
    }

    #[test]
    fn test_option_conversion() {
        assert!(AttributeValue::from(None::<i64>).is_null());
        assert_eq!(AttributeValue::from(Some("x")), AttributeValue::String("x".into()));
    }
}
