//! The key/default pair an attribute declares.

use serde::Serialize;

use crate::AttributeValue;

/// An attribute's key together with its declared default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeParam {
    /// Attribute key, the short name of the declaring type.
    pub key: String,
    /// Declared default value.
    pub default: AttributeValue,
}

impl AttributeParam {
    /// Param keyed by `T` with no declared default.
    pub fn new<T: ?Sized>() -> Self {
        Self::keyed(short_type_name::<T>(), AttributeValue::Null)
    }

    /// Param keyed by `T` with the given default.
    pub fn with_default<T: ?Sized>(default: impl Into<AttributeValue>) -> Self {
        Self::keyed(short_type_name::<T>(), default)
    }

    /// Param with an explicit key.
    pub fn keyed(key: impl Into<String>, default: impl Into<AttributeValue>) -> Self {
        Self {
            key: key.into(),
            default: default.into(),
        }
    }

    /// Split into `(key, default)`.
    pub fn into_pair(self) -> (String, AttributeValue) {
        (self.key, self.default)
    }
}

/// Last path segment of `T`'s type name, without generic arguments.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
