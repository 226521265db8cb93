//! # MassMailer Attributes
//!
//! Attributes are named, typed configuration fields attached to a mail
//! campaign. Each one has two capabilities:
//!
//! - [`DeclaredDefault`]: the key/default pair it contributes
//! - [`ComputedValue`]: a value produced at send time, `false` unless overridden
//!
//! Types usually implement both and are wrapped with [`Attribute::new`];
//! [`Attribute::compose`] pairs independent providers instead.
//!
//! ```
//! use massmailer_attributes::{
//!     Attribute, AttributeParam, AttributeSet, AttributeValue, ComputedValue, DeclaredDefault,
//! };
//!
//! struct IncludeInstagram;
//!
//! impl DeclaredDefault for IncludeInstagram {
//!     fn get(&self) -> AttributeParam {
//!         AttributeParam::with_default::<Self>(true)
//!     }
//! }
//!
//! impl ComputedValue for IncludeInstagram {}
//!
//! let mut set = AttributeSet::new();
//! set.insert(Attribute::new(IncludeInstagram));
//!
//! assert_eq!(set.defaults()["IncludeInstagram"], true);
//! assert_eq!(set.values()["IncludeInstagram"], false);
//! ```

mod param;
mod value;

pub use param::{short_type_name, AttributeParam};
pub use value::AttributeValue;

use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Provides the key/default pair of an attribute.
pub trait DeclaredDefault: Send + Sync {
    /// The attribute's key and declared default.
    fn get(&self) -> AttributeParam;
}

/// Provides an attribute's internally generated value.
pub trait ComputedValue: Send + Sync {
    /// Value generated at send time. Defaults to [`no_value`].
    fn get_value(&self) -> AttributeValue {
        no_value()
    }
}

/// The computed value of an attribute that generates nothing: `false`.
pub fn no_value() -> AttributeValue {
    AttributeValue::Bool(false)
}

/// An attribute assembled from its two capabilities.
#[derive(Clone)]
pub struct Attribute {
    declared: Arc<dyn DeclaredDefault>,
    computed: Arc<dyn ComputedValue>,
}

impl Attribute {
    /// Wrap a type providing both capabilities.
    pub fn new<A>(attribute: A) -> Self
    where
        A: DeclaredDefault + ComputedValue + 'static,
    {
        let shared = Arc::new(attribute);
        Self {
            declared: shared.clone(),
            computed: shared,
        }
    }

    /// Pair independent providers.
    pub fn compose(
        declared: impl DeclaredDefault + 'static,
        computed: impl ComputedValue + 'static,
    ) -> Self {
        Self {
            declared: Arc::new(declared),
            computed: Arc::new(computed),
        }
    }

    /// Key and declared default.
    pub fn get(&self) -> AttributeParam {
        self.declared.get()
    }

    /// Attribute key.
    pub fn key(&self) -> String {
        self.get().key
    }

    /// Computed value.
    pub fn get_value(&self) -> AttributeValue {
        self.computed.get_value()
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let param = self.get();
        f.debug_struct("Attribute")
            .field("key", &param.key)
            .field("default", &param.default)
            .finish()
    }
}

/// Ordered collection of a campaign's attributes, unique by key.
#[derive(Debug, Clone, Default)]
pub struct AttributeSet {
    attributes: Vec<Attribute>,
}

impl AttributeSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute, replacing any with the same key in place.
    pub fn insert(&mut self, attribute: Attribute) -> &mut Self {
        let key = attribute.key();
        match self.attributes.iter().position(|a| a.key() == key) {
            Some(index) => {
                warn!(key = %key, "Replacing attribute with duplicate key");
                self.attributes[index] = attribute;
            }
            None => self.attributes.push(attribute),
        }
        self
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, attribute: Attribute) -> Self {
        self.insert(attribute);
        self
    }

    /// Look up an attribute by key.
    pub fn get(&self, key: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.key() == key)
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }

    /// Declared defaults keyed by attribute key.
    pub fn defaults(&self) -> Map<String, Value> {
        self.attributes
            .iter()
            .map(|a| {
                let (key, default) = a.get().into_pair();
                (key, default.to_json())
            })
            .collect()
    }

    /// Computed values keyed by attribute key.
    pub fn values(&self) -> Map<String, Value> {
        self.attributes
            .iter()
            .map(|a| (a.key(), a.get_value().to_json()))
            .collect()
    }
}

impl FromIterator<Attribute> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        let mut set = Self::new();
        for attribute in iter {
            set.insert(attribute);
        }
        set
    }
}
