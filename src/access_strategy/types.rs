//! Principal attribute types
//!
//! Attribute values released by the authentication layer are either a single
//! value or a collection of values. Scalars of any kind are coerced to their
//! string form when deserialized.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

/// Attributes describing an authenticated principal, keyed by attribute name.
pub type PrincipalAttributes = HashMap<String, AttributeValue>;

/// Attribute rules of a policy: attribute name to the set of value patterns.
pub type AttributeRules = BTreeMap<String, BTreeSet<String>>;

/// A single principal attribute value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, from = "RawValue")]
pub enum AttributeValue {
    /// One value
    Single(String),
    /// Several values released under the same attribute name
    Multi(Vec<String>),
}

impl AttributeValue {
    /// Normalize the value to the set of distinct strings it carries.
    pub fn value_set(&self) -> HashSet<&str> {
        match self {
            AttributeValue::Single(value) => HashSet::from([value.as_str()]),
            AttributeValue::Multi(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Add a value, turning a single value into a collection.
    pub fn push(&mut self, value: impl Into<String>) {
        let value = value.into();
        match self {
            AttributeValue::Single(existing) => {
                let first = std::mem::take(existing);
                *self = AttributeValue::Multi(vec![first, value]);
            }
            AttributeValue::Multi(values) => values.push(value),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Single(value) => f.write_str(value),
            AttributeValue::Multi(values) => write!(f, "[{}]", values.join(", ")),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Single(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Single(value)
    }
}

impl<T: Into<String>> From<Vec<T>> for AttributeValue {
    fn from(values: Vec<T>) -> Self {
        AttributeValue::Multi(values.into_iter().map(Into::into).collect())
    }
}

/// Wire shape accepted when deserializing an attribute value
#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Many(Vec<Scalar>),
    One(Scalar),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::UInt(u) => u.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Text(s) => s,
        }
    }
}

impl From<RawValue> for AttributeValue {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::One(scalar) => AttributeValue::Single(scalar.into()),
            RawValue::Many(scalars) => {
                AttributeValue::Multi(scalars.into_iter().map(String::from).collect())
            }
        }
    }
}
