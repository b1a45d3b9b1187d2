//! Principal attributes supplied on the command line.
//!
//! Attributes come from a JSON document (`{"memberof": ["staff"], "uid": "casuser"}`)
//! and/or repeated `name=value` pairs. Repeating a name collects its values.

use crate::access_strategy::{AttributeValue, PrincipalAttributes};
use crate::error::AttributeError;
use std::path::Path;

/// Parse `name=value` pairs into principal attributes.
pub fn parse_attribute_pairs<S: AsRef<str>>(
    pairs: &[S],
) -> Result<PrincipalAttributes, AttributeError> {
    let mut attributes = PrincipalAttributes::new();

    for pair in pairs {
        let pair = pair.as_ref();
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| AttributeError::Malformed(pair.to_string()))?;

        let name = name.trim();
        if name.is_empty() {
            return Err(AttributeError::EmptyName(pair.to_string()));
        }

        add_value(&mut attributes, name, value);
    }

    Ok(attributes)
}

/// Read principal attributes from a JSON object.
pub fn parse_attributes_json(json: &str) -> Result<PrincipalAttributes, AttributeError> {
    Ok(serde_json::from_str(json)?)
}

pub fn read_attributes_file(path: &Path) -> Result<PrincipalAttributes, AttributeError> {
    let json = std::fs::read_to_string(path)?;
    parse_attributes_json(&json)
}

/// Merge `extra` into `base`, collecting values of attributes present in both.
pub fn merge_attributes(
    mut base: PrincipalAttributes,
    extra: PrincipalAttributes,
) -> PrincipalAttributes {
    for (name, value) in extra {
        match value {
            AttributeValue::Single(v) => add_value(&mut base, &name, v),
            AttributeValue::Multi(values) => {
                for v in values {
                    add_value(&mut base, &name, v);
                }
            }
        }
    }
    base
}

fn add_value(attributes: &mut PrincipalAttributes, name: &str, value: impl Into<String>) {
    match attributes.get_mut(name) {
        Some(existing) => existing.push(value),
        None => {
            attributes.insert(name.to_string(), AttributeValue::Single(value.into()));
        }
    }
}
