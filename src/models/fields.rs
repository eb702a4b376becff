// src/models/fields.rs
// DOCUMENTATION: Serde helpers for submitted form fields
// PURPOSE: Normalize text before the validator derive sees it

use serde::{Deserialize, Deserializer};

/// Trim surrounding whitespace from a required text field
pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

/// Trim surrounding whitespace from an optional text field
/// Use with `#[serde(default)]` so an absent field stays None.
pub fn trimmed_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|text| text.trim().to_string()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<String>),
    One(String),
}

/// Accept a list or a single value for a list field
/// A form with one checked box sends a plain value instead of a sequence.
pub fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(values) => values,
        OneOrMany::One(value) => vec![value],
    })
}
