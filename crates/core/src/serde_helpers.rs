//! Lenient deserializers for loosely-typed backend fields.

use serde::{Deserialize, Deserializer};

use crate::types::Date;

/// Accept a string or a number and yield its string form.
///
/// Identity numbers (DNI) are stored as numbers for some tenants and as
/// strings for others.
pub fn string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Str(s)) => Some(s),
        Some(Raw::Int(n)) => Some(n.to_string()),
        Some(Raw::Float(n)) => Some(n.to_string()),
    })
}

/// Accept `YYYY-MM-DD`, a full ISO-8601 timestamp, an empty string or null.
pub fn lenient_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Date>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return Ok(None);
    };
    let day = raw.trim().get(..10).unwrap_or(raw.trim());
    Date::parse_from_str(day, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| serde::de::Error::custom(format!("invalid date '{raw}': {e}")))
}
