//! Lenient field coercion for ingested records.
//!
//! Records arrive from an external document store with loosely typed
//! fields. Numeric fields accept integers, floats (truncated) and numeric
//! strings; anything else falls back to the field default. Identifiers
//! accept strings or integers.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Default credit count when missing or malformed.
pub const DEFAULT_CREDITS: i64 = 3;

/// Default room capacity when missing or malformed.
pub const DEFAULT_CAPACITY: i64 = 0;

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseInt {
    Int(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

impl LooseInt {
    fn resolve(self, default: i64) -> i64 {
        match self {
            LooseInt::Int(v) => v,
            LooseInt::Float(v) if v.is_finite() => v.trunc() as i64,
            LooseInt::Text(s) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }
}

fn int_or<'de, D: Deserializer<'de>>(deserializer: D, default: i64) -> Result<i64, D::Error> {
    Ok(LooseInt::deserialize(deserializer)?.resolve(default))
}

pub(crate) fn credits<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    int_or(deserializer, DEFAULT_CREDITS)
}

pub(crate) fn capacity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    int_or(deserializer, DEFAULT_CAPACITY)
}

pub(crate) fn default_credits() -> i64 {
    DEFAULT_CREDITS
}

#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum LooseId {
    Text(String),
    Int(i64),
}

impl From<LooseId> for String {
    fn from(id: LooseId) -> Self {
        match id {
            LooseId::Text(s) => s,
            LooseId::Int(n) => n.to_string(),
        }
    }
}

pub(crate) fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    LooseId::deserialize(deserializer).map(String::from)
}

/// Optional identifier; `null`, missing and empty strings all mean "none".
pub(crate) fn opt_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let id = Option::<LooseId>::deserialize(deserializer)?.map(String::from);
    Ok(id.filter(|s| !s.is_empty()))
}

/// Optional display label; `null` and missing mean "none".
pub(crate) fn opt_label<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<LooseId>::deserialize(deserializer)?.map(String::from))
}
