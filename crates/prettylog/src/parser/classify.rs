//! Field classification: assigns the time, message and level roles.
//!
//! Roles are filled in precedence order (time, message, level). For each role
//! the candidate names are walked in list order and the first key present in
//! the record wins; time additionally requires the value to resolve. A key
//! claimed by a role never reaches `fields`. An empty message or level value
//! is consumed but leaves the role open for the next candidate.

use super::model::StructuredEvent;
use super::time::{resolve_time, TimeValue};

/// Ordered candidate key names per role.
#[derive(Debug, Clone, Copy)]
pub struct FieldCandidates<'a> {
    pub time: &'a [String],
    pub message: &'a [String],
    pub level: &'a [String],
}

/// A decoded value, keeping numbers numeric for epoch resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number { value: f64, text: String },
}

impl FieldValue {
    fn time_value(&self) -> TimeValue<'_> {
        match self {
            FieldValue::Text(s) => TimeValue::Text(s),
            FieldValue::Number { value, .. } => TimeValue::Number(*value),
        }
    }

    fn into_string(self) -> String {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Number { text, .. } => text,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

pub fn classify(mut pairs: Vec<(String, FieldValue)>, candidates: FieldCandidates<'_>) -> StructuredEvent {
    let mut event = StructuredEvent::default();

    for name in candidates.time {
        let resolved = pairs
            .iter()
            .find(|(k, _)| k == name)
            .and_then(|(_, v)| resolve_time(v.time_value()));
        if let Some(ts) = resolved {
            event.timestamp = Some(ts);
            event.role_keys.time = Some(name.clone());
            pairs.retain(|(k, _)| k != name);
            break;
        }
    }

    if let Some((name, value)) = claim(&mut pairs, candidates.message) {
        event.message = Some(value);
        event.role_keys.message = Some(name);
    }

    if let Some((name, value)) = claim(&mut pairs, candidates.level) {
        event.level = Some(value);
        event.role_keys.level = Some(name);
    }

    event.fields.reserve(pairs.len());
    for (key, value) in pairs {
        // Duplicate keys: last occurrence wins
        event.fields.insert(key, value.into_string());
    }

    event
}

/// Take the first candidate key present in `pairs` with a non-empty value.
/// Every occurrence of a visited candidate is removed, empty ones included.
fn claim(pairs: &mut Vec<(String, FieldValue)>, names: &[String]) -> Option<(String, String)> {
    for name in names {
        if !pairs.iter().any(|(k, _)| k == name) {
            continue;
        }
        let (taken, rest): (Vec<_>, Vec<_>) = std::mem::take(pairs).into_iter().partition(|(k, _)| k == name);
        *pairs = rest;

        let value = taken.into_iter().map(|(_, v)| v.into_string()).find(|v| !v.is_empty());
        if let Some(value) = value {
            return Some((name.clone(), value));
        }
    }
    None
}
