use crate::parser::classify::classify;
use crate::parser::traits::*;
use serde_json::Value;

/// Parses a single JSON object per line.
pub struct JsonParser;

impl LogParser for JsonParser {
    fn parse(&self, raw: &[u8], candidates: FieldCandidates<'_>) -> Result<StructuredEvent, ParseError> {
        // Quick reject before paying for a full parse
        if !trim_ascii_start(raw).starts_with(b"{") {
            return Err(ParseError::InvalidFormat("JSON object must start with '{'".to_string()));
        }

        let value: Value = serde_json::from_slice(raw)
            .map_err(|e| ParseError::ParseFailed(format!("Invalid JSON: {}", e)))?;

        let obj = match value {
            Value::Object(obj) => obj,
            _ => return Err(ParseError::InvalidFormat("JSON is not an object".to_string())),
        };

        let pairs = obj
            .into_iter()
            .map(|(key, value)| (key, field_value(value)))
            .collect();

        Ok(classify(pairs, candidates))
    }

    fn format(&self) -> LogFormat {
        LogFormat::Json
    }
}

// Helper functions

fn trim_ascii_start(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(bytes.len());
    &bytes[start..]
}

fn field_value(value: Value) -> FieldValue {
    match value {
        Value::String(s) => FieldValue::Text(s),
        Value::Number(n) => match n.as_f64() {
            Some(f) => FieldValue::Number { value: f, text: n.to_string() },
            None => FieldValue::Text(n.to_string()),
        },
        Value::Bool(b) => FieldValue::Text(b.to_string()),
        Value::Null => FieldValue::Text("null".to_string()),
        // Nested structures are kept as compact JSON
        nested @ (Value::Object(_) | Value::Array(_)) => FieldValue::Text(nested.to_string()),
    }
}
