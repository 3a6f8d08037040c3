use std::collections::HashMap;
use thiserror::Error;
use serde::{Serialize, Deserialize};
use chrono::{DateTime, FixedOffset};


/// Renderer-state family a recognizer belongs to.
///
/// Prefix adapters report the family of the recognizer they delegate to,
/// so a docker-compose wrapped JSON line shares unchanged-field memory
/// with a bare JSON line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// JSON object lines
    Json,
    /// Logfmt key=value lines (logrus TextFormatter, go-kit, ...)
    Logfmt,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Json => "json",
            LogFormat::Logfmt => "logfmt",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Non-UTF8 content")]
    NonUtf8,

    #[error("Parse failed: {0}")]
    ParseFailed(String),

    #[error("Prefix not present")]
    NoMatch,
}

/// Source keys that were claimed by the time/message/level roles.
///
/// Kept so that `--skip` can hide a role by the key it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoleKeys {
    pub time: Option<String>,
    pub message: Option<String>,
    pub level: Option<String>,
}

/// One log line, parsed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StructuredEvent {
    /// Application-provided timestamp, offset preserved as written
    pub timestamp: Option<DateTime<FixedOffset>>,

    /// Main log message
    pub message: Option<String>,

    /// Free-form level string (info, warn, error, ...)
    pub level: Option<String>,

    /// Remaining key/value pairs. Order is irrelevant, the renderer sorts.
    pub fields: HashMap<String, String>,

    #[serde(skip)]
    pub role_keys: RoleKeys,
}

impl StructuredEvent {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}
