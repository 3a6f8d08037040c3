/// Payload parsers

pub mod json;
pub mod logfmt;

// Re-export parser implementations
pub use json::JsonParser;
pub use logfmt::{decode_logfmt, LogfmtParser};
