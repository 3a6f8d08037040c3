//! The fixed recognizer chain.
//!
//! Order matters: bare formats first, then prefix adapters. The first
//! recognizer that returns `Ok` owns the line.

use super::formats::{JsonParser, LogfmtParser};
use super::prefix::{split_compose_prefix, split_container_prefix, split_zap_dev_prefix};
use super::traits::*;

/// Field added by the docker-compose adapter
pub const SERVICE_FIELD: &str = "service";
/// Field added by the zap dev adapter
pub const CALLER_FIELD: &str = "caller";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recognizer {
    Json,
    Logfmt,
    /// CRI or docker-compose prefix around a JSON payload
    ContainerJson,
    /// CRI or docker-compose prefix around a logfmt payload
    ContainerLogfmt,
    /// zap development encoder banner followed by a JSON body
    ZapDevJson,
}

impl Recognizer {
    pub const CHAIN: [Recognizer; 5] = [
        Recognizer::Json,
        Recognizer::Logfmt,
        Recognizer::ContainerJson,
        Recognizer::ContainerLogfmt,
        Recognizer::ZapDevJson,
    ];

    /// Parser for the payload once any prefix is removed.
    fn payload_parser(&self) -> &'static dyn LogParser {
        match self {
            Recognizer::Json | Recognizer::ContainerJson | Recognizer::ZapDevJson => &JsonParser,
            Recognizer::Logfmt | Recognizer::ContainerLogfmt => &LogfmtParser,
        }
    }

    /// Renderer-state family of the recognized payload.
    pub fn format(&self) -> LogFormat {
        self.payload_parser().format()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recognizer::Json => "json",
            Recognizer::Logfmt => "logfmt",
            Recognizer::ContainerJson => "container_json",
            Recognizer::ContainerLogfmt => "container_logfmt",
            Recognizer::ZapDevJson => "zap_dev_json",
        }
    }

    pub fn try_handle(&self, line: &[u8], candidates: FieldCandidates<'_>) -> Result<StructuredEvent, ParseError> {
        let parser = self.payload_parser();
        match self {
            Recognizer::Json | Recognizer::Logfmt => parser.parse(line, candidates),
            Recognizer::ContainerJson | Recognizer::ContainerLogfmt => parse_container(line, parser, candidates),
            Recognizer::ZapDevJson => parse_zap_dev(line, parser, candidates),
        }
    }
}

fn parse_container(
    line: &[u8],
    inner: &dyn LogParser,
    candidates: FieldCandidates<'_>,
) -> Result<StructuredEvent, ParseError> {
    if let Some(split) = split_container_prefix(line) {
        let mut event = inner.parse(split.payload, candidates)?;
        if event.timestamp.is_none() {
            event.timestamp = Some(split.timestamp);
        }
        return Ok(event);
    }

    if let Some((service, payload)) = split_compose_prefix(line) {
        let mut event = inner.parse(&payload, candidates)?;
        event.fields.entry(SERVICE_FIELD.to_string()).or_insert(service);
        return Ok(event);
    }

    Err(ParseError::NoMatch)
}

fn parse_zap_dev(
    line: &[u8],
    body: &dyn LogParser,
    candidates: FieldCandidates<'_>,
) -> Result<StructuredEvent, ParseError> {
    let banner = split_zap_dev_prefix(line).ok_or(ParseError::NoMatch)?;
    let mut event = body.parse(banner.body, candidates)?;

    // The banner is authoritative for the three roles; keys are zap's own names
    event.timestamp = Some(banner.timestamp);
    event.level = Some(banner.level);
    event.message = Some(banner.message.to_string());
    event.role_keys.time = Some("ts".to_string());
    event.role_keys.level = Some("level".to_string());
    event.role_keys.message = Some("msg".to_string());
    event.fields.insert(CALLER_FIELD.to_string(), banner.caller.to_string());

    Ok(event)
}
