//! Known line prefixes that wrap a structured payload.
//!
//! - `@cee: ` tags inserted by some syslog relays
//! - container runtime prefixes (CRI `TIMESTAMP STREAM [F|P] payload`,
//!   docker-compose `service  | payload`)
//! - zap's development encoder banner (`TIMESTAMP LEVEL caller message {json}`)
//!
//! All splitters are pure: they either return the pieces or `None`.

use std::borrow::Cow;
use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset};
use regex::bytes::Regex;

pub const CEE_TAG: &[u8] = b"@cee: ";

/// Remove a leading `@cee: ` tag if present.
pub fn strip_cee_tag(input: &[u8]) -> &[u8] {
    input.strip_prefix(CEE_TAG).unwrap_or(input)
}

/// A CRI log line split into its pieces.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerPrefix<'a> {
    pub timestamp: DateTime<FixedOffset>,
    pub stream: &'a str,
    pub payload: &'a [u8],
}

/// Split a container runtime prefix:
/// `2024-01-30T03:29:06.691716216Z stdout F {"level": "ERROR", ...}`
///
/// The `F`/`P` partial-line tag is optional so that plain
/// `TIMESTAMP stdout payload` lines match as well.
pub fn split_container_prefix(input: &[u8]) -> Option<ContainerPrefix<'_>> {
    // Minimum: YYYY-MM-DDTHH:MM:SSZ + space = 21 bytes
    if input.len() < 21 {
        return None;
    }

    // Quick check: does it look like an ISO8601 timestamp?
    if !input[0].is_ascii_digit() || input[4] != b'-' || input[7] != b'-' {
        return None;
    }
    if input[10] != b'T' || input[13] != b':' || input[16] != b':' {
        return None;
    }

    let ts_end = input.iter().position(|&b| b == b' ')?;
    let ts = std::str::from_utf8(&input[..ts_end]).ok()?;
    let timestamp = DateTime::parse_from_rfc3339(ts).ok()?;

    let rest = &input[ts_end + 1..];
    let stream_end = rest.iter().position(|&b| b == b' ')?;
    let stream = match &rest[..stream_end] {
        b"stdout" => "stdout",
        b"stderr" => "stderr",
        _ => return None,
    };

    let mut payload = &rest[stream_end + 1..];
    if payload.len() >= 2 && (payload[0] == b'F' || payload[0] == b'P') && payload[1] == b' ' {
        payload = &payload[2..];
    }

    Some(ContainerPrefix { timestamp, stream, payload })
}

static COMPOSE_PREFIX_REGEX: OnceLock<Regex> = OnceLock::new();

fn compose_prefix_regex() -> &'static Regex {
    COMPOSE_PREFIX_REGEX.get_or_init(|| {
        // `web_1  | payload`, service name may be padded to align the pipes
        Regex::new(r"(?-u)^(?P<service>[a-zA-Z0-9._-]+)\s+\| (?P<payload>.*)$")
            .expect("Failed to compile docker-compose prefix regex")
    })
}

/// Split a docker-compose prefix, returning the service name and payload.
///
/// Compose colors the service name, so escape codes are stripped first.
pub fn split_compose_prefix(input: &[u8]) -> Option<(String, Vec<u8>)> {
    let clean = strip_ansi_codes(input);
    let caps = compose_prefix_regex().captures(&clean)?;
    let service = std::str::from_utf8(caps.name("service")?.as_bytes()).ok()?.to_string();
    let payload = caps.name("payload")?.as_bytes().to_vec();
    Some((service, payload))
}

/// A zap development-encoder banner.
#[derive(Debug, Clone, PartialEq)]
pub struct ZapDevBanner<'a> {
    pub timestamp: DateTime<FixedOffset>,
    pub level: String,
    pub caller: &'a str,
    pub message: &'a str,
    pub body: &'a [u8],
}

static ZAP_DEV_REGEX: OnceLock<Regex> = OnceLock::new();

fn zap_dev_regex() -> &'static Regex {
    ZAP_DEV_REGEX.get_or_init(|| {
        Regex::new(
            r"(?x-u)
            ^(?P<ts>\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[-+]\d{2}:?\d{2}))
            \s+(?P<level>[A-Za-z]+)
            \s+(?P<caller>\S+:\d+)
            \s+(?P<msg>.*?)
            \t(?P<body>\{.*\})$
            ",
        )
        .expect("Failed to compile zap dev prefix regex")
    })
}

/// Split a zap development line:
/// `2021-02-05T12:41:48.053-0700\tDEBUG\tzapper/zapper.go:18\tsome message\t{"rand_index": 1}`
pub fn split_zap_dev_prefix(input: &[u8]) -> Option<ZapDevBanner<'_>> {
    let caps = zap_dev_regex().captures(input)?;
    let text = |name: &str| caps.name(name).and_then(|m| std::str::from_utf8(m.as_bytes()).ok());

    let ts = text("ts")?;
    let timestamp = DateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f%z")
        .or_else(|_| DateTime::parse_from_rfc3339(ts))
        .ok()?;

    Some(ZapDevBanner {
        timestamp,
        level: text("level")?.to_lowercase(),
        caller: text("caller")?,
        message: text("msg")?,
        body: caps.name("body")?.as_bytes(),
    })
}

static CSI_REGEX: OnceLock<Regex> = OnceLock::new();

/// Remove CSI escape sequences (`ESC [ params final`), which is all compose
/// uses to color service names. Borrows when there is nothing to remove.
pub fn strip_ansi_codes(input: &[u8]) -> Cow<'_, [u8]> {
    let re = CSI_REGEX.get_or_init(|| {
        Regex::new(r"(?-u)\x1b\[[0-?]*[ -/]*[@-~]").expect("Failed to compile CSI escape regex")
    });
    re.replace_all(input, &b""[..])
}
