use crate::parser::classify::classify;
use crate::parser::traits::*;
use std::iter::Peekable;
use std::str::Chars;

/// Parser for logrus/go-kit style `key=value` lines.
///
/// Decoding is strict: any token the decoder cannot fully consume fails the
/// whole line so it falls back to verbatim output instead of being half
/// rendered.
pub struct LogfmtParser;

impl LogParser for LogfmtParser {
    fn parse(&self, raw: &[u8], candidates: FieldCandidates<'_>) -> Result<StructuredEvent, ParseError> {
        if !raw.contains(&b'=') {
            return Err(ParseError::InvalidFormat("no '=' in line".to_string()));
        }

        let text = std::str::from_utf8(raw).map_err(|_| ParseError::NonUtf8)?;

        let pairs = decode_logfmt(text)?
            .into_iter()
            .map(|(key, value)| (key, FieldValue::Text(value)))
            .collect();

        Ok(classify(pairs, candidates))
    }

    fn format(&self) -> LogFormat {
        LogFormat::Logfmt
    }
}

/// Decode a full logfmt record. Every token must be `key=value`; a bare
/// word fails the record so prose containing a stray `=` is left alone.
pub fn decode_logfmt(text: &str) -> Result<Vec<(String, String)>, ParseError> {
    let mut chars = text.chars().peekable();
    let mut pairs = Vec::new();

    loop {
        while chars.peek().map_or(false, |c| c.is_whitespace()) {
            chars.next();
        }

        let Some(&first) = chars.peek() else {
            return Ok(pairs);
        };

        if first == '=' {
            return Err(ParseError::ParseFailed("unexpected '=' before key".to_string()));
        }

        let mut key = String::new();
        while let Some(&c) = chars.peek() {
            if c == '=' || c.is_whitespace() {
                break;
            }
            if c == '"' {
                return Err(ParseError::ParseFailed(format!("unexpected '\"' in key {:?}", key)));
            }
            key.push(c);
            chars.next();
        }

        if chars.peek() != Some(&'=') {
            return Err(ParseError::ParseFailed(format!("bare key {:?} without value", key)));
        }
        chars.next(); // Consume '='

        let value = match chars.peek() {
            Some('"') => {
                chars.next(); // Consume opening quote
                let value = read_quoted(&mut chars)?;
                if chars.peek().map_or(false, |c| !c.is_whitespace()) {
                    return Err(ParseError::ParseFailed(format!("garbage after quoted value of {:?}", key)));
                }
                value
            }
            _ => read_unquoted(&mut chars, &key)?,
        };

        pairs.push((key, value));
    }
}

fn read_quoted(chars: &mut Peekable<Chars<'_>>) -> Result<String, ParseError> {
    let mut val = String::new();

    while let Some(c) = chars.next() {
        match c {
            '"' => return Ok(val),
            '\\' => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| ParseError::ParseFailed("unterminated escape".to_string()))?;
                match escaped {
                    'n' => val.push('\n'),
                    't' => val.push('\t'),
                    'r' => val.push('\r'),
                    'u' => val.push(read_unicode_escape(chars)?),
                    // \" \\ \/ and anything else: keep the character
                    other => val.push(other),
                }
            }
            _ => val.push(c),
        }
    }

    Err(ParseError::ParseFailed("unterminated quoted value".to_string()))
}

fn read_unicode_escape(chars: &mut Peekable<Chars<'_>>) -> Result<char, ParseError> {
    let high = read_hex4(chars)?;
    if !(0xD800..=0xDBFF).contains(&high) {
        return char::from_u32(high).ok_or_else(|| invalid_escape(high));
    }

    // High surrogate: must be followed by `\u` and a low surrogate
    if chars.next() != Some('\\') || chars.next() != Some('u') {
        return Err(invalid_escape(high));
    }
    let low = read_hex4(chars)?;
    if !(0xDC00..=0xDFFF).contains(&low) {
        return Err(invalid_escape(low));
    }

    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
    char::from_u32(code).ok_or_else(|| invalid_escape(code))
}

fn read_hex4(chars: &mut Peekable<Chars<'_>>) -> Result<u32, ParseError> {
    let hex: String = chars.by_ref().take(4).collect();
    u32::from_str_radix(&hex, 16)
        .ok()
        .filter(|_| hex.len() == 4)
        .ok_or_else(|| ParseError::ParseFailed(format!("invalid unicode escape \\u{}", hex)))
}

fn invalid_escape(code: u32) -> ParseError {
    ParseError::ParseFailed(format!("invalid unicode escape \\u{:04x}", code))
}

fn read_unquoted(chars: &mut Peekable<Chars<'_>>, key: &str) -> Result<String, ParseError> {
    let mut val = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            break;
        }
        if c == '=' || c == '"' {
            return Err(ParseError::ParseFailed(format!("unexpected {:?} in value of {:?}", c, key)));
        }
        val.push(c);
        chars.next();
    }
    Ok(val)
}
