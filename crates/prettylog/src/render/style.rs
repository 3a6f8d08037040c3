//! ANSI styling: color mode resolution, SGR styles and the role palette.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const RESET: &str = "\x1b[0m";

/// Requested color behaviour, before it is resolved against the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    On,
    Off,
}

impl ColorMode {
    /// Accepts the usual yes/no spellings; the empty string means auto.
    pub fn parse(word: &str) -> Result<Self, String> {
        match word.trim().to_ascii_lowercase().as_str() {
            "on" | "always" | "force" | "true" | "yes" | "1" => Ok(ColorMode::On),
            "off" | "never" | "false" | "no" | "0" => Ok(ColorMode::Off),
            "auto" | "tty" | "maybe" | "" => Ok(ColorMode::Auto),
            other => Err(format!("'{}' is not a color mode (try 'on', 'off' or 'auto')", other)),
        }
    }

    /// Settle `Auto` once for a stream.
    pub fn resolve(self, output_is_terminal: bool, no_color_set: bool) -> ColorMode {
        match self {
            ColorMode::Auto if output_is_terminal && !no_color_set => ColorMode::On,
            ColorMode::Auto => ColorMode::Off,
            other => other,
        }
    }

    /// Only an explicit `On` colors output; an unresolved `Auto` does not.
    pub fn enabled(self) -> bool {
        self == ColorMode::On
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Auto => "auto",
            ColorMode::On => "on",
            ColorMode::Off => "off",
        }
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorMode::parse(s)
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of SGR attributes applied to one piece of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    codes: Vec<u8>,
}

impl Style {
    pub fn new(codes: &[u8]) -> Self {
        Self { codes: codes.to_vec() }
    }

    /// Build a style from attribute names such as `hi_white` or `bg_red`.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, String> {
        let codes = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                sgr_code(name).ok_or_else(|| format!("unknown color attribute '{}'", name))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { codes })
    }

    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    /// Wrap `text` in this style's escape sequence when `enabled`.
    pub fn paint(&self, text: &str, enabled: bool) -> String {
        if !enabled || self.codes.is_empty() || text.is_empty() {
            return text.to_string();
        }
        let params: Vec<String> = self.codes.iter().map(u8::to_string).collect();
        format!("\x1b[{}m{}{}", params.join(";"), text, RESET)
    }
}

fn sgr_code(name: &str) -> Option<u8> {
    let name = name.trim().to_ascii_lowercase().replace('-', "_");

    match name.as_str() {
        "bold" => return Some(1),
        "faint" => return Some(2),
        "italic" => return Some(3),
        "underline" => return Some(4),
        _ => {}
    }

    let (base, name) = if let Some(rest) = name.strip_prefix("bg_hi_") {
        (100, rest)
    } else if let Some(rest) = name.strip_prefix("bg_") {
        (40, rest)
    } else if let Some(rest) = name.strip_prefix("hi_") {
        (90, rest)
    } else {
        (30, name.as_str())
    };

    let offset = match name {
        "black" => 0,
        "red" => 1,
        "green" => 2,
        "yellow" => 3,
        "blue" => 4,
        "magenta" => 5,
        "cyan" => 6,
        "white" => 7,
        _ => return None,
    };
    Some(base + offset)
}

/// Styles for every rendered role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub key: Style,
    pub value: Style,
    pub time_light_bg: Style,
    pub time_dark_bg: Style,
    pub msg_light_bg: Style,
    pub msg_absent_light_bg: Style,
    pub msg_dark_bg: Style,
    pub msg_absent_dark_bg: Style,
    pub debug_level: Style,
    pub info_level: Style,
    pub warn_level: Style,
    pub error_level: Style,
    pub panic_level: Style,
    pub fatal_level: Style,
    pub unknown_level: Style,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            key: Style::new(&[32]),
            value: Style::new(&[97]),
            time_light_bg: Style::new(&[30]),
            time_dark_bg: Style::new(&[37]),
            msg_light_bg: Style::new(&[30]),
            msg_absent_light_bg: Style::new(&[90]),
            msg_dark_bg: Style::new(&[97]),
            msg_absent_dark_bg: Style::new(&[37]),
            debug_level: Style::new(&[35]),
            info_level: Style::new(&[36]),
            warn_level: Style::new(&[33]),
            error_level: Style::new(&[31]),
            panic_level: Style::new(&[41]),
            fatal_level: Style::new(&[101, 97]),
            unknown_level: Style::new(&[35]),
        }
    }
}

/// Level buckets used to pick a level style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelClass {
    Debug,
    Info,
    Warn,
    Error,
    Panic,
    Fatal,
    Unknown,
}

impl LevelClass {
    /// Case-insensitive; anything unrecognized is `Unknown`.
    pub fn of(level: &str) -> Self {
        match level.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => LevelClass::Debug,
            "info" => LevelClass::Info,
            "warn" | "warning" => LevelClass::Warn,
            "error" | "err" => LevelClass::Error,
            "panic" => LevelClass::Panic,
            "fatal" | "critical" => LevelClass::Fatal,
            _ => LevelClass::Unknown,
        }
    }
}

impl Palette {
    pub fn level(&self, class: LevelClass) -> &Style {
        match class {
            LevelClass::Debug => &self.debug_level,
            LevelClass::Info => &self.info_level,
            LevelClass::Warn => &self.warn_level,
            LevelClass::Error => &self.error_level,
            LevelClass::Panic => &self.panic_level,
            LevelClass::Fatal => &self.fatal_level,
            LevelClass::Unknown => &self.unknown_level,
        }
    }

    pub fn time(&self, light_bg: bool) -> &Style {
        if light_bg {
            &self.time_light_bg
        } else {
            &self.time_dark_bg
        }
    }

    pub fn message(&self, light_bg: bool, absent: bool) -> &Style {
        match (light_bg, absent) {
            (true, false) => &self.msg_light_bg,
            (true, true) => &self.msg_absent_light_bg,
            (false, false) => &self.msg_dark_bg,
            (false, true) => &self.msg_absent_dark_bg,
        }
    }
}
