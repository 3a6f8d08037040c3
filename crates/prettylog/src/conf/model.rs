//! Model: Config, PaletteConfig and conversion into render options.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::render::options::{
    to_owned_list, DEFAULT_LEVEL_FIELDS, DEFAULT_MESSAGE_FIELDS, DEFAULT_TIME_FIELDS, DEFAULT_TIME_FORMAT,
    DEFAULT_TRUNCATE_LENGTH,
};
use crate::render::{ColorMode, Palette, RenderOptions, Style};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub skip: Vec<String>,
    pub keep: Vec<String>,
    pub sort_longest: bool,
    pub skip_unchanged: bool,
    pub truncate: bool,
    pub truncate_length: usize,
    pub color_mode: String,
    pub light_bg: bool,
    pub time_format: String,
    pub time_fields: Vec<String>,
    pub message_fields: Vec<String>,
    pub level_fields: Vec<String>,
    /// Keep draining stdin after Ctrl-C so the producer's last lines still render
    pub ignore_interrupts: bool,
    pub palette: PaletteConfig,
}

/// Palette overrides; each entry is a list of attribute names such as
/// `["bg_hi_red", "hi_white"]`. Missing entries keep the default style.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub key: Option<Vec<String>>,
    pub value: Option<Vec<String>>,
    pub time_light_bg: Option<Vec<String>>,
    pub time_dark_bg: Option<Vec<String>>,
    pub msg_light_bg: Option<Vec<String>>,
    pub msg_absent_light_bg: Option<Vec<String>>,
    pub msg_dark_bg: Option<Vec<String>>,
    pub msg_absent_dark_bg: Option<Vec<String>>,
    pub debug_level: Option<Vec<String>>,
    pub info_level: Option<Vec<String>>,
    pub warn_level: Option<Vec<String>>,
    pub error_level: Option<Vec<String>>,
    pub panic_level: Option<Vec<String>>,
    pub fatal_level: Option<Vec<String>>,
    pub unknown_level: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            skip: Vec::new(),
            keep: Vec::new(),
            sort_longest: true,
            skip_unchanged: true,
            truncate: false,
            truncate_length: DEFAULT_TRUNCATE_LENGTH,
            color_mode: ColorMode::Auto.to_string(),
            light_bg: false,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            time_fields: to_owned_list(DEFAULT_TIME_FIELDS),
            message_fields: to_owned_list(DEFAULT_MESSAGE_FIELDS),
            level_fields: to_owned_list(DEFAULT_LEVEL_FIELDS),
            ignore_interrupts: false,
            palette: PaletteConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if !self.skip.is_empty() && !self.keep.is_empty() {
            return Err("skip and keep are mutually exclusive, set only one of them".to_string());
        }
        ColorMode::parse(&self.color_mode)?;
        if self.time_fields.is_empty() {
            return Err("time_fields must not be empty".to_string());
        }
        if self.message_fields.is_empty() {
            return Err("message_fields must not be empty".to_string());
        }
        if self.level_fields.is_empty() {
            return Err("level_fields must not be empty".to_string());
        }
        if self.truncate && self.truncate_length == 0 {
            return Err("truncate_length must be > 0 when truncate is enabled".to_string());
        }
        if StrftimeItems::new(&self.time_format).any(|item| matches!(item, Item::Error)) {
            return Err(format!("time_format '{}' is not a valid strftime format", self.time_format));
        }
        self.palette.compile()?;
        Ok(())
    }

    pub fn color(&self) -> Result<ColorMode, String> {
        ColorMode::parse(&self.color_mode)
    }

    /// Build the options for one stream. `color` must already be resolved.
    pub fn render_options(&self, color: ColorMode) -> Result<RenderOptions, String> {
        Ok(RenderOptions {
            skip: self.skip.iter().cloned().collect(),
            keep: self.keep.iter().cloned().collect(),
            sort_longest: self.sort_longest,
            skip_unchanged: self.skip_unchanged,
            truncate: self.truncate,
            truncate_length: self.truncate_length,
            color,
            light_bg: self.light_bg,
            time_format: self.time_format.clone(),
            time_fields: self.time_fields.clone(),
            message_fields: self.message_fields.clone(),
            level_fields: self.level_fields.clone(),
            palette: self.palette.compile()?,
        })
    }
}

impl PaletteConfig {
    /// Apply the overrides on top of the default palette.
    pub fn compile(&self) -> Result<Palette, String> {
        let mut palette = Palette::default();

        let entries: [(&Option<Vec<String>>, &mut Style); 15] = [
            (&self.key, &mut palette.key),
            (&self.value, &mut palette.value),
            (&self.time_light_bg, &mut palette.time_light_bg),
            (&self.time_dark_bg, &mut palette.time_dark_bg),
            (&self.msg_light_bg, &mut palette.msg_light_bg),
            (&self.msg_absent_light_bg, &mut palette.msg_absent_light_bg),
            (&self.msg_dark_bg, &mut palette.msg_dark_bg),
            (&self.msg_absent_dark_bg, &mut palette.msg_absent_dark_bg),
            (&self.debug_level, &mut palette.debug_level),
            (&self.info_level, &mut palette.info_level),
            (&self.warn_level, &mut palette.warn_level),
            (&self.error_level, &mut palette.error_level),
            (&self.panic_level, &mut palette.panic_level),
            (&self.fatal_level, &mut palette.fatal_level),
            (&self.unknown_level, &mut palette.unknown_level),
        ];

        for (names, style) in entries {
            if let Some(names) = names {
                *style = Style::from_names(names.as_slice()).map_err(|e| format!("palette: {}", e))?;
            }
        }

        Ok(palette)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Config validation ───────────────────────────────────────

    #[test]
    fn test_defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_skip_and_keep_exclusive() {
        let config = Config {
            skip: vec!["a".to_string()],
            keep: vec!["b".to_string()],
            ..Config::default()
        };
        let result = config.validate();
        assert!(result.unwrap_err().contains("mutually exclusive"));
    }

    #[test]
    fn test_validate_color_mode() {
        let config = Config { color_mode: "rainbow".to_string(), ..Config::default() };
        assert!(config.validate().unwrap_err().contains("rainbow"));

        let config = Config { color_mode: "always".to_string(), ..Config::default() };
        assert_eq!(config.color(), Ok(ColorMode::On));
    }

    #[test]
    fn test_validate_empty_candidate_lists() {
        let config = Config { message_fields: Vec::new(), ..Config::default() };
        assert!(config.validate().unwrap_err().contains("message_fields"));
    }

    #[test]
    fn test_validate_zero_truncate_length_when_enabled() {
        let config = Config { truncate: true, truncate_length: 0, ..Config::default() };
        assert!(config.validate().is_err());

        let config = Config { truncate: false, truncate_length: 0, ..Config::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_time_format() {
        let config = Config { time_format: "%Q".to_string(), ..Config::default() };
        assert!(config.validate().unwrap_err().contains("time_format"));
    }

    // ── Palette ─────────────────────────────────────────────────

    #[test]
    fn test_palette_overrides() {
        let config = PaletteConfig {
            key: Some(vec!["blue".to_string(), "bold".to_string()]),
            ..PaletteConfig::default()
        };
        let palette = config.compile().unwrap();
        assert_eq!(palette.key.codes(), &[34, 1]);
        assert_eq!(palette.value, Palette::default().value);
    }

    #[test]
    fn test_palette_unknown_color() {
        let config = PaletteConfig {
            info_level: Some(vec!["chartreuse".to_string()]),
            ..PaletteConfig::default()
        };
        assert!(config.compile().unwrap_err().contains("chartreuse"));
    }

    // ── Render options ──────────────────────────────────────────

    #[test]
    fn test_render_options() {
        let config = Config {
            skip: vec!["pid".to_string()],
            truncate: true,
            ..Config::default()
        };
        let opts = config.render_options(ColorMode::On).unwrap();
        assert!(opts.skip.contains("pid"));
        assert!(opts.truncate);
        assert_eq!(opts.color, ColorMode::On);
        assert_eq!(opts.level_fields, config.level_fields);
    }
}
