use std::collections::HashSet;

use crate::parser::FieldCandidates;

use super::style::{ColorMode, Palette};

pub const DEFAULT_TRUNCATE_LENGTH: usize = 15;
/// Syslog "stamp" style, e.g. `Jan  2 15:04:05`
pub const DEFAULT_TIME_FORMAT: &str = "%b %e %H:%M:%S";

pub const DEFAULT_TIME_FIELDS: &[&str] = &["time", "ts", "@timestamp", "timestamp"];
pub const DEFAULT_MESSAGE_FIELDS: &[&str] = &["message", "msg"];
pub const DEFAULT_LEVEL_FIELDS: &[&str] = &["level", "lvl", "loglevel", "severity"];

pub fn to_owned_list(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Everything the renderer and classifier need for one stream.
///
/// Built once by the caller and never mutated while a stream is processed.
/// `skip` and `keep` are expected to be mutually exclusive; that is checked
/// when the configuration is validated, not here.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub skip: HashSet<String>,
    pub keep: HashSet<String>,
    pub sort_longest: bool,
    pub skip_unchanged: bool,
    pub truncate: bool,
    pub truncate_length: usize,
    /// Should already be resolved to `On` or `Off`
    pub color: ColorMode,
    pub light_bg: bool,
    pub time_format: String,
    pub time_fields: Vec<String>,
    pub message_fields: Vec<String>,
    pub level_fields: Vec<String>,
    pub palette: Palette,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            skip: HashSet::new(),
            keep: HashSet::new(),
            sort_longest: true,
            skip_unchanged: true,
            truncate: false,
            truncate_length: DEFAULT_TRUNCATE_LENGTH,
            color: ColorMode::Off,
            light_bg: false,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            time_fields: to_owned_list(DEFAULT_TIME_FIELDS),
            message_fields: to_owned_list(DEFAULT_MESSAGE_FIELDS),
            level_fields: to_owned_list(DEFAULT_LEVEL_FIELDS),
            palette: Palette::default(),
        }
    }
}

impl RenderOptions {
    pub fn candidates(&self) -> FieldCandidates<'_> {
        FieldCandidates {
            time: &self.time_fields,
            message: &self.message_fields,
            level: &self.level_fields,
        }
    }

    /// Whether a generic field is rendered at all.
    pub fn shows_field(&self, key: &str) -> bool {
        if self.keep.contains(key) {
            return true;
        }
        if !self.keep.is_empty() {
            return false;
        }
        !self.skip.contains(key)
    }

    /// Whether a role (time, message, level) claimed from `source_key` is
    /// rendered. Roles are always shown unless their key is skipped.
    pub fn shows_role(&self, source_key: Option<&str>) -> bool {
        match source_key {
            Some(key) => !self.skip.contains(key) || self.keep.contains(key),
            None => true,
        }
    }

    /// Kept keys are always rendered with their value.
    pub fn pins_value(&self, key: &str) -> bool {
        self.keep.contains(key)
    }

    pub fn color_enabled(&self) -> bool {
        self.color.enabled()
    }
}
