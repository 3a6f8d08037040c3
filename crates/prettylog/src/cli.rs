//! Command-line interface for prettylog.
//!
//! Flags override values from the config file; anything left unset keeps
//! the configured value.

use std::path::PathBuf;

use clap::Parser;

use crate::conf::Config;
use crate::render::ColorMode;

/// prettylog - reads structured logs from stdin and makes them readable
#[derive(Parser, Debug)]
#[command(name = "prettylog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the per-user default
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Keys to never show (repeatable or comma separated)
    #[arg(long, value_name = "KEY", value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Keys to always show, hiding every other field (repeatable or comma separated)
    #[arg(long, value_name = "KEY", value_delimiter = ',')]
    pub keep: Vec<String>,

    /// Sort keys by length after sorting them alphabetically
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub sort_longest: Option<bool>,

    /// Show only the key of values that did not change since the previous line
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub skip_unchanged: Option<bool>,

    /// Truncate long values
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub truncate: Option<bool>,

    /// Length after which values get truncated
    #[arg(long, value_name = "N")]
    pub truncate_length: Option<usize>,

    /// Color output: on, off or auto
    #[arg(long, value_name = "MODE")]
    pub color: Option<ColorMode>,

    /// Use colors suited to a light terminal background
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub light_bg: Option<bool>,

    /// strftime-style format for timestamps
    #[arg(long, value_name = "FORMAT")]
    pub time_format: Option<String>,

    /// Keys holding the message, in order of preference
    #[arg(short = 'm', long, value_name = "KEY", value_delimiter = ',', env = "PRETTYLOG_MESSAGE_FIELDS")]
    pub message_fields: Vec<String>,

    /// Keys holding the timestamp, in order of preference
    #[arg(short = 't', long, value_name = "KEY", value_delimiter = ',', env = "PRETTYLOG_TIME_FIELDS")]
    pub time_fields: Vec<String>,

    /// Keys holding the level, in order of preference
    #[arg(short = 'l', long, value_name = "KEY", value_delimiter = ',', env = "PRETTYLOG_LEVEL_FIELDS")]
    pub level_fields: Vec<String>,

    /// Ignore Ctrl-C and keep rendering until stdin is closed
    #[arg(short = 'i', long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub ignore_interrupts: Option<bool>,
}

impl Cli {
    /// Overlay every flag that was given onto `config`.
    pub fn apply(&self, config: &mut Config) {
        if !self.skip.is_empty() {
            config.skip = self.skip.clone();
        }
        if !self.keep.is_empty() {
            config.keep = self.keep.clone();
        }
        if let Some(v) = self.sort_longest {
            config.sort_longest = v;
        }
        if let Some(v) = self.skip_unchanged {
            config.skip_unchanged = v;
        }
        if let Some(v) = self.truncate {
            config.truncate = v;
        }
        if let Some(v) = self.truncate_length {
            config.truncate_length = v;
        }
        if let Some(mode) = self.color {
            config.color_mode = mode.to_string();
        }
        if let Some(v) = self.light_bg {
            config.light_bg = v;
        }
        if let Some(format) = &self.time_format {
            config.time_format = format.clone();
        }
        if !self.message_fields.is_empty() {
            config.message_fields = self.message_fields.clone();
        }
        if !self.time_fields.is_empty() {
            config.time_fields = self.time_fields.clone();
        }
        if !self.level_fields.is_empty() {
            config.level_fields = self.level_fields.clone();
        }
        if let Some(v) = self.ignore_interrupts {
            config.ignore_interrupts = v;
        }
    }
}
