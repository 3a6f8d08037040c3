//! Event rendering.
//!
//! A rendered line is `TIME |LEVL| message key=value ...`. Each piece is
//! optional except the message, which falls back to a placeholder.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::parser::StructuredEvent;

use super::options::RenderOptions;
use super::style::LevelClass;

pub const ABSENT_MESSAGE: &str = "<no msg>";
pub const TRUNCATION_MARKER: &str = "...";
const LEVEL_WIDTH: usize = 4;

/// Field values of the last event rendered for one recognizer family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RendererState {
    last: HashMap<String, String>,
}

impl RendererState {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.last.get(key).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.last.clear();
    }
}

pub struct Renderer<'o> {
    opts: &'o RenderOptions,
}

impl<'o> Renderer<'o> {
    pub fn new(opts: &'o RenderOptions) -> Self {
        Self { opts }
    }

    /// Render one event. `skip_unchanged` is the effective flag for this
    /// line: the configured value gated by "same family as the last line".
    ///
    /// `state` is replaced by this event's fields afterwards.
    pub fn render(&self, event: &StructuredEvent, state: &mut RendererState, skip_unchanged: bool) -> String {
        let opts = self.opts;
        let color = opts.color_enabled();
        let palette = &opts.palette;
        let mut parts: Vec<String> = Vec::with_capacity(event.fields.len() + 3);

        if let Some(ts) = event.timestamp {
            if opts.shows_role(event.role_keys.time.as_deref()) {
                let text = format_time(&ts, &opts.time_format);
                parts.push(palette.time(opts.light_bg).paint(&text, color));
            }
        }

        if let Some(level) = event.level.as_deref().filter(|l| !l.is_empty()) {
            if opts.shows_role(event.role_keys.level.as_deref()) {
                let label: String = level.to_uppercase().chars().take(LEVEL_WIDTH).collect();
                let style = palette.level(LevelClass::of(level));
                parts.push(format!("|{}|", style.paint(&label, color)));
            }
        }

        if opts.shows_role(event.role_keys.message.as_deref()) {
            let (text, absent) = match event.message.as_deref() {
                Some(msg) if !msg.is_empty() => (msg, false),
                _ => (ABSENT_MESSAGE, true),
            };
            parts.push(palette.message(opts.light_bg, absent).paint(text, color));
        }

        for key in self.ordered_keys(event) {
            let value = &event.fields[key];
            let unchanged = skip_unchanged
                && !opts.pins_value(key)
                && !value.is_empty()
                && state.get(key) == Some(value.as_str());

            if unchanged {
                parts.push(palette.key.paint(key, color));
            } else {
                let value = self.truncated(value);
                parts.push(format!("{}={}", palette.key.paint(key, color), palette.value.paint(&value, color)));
            }
        }

        state.last = event.fields.clone();

        parts.join(" ")
    }

    /// Visible field keys, lexicographic, then optionally grouped by length.
    pub fn ordered_keys<'e>(&self, event: &'e StructuredEvent) -> Vec<&'e str> {
        let mut keys: Vec<&str> = event
            .fields
            .keys()
            .map(String::as_str)
            .filter(|k| self.opts.shows_field(k))
            .collect();

        keys.sort_unstable();
        if self.opts.sort_longest {
            // Stable: equal-length keys keep their lexicographic order
            keys.sort_by_key(|k| k.len());
        }
        keys
    }

    fn truncated(&self, value: &str) -> String {
        if self.opts.truncate {
            truncate_value(value, self.opts.truncate_length)
        } else {
            value.to_string()
        }
    }
}

/// Cut `value` to `max_chars` characters plus a marker.
pub fn truncate_value(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &value[..cut], TRUNCATION_MARKER),
        None => value.to_string(),
    }
}

fn format_time(ts: &chrono::DateTime<chrono::FixedOffset>, layout: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", ts.format(layout)).is_err() {
        // Layout rejected by chrono
        return ts.to_rfc3339();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::style::{ColorMode, Style};
    use chrono::{TimeZone, Utc};

    fn event(fields: &[(&str, &str)]) -> StructuredEvent {
        let mut event = StructuredEvent::default();
        for (k, v) in fields {
            event.fields.insert(k.to_string(), v.to_string());
        }
        event
    }

    fn render_once(opts: &RenderOptions, event: &StructuredEvent) -> String {
        Renderer::new(opts).render(event, &mut RendererState::default(), opts.skip_unchanged)
    }

    // ── Layout ──────────────────────────────────────────────────

    #[test]
    fn test_full_line_plain() {
        let opts = RenderOptions::default();
        let mut e = event(&[("user", "bob")]);
        e.timestamp = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap().fixed_offset());
        e.level = Some("info".to_string());
        e.message = Some("hello".to_string());

        assert_eq!(render_once(&opts, &e), "Jan  1 00:00:00 |INFO| hello user=bob");
    }

    #[test]
    fn test_absent_message_placeholder() {
        let opts = RenderOptions::default();
        assert_eq!(render_once(&opts, &event(&[("a", "1")])), "<no msg> a=1");
    }

    #[test]
    fn test_empty_message_and_level_render_as_absent() {
        let opts = RenderOptions::default();
        let mut e = event(&[("k", "v")]);
        e.level = Some(String::new());
        e.message = Some(String::new());
        assert_eq!(render_once(&opts, &e), "<no msg> k=v");
    }

    #[test]
    fn test_level_cut_to_four_chars() {
        let opts = RenderOptions::default();
        let mut e = event(&[]);
        e.level = Some("warning".to_string());
        e.message = Some("m".to_string());
        assert_eq!(render_once(&opts, &e), "|WARN| m");
    }

    #[test]
    fn test_custom_time_format() {
        let opts = RenderOptions { time_format: "%H:%M".to_string(), ..RenderOptions::default() };
        let mut e = event(&[]);
        e.timestamp = Some(Utc.with_ymd_and_hms(2024, 1, 1, 13, 37, 0).unwrap().fixed_offset());
        e.message = Some("m".to_string());
        assert_eq!(render_once(&opts, &e), "13:37 m");
    }

    // ── Visibility ──────────────────────────────────────────────

    #[test]
    fn test_skip_field_and_role() {
        let opts = RenderOptions {
            skip: ["pid", "msg"].iter().map(|s| s.to_string()).collect(),
            ..RenderOptions::default()
        };
        let mut e = event(&[("pid", "1"), ("user", "bob")]);
        e.message = Some("hidden".to_string());
        e.role_keys.message = Some("msg".to_string());

        assert_eq!(render_once(&opts, &e), "user=bob");
    }

    #[test]
    fn test_keep_restricts_fields() {
        let opts = RenderOptions {
            keep: ["user"].iter().map(|s| s.to_string()).collect(),
            ..RenderOptions::default()
        };
        let mut e = event(&[("pid", "1"), ("user", "bob")]);
        e.message = Some("m".to_string());
        assert_eq!(render_once(&opts, &e), "m user=bob");
    }

    // ── Ordering ────────────────────────────────────────────────

    #[test]
    fn test_sort_lexicographic() {
        let opts = RenderOptions { sort_longest: false, ..RenderOptions::default() };
        let e = event(&[("zz", "1"), ("a", "2"), ("mmm", "3")]);
        assert_eq!(Renderer::new(&opts).ordered_keys(&e), vec!["a", "mmm", "zz"]);
    }

    #[test]
    fn test_sort_longest_is_stable() {
        let opts = RenderOptions::default();
        let e = event(&[("zz", "1"), ("a", "2"), ("mmm", "3"), ("bb", "4")]);
        let renderer = Renderer::new(&opts);
        let first = renderer.ordered_keys(&e);
        assert_eq!(first, vec!["a", "bb", "zz", "mmm"]);
        assert_eq!(renderer.ordered_keys(&e), first);
    }

    // ── Unchanged suppression ───────────────────────────────────

    #[test]
    fn test_unchanged_value_renders_bare_key() {
        let opts = RenderOptions::default();
        let renderer = Renderer::new(&opts);
        let mut state = RendererState::default();
        let e = event(&[("env", "prod")]);

        assert_eq!(renderer.render(&e, &mut state, true), "<no msg> env=prod");
        assert_eq!(renderer.render(&e, &mut state, true), "<no msg> env");
    }

    #[test]
    fn test_unchanged_disabled_for_line() {
        let opts = RenderOptions::default();
        let renderer = Renderer::new(&opts);
        let mut state = RendererState::default();
        let e = event(&[("env", "prod")]);

        renderer.render(&e, &mut state, true);
        assert_eq!(renderer.render(&e, &mut state, false), "<no msg> env=prod");
    }

    #[test]
    fn test_unchanged_ignores_empty_and_kept_values() {
        let opts = RenderOptions {
            keep: ["env", "empty"].iter().map(|s| s.to_string()).collect(),
            ..RenderOptions::default()
        };
        let renderer = Renderer::new(&opts);
        let mut state = RendererState::default();
        let e = event(&[("env", "prod"), ("empty", "")]);

        renderer.render(&e, &mut state, true);
        assert_eq!(renderer.render(&e, &mut state, true), "<no msg> env=prod empty=");
    }

    #[test]
    fn test_state_replaced_wholesale() {
        let opts = RenderOptions::default();
        let renderer = Renderer::new(&opts);
        let mut state = RendererState::default();

        renderer.render(&event(&[("a", "1")]), &mut state, true);
        renderer.render(&event(&[("b", "2")]), &mut state, true);
        assert_eq!(state.get("a"), None);
        // `a` is no longer remembered, so it shows again in full
        assert_eq!(renderer.render(&event(&[("a", "1")]), &mut state, true), "<no msg> a=1");
    }

    // ── Truncation ──────────────────────────────────────────────

    #[test]
    fn test_truncate_value() {
        assert_eq!(truncate_value("abcdefgh", 5), "abcde...");
        assert_eq!(truncate_value("abc", 5), "abc");
        assert_eq!(truncate_value("abcde", 5), "abcde");
        assert_eq!(truncate_value("héllo wörld", 4), "héll...");
    }

    #[test]
    fn test_truncate_idempotent() {
        let once = truncate_value("abcdefgh", 5);
        assert_eq!(truncate_value(&once, 5), once);
    }

    #[test]
    fn test_truncate_in_render() {
        let opts = RenderOptions { truncate: true, truncate_length: 5, ..RenderOptions::default() };
        assert_eq!(render_once(&opts, &event(&[("k", "abcdefgh")])), "<no msg> k=abcde...");
    }

    // ── Color ───────────────────────────────────────────────────

    #[test]
    fn test_colored_output() {
        let opts = RenderOptions { color: ColorMode::On, ..RenderOptions::default() };
        let mut e = event(&[("k", "v")]);
        e.level = Some("error".to_string());
        e.message = Some("boom".to_string());

        assert_eq!(
            render_once(&opts, &e),
            "|\x1b[31mERRO\x1b[0m| \x1b[97mboom\x1b[0m \x1b[32mk\x1b[0m=\x1b[97mv\x1b[0m"
        );
    }

    #[test]
    fn test_light_bg_absent_message_color() {
        let mut opts = RenderOptions { color: ColorMode::On, light_bg: true, ..RenderOptions::default() };
        opts.palette.msg_absent_light_bg = Style::new(&[2]);
        assert_eq!(render_once(&opts, &event(&[])), "\x1b[2m<no msg>\x1b[0m");
    }
}
