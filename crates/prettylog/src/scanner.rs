//! Line scanner: reads lines, runs the recognizer chain, writes output.
//!
//! Output always has exactly one `\n`-terminated line per input line.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::Result;
use crate::parser::prefix::strip_cee_tag;
use crate::parser::{LogFormat, Recognizer, MAX_LINE_SIZE};
use crate::render::{RenderOptions, Renderer, RendererState};

/// Per-stream counters, logged when the stream ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub lines: u64,
    pub passthrough: u64,
    pub oversized: u64,
    pub recognized: HashMap<&'static str, u64>,
}

/// Recognition and rendering state for one stream.
pub struct Pipeline<'o> {
    opts: &'o RenderOptions,
    renderer: Renderer<'o>,
    prior: Option<LogFormat>,
    states: HashMap<LogFormat, RendererState>,
    stats: ScanStats,
}

impl<'o> Pipeline<'o> {
    pub fn new(opts: &'o RenderOptions) -> Self {
        Self {
            opts,
            renderer: Renderer::new(opts),
            prior: None,
            states: HashMap::new(),
            stats: ScanStats::default(),
        }
    }

    /// Family of the last recognized line, `None` after a pass-through.
    pub fn prior(&self) -> Option<LogFormat> {
        self.prior
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Process one line (without its terminator) and write the result plus `\n`.
    pub fn process_line<W: Write>(&mut self, line: &[u8], output: &mut W) -> Result<()> {
        self.stats.lines += 1;

        match self.recognize(line) {
            Some(rendered) => output.write_all(rendered.as_bytes())?,
            None => {
                self.stats.passthrough += 1;
                self.reset();
                output.write_all(line)?;
            }
        }

        output.write_all(b"\n")?;
        Ok(())
    }

    fn recognize(&mut self, line: &[u8]) -> Option<String> {
        if line.len() > MAX_LINE_SIZE {
            self.stats.oversized += 1;
            return None;
        }

        let opts = self.opts;
        let payload = strip_cee_tag(line);
        let candidates = opts.candidates();

        let (recognizer, event) = Recognizer::CHAIN
            .iter()
            .find_map(|r| r.try_handle(payload, candidates).ok().map(|event| (*r, event)))?;

        trace!(recognizer = recognizer.as_str(), "recognized line");
        *self.stats.recognized.entry(recognizer.as_str()).or_insert(0) += 1;

        let format = recognizer.format();
        if self.prior != Some(format) {
            self.reset();
        }
        let skip_unchanged = opts.skip_unchanged && self.prior == Some(format);

        let state = self.states.entry(format).or_default();
        let rendered = self.renderer.render(&event, state, skip_unchanged);
        self.prior = Some(format);
        Some(rendered)
    }

    /// Forget the unchanged-value memory of every family.
    fn reset(&mut self) {
        self.prior = None;
        for state in self.states.values_mut() {
            state.clear();
        }
    }

    /// Drain `input` to EOF. Read and write failures end the stream.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, output: &mut W) -> Result<()> {
        let mut buf = Vec::with_capacity(4096);

        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }

            let mut line = buf.as_slice();
            if let Some(rest) = line.strip_suffix(b"\n") {
                line = rest;
            }
            if let Some(rest) = line.strip_suffix(b"\r") {
                line = rest;
            }

            self.process_line(line, output)?;
        }

        output.flush()?;
        Ok(())
    }
}

/// Prettify every line of `input` onto `output`.
pub fn process<R: BufRead, W: Write>(input: R, mut output: W, opts: &RenderOptions) -> Result<()> {
    let mut pipeline = Pipeline::new(opts);
    let result = pipeline.run(input, &mut output);

    let stats = pipeline.stats();
    debug!(
        lines = stats.lines,
        passthrough = stats.passthrough,
        oversized = stats.oversized,
        recognized = ?stats.recognized,
        "stream finished"
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::{self, Cursor, Read};

    fn run(input: &[u8], opts: &RenderOptions) -> String {
        let mut out = Vec::new();
        process(Cursor::new(input.to_vec()), &mut out, opts).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn run_default(input: &str) -> String {
        run(input.as_bytes(), &RenderOptions::default())
    }

    // ── Scenarios ───────────────────────────────────────────────

    #[test]
    fn test_json_line() {
        let out = run_default(r#"{"time":"2024-01-01T00:00:00Z","level":"info","msg":"hello","user":"bob"}"#);
        assert_eq!(out, "Jan  1 00:00:00 |INFO| hello user=bob\n");
    }

    #[test]
    fn test_logfmt_line() {
        let out = run_default(r#"time=2024-01-01T00:00:00Z level=error msg="boom" code=500"#);
        assert_eq!(out, "Jan  1 00:00:00 |ERRO| boom code=500\n");
    }

    #[test]
    fn test_unchanged_json_values_suppressed() {
        let out = run_default("{\"msg\":\"a\",\"env\":\"prod\"}\n{\"msg\":\"b\",\"env\":\"prod\"}\n");
        assert_eq!(out, "a env=prod\nb env\n");
    }

    #[test]
    fn test_plain_text_passthrough() {
        assert_eq!(run_default("plain text with no structure\n"), "plain text with no structure\n");
    }

    #[test]
    fn test_cee_tag_stripped_before_recognition() {
        assert_eq!(run_default("@cee: {\"msg\":\"x\"}"), "x\n");
    }

    #[test]
    fn test_empty_message_and_level_are_absent() {
        assert_eq!(run_default(r#"{"msg":"","k":"v"}"#), "<no msg> k=v\n");
        assert_eq!(run_default(r#"{"msg":""}"#), "<no msg>\n");
        assert_eq!(run_default(r#"{"level":"","msg":"x"}"#), "x\n");
        assert_eq!(run_default(r#"msg="" level= k=v"#), "<no msg> k=v\n");
    }

    #[test]
    fn test_truncation() {
        let opts = RenderOptions { truncate: true, truncate_length: 5, ..RenderOptions::default() };
        assert_eq!(run(br#"{"msg":"m","k":"abcdefgh"}"#, &opts), "m k=abcde...\n");
    }

    // ── Properties ──────────────────────────────────────────────

    #[test]
    fn test_passthrough_is_identity() {
        let samples: [&[u8]; 5] = [
            b"plain text",
            b"a=b=c broken logfmt",
            b"{not json",
            b"\xff\xfe binary = junk",
            b"@cee: not structured",
        ];
        for sample in samples {
            let mut out = Vec::new();
            process(Cursor::new(sample.to_vec()), &mut out, &RenderOptions::default()).unwrap();
            let mut expected = sample.to_vec();
            expected.push(b'\n');
            assert_eq!(out, expected, "{:?}", String::from_utf8_lossy(sample));
        }
    }

    #[test]
    fn test_line_count_preserved() {
        let input = "{\"msg\":\"a\"}\nplain\n\nk=v\n{\"msg\":\"last\"}";
        let out = run_default(input);
        assert_eq!(out.matches('\n').count(), 5);
        assert!(out.ends_with('\n'));

        assert_eq!(run_default("one\ntwo\n").matches('\n').count(), 2);
        assert_eq!(run_default(""), "");
    }

    #[test]
    fn test_unchanged_requires_same_family() {
        let out = run_default("{\"msg\":\"a\",\"k\":\"x\"}\nmsg=b k=x\n");
        assert_eq!(out, "a k=x\nb k=x\n");
    }

    #[test]
    fn test_passthrough_resets_unchanged_memory() {
        let out = run_default("{\"msg\":\"a\",\"k\":\"x\"}\nnoise\n{\"msg\":\"b\",\"k\":\"x\"}\n");
        assert_eq!(out, "a k=x\nnoise\nb k=x\n");
    }

    #[test]
    fn test_family_switch_clears_both_states() {
        let input = "{\"msg\":\"a\",\"k\":\"x\"}\nmsg=b k=x\n{\"msg\":\"c\",\"k\":\"x\"}\n";
        assert_eq!(run_default(input), "a k=x\nb k=x\nc k=x\n");
    }

    #[test]
    fn test_skip_unchanged_disabled() {
        let opts = RenderOptions { skip_unchanged: false, ..RenderOptions::default() };
        let out = run(b"{\"msg\":\"a\",\"k\":\"x\"}\n{\"msg\":\"b\",\"k\":\"x\"}\n", &opts);
        assert_eq!(out, "a k=x\nb k=x\n");
    }

    #[test]
    fn test_container_wrapped_json_shares_state_with_json() {
        let input = "{\"msg\":\"a\",\"k\":\"x\"}\nweb_1  | {\"msg\":\"b\",\"k\":\"x\"}\n";
        assert_eq!(run_default(input), "a k=x\nb k service=web_1\n");
    }

    #[test]
    fn test_crlf_dropped() {
        assert_eq!(run_default("plain\r\n{\"msg\":\"x\"}\r\n"), "plain\nx\n");
    }

    #[test]
    fn test_oversized_line_passthrough() {
        let line = format!(r#"{{"msg":"{}"}}"#, "x".repeat(MAX_LINE_SIZE));
        let mut out = Vec::new();
        let opts = RenderOptions::default();
        let mut pipeline = Pipeline::new(&opts);
        pipeline.process_line(line.as_bytes(), &mut out).unwrap();

        assert_eq!(&out[..out.len() - 1], line.as_bytes());
        assert_eq!(pipeline.stats().oversized, 1);
        assert_eq!(pipeline.stats().passthrough, 1);
    }

    #[test]
    fn test_stats() {
        let opts = RenderOptions::default();
        let mut pipeline = Pipeline::new(&opts);
        let mut out = Vec::new();
        pipeline
            .run(Cursor::new(b"{\"msg\":\"a\"}\nk=v\nplain\n".to_vec()), &mut out)
            .unwrap();

        let stats = pipeline.stats();
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.passthrough, 1);
        assert_eq!(stats.recognized.get("json"), Some(&1));
        assert_eq!(stats.recognized.get("logfmt"), Some(&1));
        assert_eq!(pipeline.prior(), None);
    }

    // ── I/O failures ────────────────────────────────────────────

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "boom"))
        }
    }

    #[test]
    fn test_read_error_propagates() {
        let mut out = Vec::new();
        let result = process(io::BufReader::new(FailingReader), &mut out, &RenderOptions::default());
        assert!(matches!(result, Err(Error::Io(_))));
        assert!(out.is_empty());
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_error_propagates() {
        let result = process(Cursor::new(b"x\n".to_vec()), FailingWriter, &RenderOptions::default());
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
