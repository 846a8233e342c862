//! Log redaction for clinical values.
//!
//! Inputs entered in the form are patient data and must not end up in the
//! log file. Callers log labels and probabilities only, but any
//! `<feature>=<number>` or `<feature>: <number>` pair that still reaches the
//! formatter is masked here before it hits the sink.

use std::io::Write;
use std::sync::OnceLock;

use regex::Regex;
use tracing_subscriber::fmt::MakeWriter;

use crate::domain::FEATURE_NAMES;

const REDACTED: &str = "[REDACTED]";

/// Longest line kept in memory before it is redacted and written out anyway.
const MAX_BUFFERED_BYTES: usize = 16 * 1024;

fn clinical_value_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let names = FEATURE_NAMES.join("|");
        let pattern = format!(r"(?i)\b({names})(\s*[=:]\s*)-?\d+(?:\.\d+)?\b");
        Regex::new(&pattern).unwrap_or_else(|e| unreachable!("feature pattern is valid: {e}"))
    })
}

/// Mask every clinical `name=value` pair in `input`.
#[must_use]
pub fn redact(input: &str) -> String {
    clinical_value_pattern()
        .replace_all(input, format!("${{1}}${{2}}{REDACTED}").as_str())
        .into_owned()
}

/// True if `input` holds at least one clinical value in clear text.
#[must_use]
pub fn contains_clinical_values(input: &str) -> bool {
    clinical_value_pattern().is_match(input)
}

/// `MakeWriter` wrapper that redacts each formatted log line.
#[derive(Debug, Clone)]
pub struct RedactingMakeWriter<M> {
    inner: M,
}

impl<M> RedactingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

/// Line-buffering writer produced by [`RedactingMakeWriter`].
pub struct RedactingWriter<W: Write> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W: Write> RedactingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
        }
    }

    fn write_redacted(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let line = String::from_utf8_lossy(bytes);
        self.inner.write_all(redact(&line).as_bytes())
    }

    fn drain_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.write_redacted(&line)?;
        }
        Ok(())
    }
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        self.drain_lines()?;

        if self.buffer.len() > MAX_BUFFERED_BYTES {
            let pending = std::mem::take(&mut self.buffer);
            self.write_redacted(&pending)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.drain_lines()?;
        if !self.buffer.is_empty() {
            let pending = std::mem::take(&mut self.buffer);
            self.write_redacted(&pending)?;
        }
        self.inner.flush()
    }
}

impl<W: Write> Drop for RedactingWriter<W> {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl<'a, M> MakeWriter<'a> for RedactingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = RedactingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter::new(self.inner.make_writer())
    }
}
