// Match reporting: text or JSON lines, match budget and final count.

use std::io::{self, Write};

use polymatch_automaton::{Match, PatternId, Span};
use serde::Serialize;

use crate::config::{FindConfig, Format};

/// One JSON output line.
#[derive(Debug, Serialize)]
struct Record<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<&'a str>,
    pattern: PatternId,
    #[serde(flatten)]
    span: Span,
    text: &'a str,
}

/// Writes matches as they are found and decides when the scan should stop.
///
/// The callback handed to the automaton cannot return an error, so a failed
/// write is stored here and stops the scan; [`Reporter::finish`] surfaces it.
pub struct Reporter<'p, W: Write> {
    out: W,
    patterns: &'p [String],
    format: Format,
    count_only: bool,
    max_matches: Option<u64>,
    label: Option<String>,
    count: u64,
    error: Option<io::Error>,
}

impl<'p, W: Write> Reporter<'p, W> {
    /// `patterns` holds the display text of each pattern, indexed by id.
    pub fn new(out: W, patterns: &'p [String], config: &FindConfig) -> Self {
        Self {
            out,
            patterns,
            format: config.format,
            count_only: config.count_only,
            max_matches: config.max_matches,
            label: None,
            count: 0,
            error: None,
        }
    }

    /// Prefix subsequent matches with `name`, or stop prefixing on `None`.
    pub fn set_label(&mut self, name: Option<String>) {
        self.label = name;
    }

    /// Matches reported so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Whether the scan may continue.
    pub fn wants_more(&self) -> bool {
        self.error.is_none() && self.max_matches.is_none_or(|max| self.count < max)
    }

    /// Record one match. Returns `false` when the scan should stop.
    pub fn report(&mut self, m: Match) -> bool {
        if !self.wants_more() {
            return false;
        }
        self.count += 1;
        if !self.count_only {
            if let Err(e) = self.write_match(m) {
                self.error = Some(e);
            }
        }
        self.wants_more()
    }

    fn write_match(&mut self, m: Match) -> io::Result<()> {
        let text = self
            .patterns
            .get(m.pattern().as_usize())
            .map(String::as_str)
            .unwrap_or("");
        match self.format {
            Format::Text => {
                if let Some(label) = &self.label {
                    write!(self.out, "{label}:")?;
                }
                writeln!(self.out, "{}\t{}\t{}", m.start(), m.end(), text)
            }
            Format::Json => {
                let record = Record {
                    input: self.label.as_deref(),
                    pattern: m.pattern(),
                    span: m.span,
                    text,
                };
                serde_json::to_writer(&mut self.out, &record)?;
                writeln!(self.out)
            }
        }
    }

    /// Print the count if requested, flush, and return the number of matches.
    pub fn finish(mut self) -> io::Result<u64> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        if self.count_only {
            match self.format {
                Format::Text => writeln!(self.out, "{}", self.count)?,
                Format::Json => writeln!(self.out, "{{\"count\":{}}}", self.count)?,
            }
        }
        self.out.flush()?;
        Ok(self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Backend, Input, Mode, Strategy};

    fn config(format: Format) -> FindConfig {
        FindConfig {
            patterns_file: None,
            inline_patterns: Vec::new(),
            inputs: vec![Input::Stdin],
            mode: Mode::Bytes,
            strategy: Strategy::Walk,
            backend: Backend::Ordered,
            format,
            max_matches: None,
            count_only: false,
            dump: false,
        }
    }

    fn hit(pattern: usize, start: usize, end: usize) -> Match {
        Match::new(PatternId::new(pattern).unwrap(), start, end)
    }

    #[test]
    fn text_lines() {
        let patterns = vec!["he".to_string(), "she".to_string()];
        let mut out = Vec::new();
        let mut reporter = Reporter::new(&mut out, &patterns, &config(Format::Text));
        assert!(reporter.report(hit(1, 1, 4)));
        assert!(reporter.report(hit(0, 2, 4)));
        assert_eq!(reporter.finish().unwrap(), 2);
        assert_eq!(String::from_utf8(out).unwrap(), "1\t4\tshe\n2\t4\the\n");
    }

    #[test]
    fn text_lines_with_label() {
        let patterns = vec!["ab".to_string()];
        let mut out = Vec::new();
        let mut reporter = Reporter::new(&mut out, &patterns, &config(Format::Text));
        reporter.set_label(Some("a.txt".to_string()));
        reporter.report(hit(0, 0, 2));
        reporter.finish().unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a.txt:0\t2\tab\n");
    }

    #[test]
    fn json_lines() {
        let patterns = vec!["ab".to_string()];
        let mut out = Vec::new();
        let mut reporter = Reporter::new(&mut out, &patterns, &config(Format::Json));
        reporter.report(hit(0, 3, 5));
        reporter.finish().unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"pattern\":0,\"start\":3,\"end\":5,\"text\":\"ab\"}\n"
        );
    }

    #[test]
    fn budget_stops_the_scan() {
        let patterns = vec!["a".to_string()];
        let mut config = config(Format::Text);
        config.max_matches = Some(2);
        let mut out = Vec::new();
        let mut reporter = Reporter::new(&mut out, &patterns, &config);
        assert!(reporter.report(hit(0, 0, 1)));
        assert!(!reporter.report(hit(0, 1, 2)));
        assert!(!reporter.report(hit(0, 2, 3)));
        assert_eq!(reporter.count(), 2);
        assert_eq!(reporter.finish().unwrap(), 2);
    }

    #[test]
    fn count_only() {
        let patterns = vec!["a".to_string()];
        let mut config = config(Format::Text);
        config.count_only = true;
        let mut out = Vec::new();
        let mut reporter = Reporter::new(&mut out, &patterns, &config);
        reporter.report(hit(0, 0, 1));
        reporter.report(hit(0, 1, 2));
        reporter.finish().unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "2\n");
    }
}
