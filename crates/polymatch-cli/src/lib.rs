// polymatch-cli: pattern loading, automaton assembly and corpus scanning for
// the polymatch-find tool.

pub mod config;
pub mod output;

use std::fs::File;
use std::io::{self, ErrorKind, Read, Write};
use std::path::Path;

use anyhow::Context;
use polymatch_automaton::{
    Automaton, BuildError, ChildMap, DenseAhoCorasick, HashedChildren, LazyAhoCorasick,
    OrderedChildren, StreamSearcher, Symbol, TrieBuilder,
};
use tracing::debug;

use crate::config::{Backend, FindConfig, Input, Mode, Strategy};
use crate::output::Reporter;

/// Bytes read from an input per chunk.
const CHUNK_SIZE: usize = 64 * 1024;

/// Process exit codes, grep style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// At least one match (or a completed dump).
    Success = 0,
    /// Scan completed without a match.
    NoMatch = 1,
    /// Bad arguments, unreadable input or an invalid pattern set.
    Error = 2,
}

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

/// Collect patterns from the patterns file (one per line) and `-e` flags.
///
/// Lines are split on `\n` with a trailing `\r` removed; empty lines are
/// skipped. Inline patterns follow the file's patterns and are kept even when
/// empty, since they were given explicitly.
pub fn load_patterns(config: &FindConfig) -> anyhow::Result<Vec<Vec<u8>>> {
    let mut patterns = Vec::new();
    if let Some(path) = &config.patterns_file {
        let data = std::fs::read(path)
            .with_context(|| format!("failed to read patterns from {}", path.display()))?;
        patterns.extend(split_lines(&data));
    }
    patterns.extend(config.inline_patterns.iter().map(|p| p.as_bytes().to_vec()));
    debug!(patterns = patterns.len(), "loaded patterns");
    Ok(patterns)
}

fn split_lines(data: &[u8]) -> impl Iterator<Item = Vec<u8>> + '_ {
    data.split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(<[u8]>::to_vec)
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Build the automaton for `strategy` over children backend `M`.
pub fn assemble<S, M>(
    patterns: Vec<Vec<S>>,
    strategy: Strategy,
) -> Result<Box<dyn Automaton<S>>, BuildError>
where
    S: Symbol,
    M: ChildMap<S> + 'static,
{
    let mut builder = TrieBuilder::<S, M>::default();
    builder.extend(patterns)?;
    debug!(
        states = builder.state_count(),
        patterns = builder.pattern_count(),
        ?strategy,
        "built trie"
    );
    Ok(match strategy {
        Strategy::Walk => Box::new(builder.complete()),
        Strategy::Dense => Box::new(DenseAhoCorasick::new(builder.complete())?),
        Strategy::Lazy => Box::new(LazyAhoCorasick::new(builder)),
    })
}

fn assemble_with_backend<S: Symbol>(
    patterns: Vec<Vec<S>>,
    config: &FindConfig,
) -> Result<Box<dyn Automaton<S>>, BuildError> {
    match config.backend {
        Backend::Ordered => assemble::<S, OrderedChildren<S>>(patterns, config.strategy),
        Backend::Hashed => assemble::<S, HashedChildren<S>>(patterns, config.strategy),
    }
}

fn write_dump<S, M, W>(patterns: Vec<Vec<S>>, out: &mut W) -> anyhow::Result<()>
where
    S: Symbol,
    M: ChildMap<S>,
    W: Write,
{
    let mut builder = TrieBuilder::<S, M>::default();
    builder.extend(patterns)?;
    let automaton = builder.complete();
    write!(out, "{}", automaton.dump())?;
    out.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

/// Symbol unit the tool can scan with.
trait ScanUnit: Symbol {
    /// Convert one raw pattern into symbols; `index` is for error messages.
    fn symbols(pattern: &[u8], index: usize) -> anyhow::Result<Vec<Self>>;

    /// Feed all of `input` to `automaton`, reporting matches. Returns `false`
    /// if the reporter stopped the scan.
    fn scan<W: Write>(
        automaton: &dyn Automaton<Self>,
        input: &mut dyn Read,
        reporter: &mut Reporter<'_, W>,
    ) -> io::Result<bool>;
}

impl ScanUnit for u8 {
    fn symbols(pattern: &[u8], _index: usize) -> anyhow::Result<Vec<u8>> {
        Ok(pattern.to_vec())
    }

    fn scan<W: Write>(
        automaton: &dyn Automaton<u8>,
        input: &mut dyn Read,
        reporter: &mut Reporter<'_, W>,
    ) -> io::Result<bool> {
        let mut stream = StreamSearcher::new(automaton);
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            let n = match input.read(&mut buf) {
                Ok(0) => return Ok(true),
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if !stream.feed(buf[..n].iter().copied(), |m| reporter.report(m)) {
                return Ok(false);
            }
        }
    }
}

impl ScanUnit for char {
    fn symbols(pattern: &[u8], index: usize) -> anyhow::Result<Vec<char>> {
        let text = std::str::from_utf8(pattern)
            .with_context(|| format!("pattern {index} is not valid UTF-8"))?;
        Ok(text.chars().collect())
    }

    // A chunk may end inside a UTF-8 sequence; those bytes are carried over
    // to the front of the buffer and completed by the next read.
    fn scan<W: Write>(
        automaton: &dyn Automaton<char>,
        input: &mut dyn Read,
        reporter: &mut Reporter<'_, W>,
    ) -> io::Result<bool> {
        let mut stream = StreamSearcher::new(automaton);
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut carry = 0;
        loop {
            let n = match input.read(&mut buf[carry..]) {
                Ok(0) if carry == 0 => return Ok(true),
                Ok(0) => {
                    return Err(io::Error::new(
                        ErrorKind::InvalidData,
                        "input ends inside a UTF-8 sequence",
                    ));
                }
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            let filled = carry + n;
            let valid = match std::str::from_utf8(&buf[..filled]) {
                Ok(_) => filled,
                Err(e) if e.error_len().is_none() => e.valid_up_to(),
                Err(e) => return Err(io::Error::new(ErrorKind::InvalidData, e)),
            };
            let text = std::str::from_utf8(&buf[..valid])
                .map_err(|e| io::Error::new(ErrorKind::InvalidData, e))?;
            if !stream.feed(text.chars(), |m| reporter.report(m)) {
                return Ok(false);
            }
            buf.copy_within(valid..filled, 0);
            carry = filled - valid;
        }
    }
}

fn open(input: &Input) -> anyhow::Result<Box<dyn Read>> {
    Ok(match input {
        Input::Stdin => Box::new(io::stdin().lock()),
        Input::File(path) => Box::new(open_file(path)?),
    })
}

fn open_file(path: &Path) -> anyhow::Result<File> {
    File::open(path).with_context(|| format!("failed to open {}", path.display()))
}

fn run_with<S: ScanUnit, W: Write>(
    config: &FindConfig,
    raw: &[Vec<u8>],
    mut out: W,
) -> anyhow::Result<ExitCode> {
    let patterns = raw
        .iter()
        .enumerate()
        .map(|(index, pattern)| S::symbols(pattern, index))
        .collect::<anyhow::Result<Vec<Vec<S>>>>()?;

    if config.dump {
        match config.backend {
            Backend::Ordered => write_dump::<S, OrderedChildren<S>, W>(patterns, &mut out)?,
            Backend::Hashed => write_dump::<S, HashedChildren<S>, W>(patterns, &mut out)?,
        }
        return Ok(ExitCode::Success);
    }

    let automaton = assemble_with_backend(patterns, config)?;
    let names: Vec<String> = raw
        .iter()
        .map(|p| String::from_utf8_lossy(p).into_owned())
        .collect();
    let mut reporter = Reporter::new(out, &names, config);

    let mut failed_inputs = 0;
    for input in &config.inputs {
        let name = input.display_name();
        if config.label_inputs() {
            reporter.set_label(Some(name.clone()));
        }
        match scan_input::<S, W>(automaton.as_ref(), input, &mut reporter) {
            Ok(complete) => {
                debug!(input = %name, matches = reporter.count(), complete, "scanned input");
            }
            Err(e) => {
                // Reported like grep: name the input, keep going, fail at exit.
                eprintln!("polymatch-find: {e:#}");
                failed_inputs += 1;
            }
        }
        if !reporter.wants_more() {
            break;
        }
    }

    let count = reporter.finish().context("failed to write output")?;
    Ok(if failed_inputs > 0 {
        ExitCode::Error
    } else if count > 0 {
        ExitCode::Success
    } else {
        ExitCode::NoMatch
    })
}

fn scan_input<S: ScanUnit, W: Write>(
    automaton: &dyn Automaton<S>,
    input: &Input,
    reporter: &mut Reporter<'_, W>,
) -> anyhow::Result<bool> {
    let mut reader = open(input)?;
    S::scan(automaton, &mut reader, reporter)
        .with_context(|| format!("failed to read {}", input.display_name()))
}

/// Load patterns, build the automaton and scan every input, writing results
/// to `out`.
pub fn run<W: Write>(config: &FindConfig, out: W) -> anyhow::Result<ExitCode> {
    let raw = load_patterns(config)?;
    match config.mode {
        Mode::Bytes => run_with::<u8, W>(config, &raw, out),
        Mode::Chars => run_with::<char, W>(config, &raw, out),
    }
}
