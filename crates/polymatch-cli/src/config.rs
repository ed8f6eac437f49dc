// Command-line arguments and the resolved search configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Report every occurrence of a set of literal patterns in files or stdin.
#[derive(Debug, Parser)]
#[command(name = "polymatch-find")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// File with one pattern per line (empty lines are skipped)
    #[arg(short = 'p', long = "patterns", value_name = "FILE", env = "POLYMATCH_PATTERNS")]
    pub patterns_file: Option<PathBuf>,

    /// Add a pattern (repeatable)
    #[arg(short = 'e', long = "pattern", value_name = "PATTERN")]
    pub patterns: Vec<String>,

    /// Files to scan; stdin when none (or "-") is given. An unreadable file
    /// is reported and skipped, and the exit status becomes 2
    #[arg(value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Symbol unit: raw bytes or Unicode scalar values
    #[arg(long, value_enum, default_value_t = Mode::Bytes)]
    pub mode: Mode,

    /// Transition strategy
    #[arg(long, value_enum, default_value_t = Strategy::Walk, env = "POLYMATCH_STRATEGY")]
    pub strategy: Strategy,

    /// Children container used by trie nodes
    #[arg(long, value_enum, default_value_t = Backend::Ordered, env = "POLYMATCH_BACKEND")]
    pub backend: Backend,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Stop after N matches
    #[arg(short = 'm', long, value_name = "N")]
    pub max_matches: Option<u64>,

    /// Print only the number of matches
    #[arg(short, long)]
    pub count: bool,

    /// Print the automaton's state table and exit
    #[arg(long)]
    pub dump: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Offsets count bytes
    Bytes,
    /// Offsets count chars; input must be UTF-8
    Chars,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Completed automaton, failure links walked on mismatch
    Walk,
    /// Precomputed goto table
    Dense,
    /// Links resolved on first use
    Lazy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    Ordered,
    Hashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// `start<TAB>end<TAB>pattern`, prefixed by the input name when scanning
    /// several inputs
    Text,
    /// One JSON object per line
    Json,
}

/// Where a corpus comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    /// Name used in output lines.
    pub fn display_name(&self) -> String {
        match self {
            Input::Stdin => "(standard input)".to_string(),
            Input::File(path) => path.display().to_string(),
        }
    }
}

/// Fully resolved search settings.
#[derive(Debug, Clone)]
pub struct FindConfig {
    pub patterns_file: Option<PathBuf>,
    pub inline_patterns: Vec<String>,
    pub inputs: Vec<Input>,
    pub mode: Mode,
    pub strategy: Strategy,
    pub backend: Backend,
    pub format: Format,
    pub max_matches: Option<u64>,
    pub count_only: bool,
    pub dump: bool,
}

impl From<Cli> for FindConfig {
    fn from(cli: Cli) -> Self {
        let mut inputs: Vec<Input> = cli
            .inputs
            .into_iter()
            .map(|path| {
                if path.as_os_str() == "-" {
                    Input::Stdin
                } else {
                    Input::File(path)
                }
            })
            .collect();
        if inputs.is_empty() {
            inputs.push(Input::Stdin);
        }

        Self {
            patterns_file: cli.patterns_file,
            inline_patterns: cli.patterns,
            inputs,
            mode: cli.mode,
            strategy: cli.strategy,
            backend: cli.backend,
            format: cli.format,
            max_matches: cli.max_matches,
            count_only: cli.count,
            dump: cli.dump,
        }
    }
}

impl FindConfig {
    /// Whether output lines carry the input name.
    pub fn label_inputs(&self) -> bool {
        self.inputs.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> FindConfig {
        let argv = std::iter::once("polymatch-find").chain(args.iter().copied());
        FindConfig::from(Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let config = parse(&["-e", "he"]);
        assert_eq!(config.inline_patterns, vec!["he"]);
        assert_eq!(config.inputs, vec![Input::Stdin]);
        assert_eq!(config.mode, Mode::Bytes);
        assert_eq!(config.format, Format::Text);
        assert_eq!(config.max_matches, None);
        assert!(!config.count_only);
        assert!(!config.label_inputs());
    }

    #[test]
    fn dash_means_stdin() {
        let config = parse(&["-e", "x", "a.txt", "-"]);
        assert_eq!(
            config.inputs,
            vec![Input::File(PathBuf::from("a.txt")), Input::Stdin]
        );
        assert!(config.label_inputs());
    }

    #[test]
    fn value_enums() {
        let config = parse(&[
            "--mode",
            "chars",
            "--strategy",
            "lazy",
            "--backend",
            "hashed",
            "--format",
            "json",
            "-m",
            "3",
            "-c",
        ]);
        assert_eq!(config.mode, Mode::Chars);
        assert_eq!(config.strategy, Strategy::Lazy);
        assert_eq!(config.backend, Backend::Hashed);
        assert_eq!(config.format, Format::Json);
        assert_eq!(config.max_matches, Some(3));
        assert!(config.count_only);
    }

    #[test]
    fn rejects_unknown_strategy() {
        let argv = ["polymatch-find", "--strategy", "fast"];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
