use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use patscan::sources::expand_paths;
use patscan::{
    scan_sources, PatternSet, Printer, ScanError, SearchDefaults, SearchOptions, WalkFilters,
};

const EXIT_MATCH: u8 = 0;
const EXIT_NO_MATCH: u8 = 1;
const EXIT_ERROR: u8 = 2;

const PATTERN_HELP: &str = "\
Pattern syntax:
  literals      match exact characters
  (group)       capturing group with | alternation
  +             one or more of the previous token
  ?             zero or one of the previous token
  [abc]         character class ([a-d] ranges are inclusive)
  [^abc]        negated character class
  ^             start-of-line anchor (pattern start only)
  $             end-of-line anchor (pattern end only)
  \\1..\\9        backreference to a captured group
  \\d, \\w        digit and word classes
  .             any single character

Examples:
  patscan -E \"error\" log.txt
  patscan -r -n \"^import\" src/
  patscan -c \"\\d+\" data.txt";

/// Search for patterns in files using a built-in regex engine.
#[derive(Debug, Parser)]
#[command(name = "patscan", version, about, after_help = PATTERN_HELP)]
struct Cli {
    /// Use extended regular expression syntax (the default; accepted for
    /// compatibility)
    #[arg(short = 'E', long = "extended-regexp")]
    extended_regexp: bool,

    /// Add a pattern to search for (repeatable)
    #[arg(short = 'e', long = "regexp", value_name = "PATTERN")]
    regexp: Vec<String>,

    /// Read patterns from a file, one per line
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pattern_files: Vec<PathBuf>,

    /// Recursively search all files under each directory
    #[arg(short = 'r', short_alias = 'R', long = "recursive")]
    recursive: bool,

    /// Prefix each output line with its line number
    #[arg(short = 'n', long = "line-number")]
    line_number: bool,

    /// Ignore case distinctions
    #[arg(short = 'i', long = "ignore-case")]
    ignore_case: bool,

    /// Select lines that do not match
    #[arg(short = 'v', long = "invert-match")]
    invert_match: bool,

    /// Print only a count of matching lines per source
    #[arg(short = 'c', long = "count")]
    count: bool,

    /// Print NUM lines of trailing context
    #[arg(
        short = 'A',
        long = "after-context",
        value_name = "NUM",
        default_value_t = 0
    )]
    after_context: usize,

    /// Print NUM lines of leading context
    #[arg(
        short = 'B',
        long = "before-context",
        value_name = "NUM",
        default_value_t = 0
    )]
    before_context: usize,

    /// Print NUM lines of leading and trailing context
    #[arg(short = 'C', long = "context", value_name = "NUM")]
    context: Option<usize>,

    /// Suppress all normal output; exit on the first match
    #[arg(short = 'q', long = "quiet", alias = "silent")]
    quiet: bool,

    /// Stop after NUM matches per source (0 means unlimited)
    #[arg(
        short = 'm',
        long = "max-count",
        value_name = "NUM",
        default_value_t = 0
    )]
    max_count: usize,

    /// Print only names of sources containing a match
    #[arg(
        short = 'l',
        long = "files-with-matches",
        conflicts_with = "files_without_match"
    )]
    files_with_matches: bool,

    /// Print only names of sources containing no match
    #[arg(short = 'L', long = "files-without-match")]
    files_without_match: bool,

    /// Pattern to search for (optional when -e or -f supplies one)
    #[arg(value_name = "PATTERN")]
    pattern: Option<String>,

    /// Files, or directories with --recursive, to search
    #[arg(value_name = "FILE")]
    files: Vec<String>,
}

/// Resolves the pattern list and search paths from the mixed positional
/// grammar: the first positional is the pattern only when neither `-e` nor
/// `-f` supplied one, otherwise it is a path.
fn resolve_inputs(cli: &Cli) -> Result<(Vec<String>, Vec<String>), ScanError> {
    let mut patterns: Vec<String> = cli.regexp.clone();
    for path in &cli.pattern_files {
        let text = fs::read_to_string(path).map_err(|e| ScanError::from_io(path, e))?;
        patterns.extend(text.lines().filter(|l| !l.is_empty()).map(str::to_string));
    }

    let mut paths: Vec<String> = Vec::new();
    if patterns.is_empty() {
        match &cli.pattern {
            Some(pattern) => patterns.push(pattern.clone()),
            None => return Err(ScanError::config_error("no pattern given")),
        }
    } else if let Some(first) = &cli.pattern {
        paths.push(first.clone());
    }
    paths.extend(cli.files.iter().cloned());

    if cli.recursive && paths.is_empty() {
        return Err(ScanError::config_error(
            "at least one path is required for a recursive search",
        ));
    }

    Ok((patterns, paths))
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_env("PATSCAN_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let defaults = match SearchDefaults::load() {
        Ok(defaults) => defaults,
        Err(err) => {
            eprintln!("patscan: ignoring unreadable defaults file: {err}");
            SearchDefaults::default()
        }
    };
    init_logging(&defaults.log_level);

    if cli.extended_regexp {
        debug!("--extended-regexp is the default; flag has no effect");
    }

    let (patterns, paths) = match resolve_inputs(&cli) {
        Ok(resolved) => resolved,
        Err(err) => {
            eprintln!("patscan: {err}");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let before = cli.context.unwrap_or(cli.before_context);
    let after = cli.context.unwrap_or(cli.after_context);
    let merged = defaults.merge_cli(cli.ignore_case, cli.line_number, before, after);

    let mut pattern_set = PatternSet::new(merged.ignore_case);
    let mut pattern_error = false;
    for pattern in &patterns {
        if let Err(err) = pattern_set.add(pattern) {
            eprintln!("{err}");
            pattern_error = true;
        }
    }
    if pattern_set.is_empty() {
        return ExitCode::from(EXIT_ERROR);
    }

    let filters = WalkFilters {
        ignore_patterns: merged.ignore_patterns.clone(),
        file_extensions: merged.file_extensions.clone(),
    };
    let (source_list, expand_errors) = expand_paths(&paths, cli.recursive, &filters);
    for err in &expand_errors {
        eprintln!("{err}");
    }

    let options = SearchOptions {
        invert: cli.invert_match,
        count_only: cli.count,
        quiet: cli.quiet,
        max_count: cli.max_count,
        files_with_matches: cli.files_with_matches,
        files_without_match: cli.files_without_match,
        before_context: merged.before_context,
        after_context: merged.after_context,
    };

    let show_filename = cli.recursive || paths.len() > 1;
    let stdout = io::stdout();
    let mut printer = Printer::new(stdout.lock(), show_filename, merged.line_number);

    let outcome = scan_sources(&source_list, &pattern_set, &options, &mut printer);

    if outcome.matched {
        ExitCode::from(EXIT_MATCH)
    } else if pattern_error {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_NO_MATCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn positional_pattern_then_files() {
        let cli = parse(&["patscan", "needle", "a.txt", "b.txt"]);
        let (patterns, paths) = resolve_inputs(&cli).unwrap();
        assert_eq!(patterns, vec!["needle"]);
        assert_eq!(paths, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn explicit_patterns_free_the_first_positional() {
        let cli = parse(&["patscan", "-e", "one", "-e", "two", "a.txt", "b.txt"]);
        let (patterns, paths) = resolve_inputs(&cli).unwrap();
        assert_eq!(patterns, vec!["one", "two"]);
        assert_eq!(paths, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn pattern_files_supply_patterns() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("patterns.txt");
        fs::write(&list, "alpha\n\nbeta\n").unwrap();

        let cli = parse(&["patscan", "-f", list.to_str().unwrap(), "data.txt"]);
        let (patterns, paths) = resolve_inputs(&cli).unwrap();
        assert_eq!(patterns, vec!["alpha", "beta"]);
        assert_eq!(paths, vec!["data.txt"]);
    }

    #[test]
    fn missing_pattern_file_is_an_error() {
        let cli = parse(&["patscan", "-f", "/definitely/not/here.txt"]);
        assert!(matches!(
            resolve_inputs(&cli),
            Err(ScanError::FileNotFound { .. })
        ));
    }

    #[test]
    fn no_pattern_at_all_is_an_error() {
        let cli = parse(&["patscan"]);
        assert!(resolve_inputs(&cli).is_err());
    }

    #[test]
    fn recursive_needs_a_path() {
        let cli = parse(&["patscan", "-r", "needle"]);
        assert!(resolve_inputs(&cli).is_err());

        let cli = parse(&["patscan", "-r", "needle", "src"]);
        let (_, paths) = resolve_inputs(&cli).unwrap();
        assert_eq!(paths, vec!["src"]);
    }

    #[test]
    fn list_modes_are_mutually_exclusive() {
        assert!(Cli::try_parse_from(["patscan", "-l", "-L", "x", "f"]).is_err());
    }

    #[test]
    fn context_flag_sets_both_sides() {
        let cli = parse(&["patscan", "-C", "3", "x", "f"]);
        assert_eq!(cli.context, Some(3));
        let before = cli.context.unwrap_or(cli.before_context);
        let after = cli.context.unwrap_or(cli.after_context);
        assert_eq!((before, after), (3, 3));
    }

    #[test]
    fn uppercase_r_is_recursive_too() {
        let cli = parse(&["patscan", "-R", "x", "d"]);
        assert!(cli.recursive);
    }
}
