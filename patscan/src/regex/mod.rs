//! Self-contained regular-expression engine.
//!
//! A pattern string is parsed into a token tree ([`Pattern`]) and evaluated
//! against input lines by a recursive backtracking matcher. Supported
//! syntax: literals, `.`, `\d`, `\w`, escaped metacharacters, `[...]` and
//! `[^...]` classes with ranges, `(...)` groups with `|` alternation,
//! greedy `+` and `?`, `^`/`$` anchors at the pattern boundaries, and
//! backreferences `\1`..`\9`.

mod ast;
mod matcher;
mod parser;

pub use ast::{Pattern, Quantifier, Token, TokenKind};
pub use matcher::matches;
pub use parser::{parse, ParseError};

use crate::errors::{ScanError, ScanResult};

/// A compiled, OR-combined set of patterns.
///
/// With case folding enabled, pattern strings are lowercased before parsing
/// and each input line is lowercased before matching, so captured text and
/// backreferences compare case-insensitively as well.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
    ignore_case: bool,
}

impl PatternSet {
    pub fn new(ignore_case: bool) -> Self {
        PatternSet {
            patterns: Vec::new(),
            ignore_case,
        }
    }

    /// Compiles every pattern, failing on the first malformed one.
    pub fn compile<S: AsRef<str>>(patterns: &[S], ignore_case: bool) -> ScanResult<Self> {
        let mut set = PatternSet::new(ignore_case);
        for pattern in patterns {
            set.add(pattern.as_ref())?;
        }
        Ok(set)
    }

    /// Compiles one pattern and adds it to the set.
    pub fn add(&mut self, pattern: &str) -> ScanResult<()> {
        let source = if self.ignore_case {
            pattern.to_lowercase()
        } else {
            pattern.to_string()
        };
        let parsed = parse(&source).map_err(|err| ScanError::invalid_pattern(pattern, err))?;
        self.patterns.push(parsed);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True if any pattern in the set matches the line.
    pub fn is_match(&self, line: &str) -> bool {
        if self.ignore_case {
            let folded = line.to_lowercase();
            self.patterns.iter().any(|p| matches(p, &folded))
        } else {
            self.patterns.iter().any(|p| matches(p, line))
        }
    }
}
