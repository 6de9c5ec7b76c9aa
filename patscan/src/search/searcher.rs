use std::collections::{HashSet, VecDeque};
use std::io::{self, Write};

use super::printer::Printer;
use crate::regex::PatternSet;

/// Per-line decision flags for one scan.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Emit lines that do not match instead.
    pub invert: bool,
    /// Emit only the per-source hit count.
    pub count_only: bool,
    /// Emit nothing; stop at the first hit.
    pub quiet: bool,
    /// Stop after this many hits per source. Zero means unlimited.
    pub max_count: usize,
    /// Emit only names of sources with a hit.
    pub files_with_matches: bool,
    /// Emit only names of sources with no hit.
    pub files_without_match: bool,
    /// Leading context lines per hit.
    pub before_context: usize,
    /// Trailing context lines per hit.
    pub after_context: usize,
}

impl SearchOptions {
    /// The same options with context disabled, for stream sources.
    pub fn without_context(&self) -> Self {
        SearchOptions {
            before_context: 0,
            after_context: 0,
            ..self.clone()
        }
    }
}

/// Applies a pattern set to the lines of one source and decides, line by
/// line, what to emit.
pub struct LineSearcher<'a> {
    patterns: &'a PatternSet,
    options: &'a SearchOptions,
}

impl<'a> LineSearcher<'a> {
    pub fn new(patterns: &'a PatternSet, options: &'a SearchOptions) -> Self {
        LineSearcher { patterns, options }
    }

    /// Scans a source and returns whether it produced at least one hit.
    ///
    /// Before-context is a bounded queue of the most recent unprinted
    /// lines, flushed on each hit; after-context is a countdown refreshed
    /// by every hit. The printed-line-number set guarantees each line is
    /// emitted at most once however match and context regions overlap.
    pub fn scan<I, W>(
        &self,
        name: Option<&str>,
        lines: I,
        printer: &mut Printer<W>,
    ) -> io::Result<bool>
    where
        I: IntoIterator<Item = (usize, String)>,
        W: Write,
    {
        let opts = self.options;
        let name_only = opts.files_with_matches || opts.files_without_match;
        let suppress_context = opts.count_only || opts.quiet || name_only;

        let mut any = false;
        let mut hits = 0usize;
        let mut before: VecDeque<(usize, String)> = VecDeque::new();
        let mut after_budget = 0usize;
        let mut printed: HashSet<usize> = HashSet::new();

        for (line_no, line) in lines {
            let hit = self.patterns.is_match(&line) != opts.invert;

            if hit {
                any = true;
                hits += 1;
                if opts.quiet || name_only {
                    // The outcome for this source is already decided.
                    break;
                }
                if !opts.count_only {
                    while let Some((no, text)) = before.pop_front() {
                        if printed.insert(no) {
                            printer.line(name, no, &text)?;
                        }
                    }
                    if printed.insert(line_no) {
                        printer.line(name, line_no, &line)?;
                    }
                    after_budget = opts.after_context;
                }
                if opts.max_count > 0 && hits >= opts.max_count {
                    break;
                }
            } else if !suppress_context {
                if after_budget > 0 {
                    if printed.insert(line_no) {
                        printer.line(name, line_no, &line)?;
                    }
                    after_budget -= 1;
                }
                if opts.before_context > 0 {
                    if before.len() == opts.before_context {
                        before.pop_front();
                    }
                    before.push_back((line_no, line));
                }
            }
        }

        if opts.count_only && !opts.quiet && !name_only {
            printer.count(name, hits)?;
        }
        if opts.files_with_matches && any {
            printer.source_name(name)?;
        }
        if opts.files_without_match && !any {
            printer.source_name(name)?;
        }
        Ok(any)
    }
}
