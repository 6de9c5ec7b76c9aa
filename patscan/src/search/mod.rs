//! Search orchestration: drives the line searcher over a list of sources
//! and maps per-source failures to diagnostics instead of aborting the run.

pub mod printer;
pub mod searcher;

pub use printer::Printer;
pub use searcher::{LineSearcher, SearchOptions};

use std::io::{self, Write};

use tracing::{debug, info};

use crate::regex::PatternSet;
use crate::sources::{self, Source};

/// What a whole run produced, for exit-code mapping at the shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOutcome {
    /// At least one hit across all sources.
    pub matched: bool,
    /// At least one source was skipped with a diagnostic.
    pub source_errors: bool,
}

/// Scans every source in order. Matches go through `printer`; diagnostics
/// for unreadable sources go to stderr and scanning proceeds. Context is
/// disabled for the stdin source.
pub fn scan_sources<W: Write>(
    source_list: &[Source],
    patterns: &PatternSet,
    options: &SearchOptions,
    printer: &mut Printer<W>,
) -> RunOutcome {
    info!(
        sources = source_list.len(),
        patterns = patterns.len(),
        "starting scan"
    );

    let searcher = LineSearcher::new(patterns, options);
    let stream_options = options.without_context();
    let stream_searcher = LineSearcher::new(patterns, &stream_options);

    let mut outcome = RunOutcome::default();
    for source in source_list {
        let result = match source {
            Source::Stdin => {
                let stdin = io::stdin();
                stream_searcher.scan(None, sources::reader_lines(stdin.lock()), printer)
            }
            Source::File(path) => match sources::file_lines(path) {
                Ok(lines) => {
                    let name = source.name();
                    searcher.scan(name.as_deref(), lines, printer)
                }
                Err(err) => {
                    eprintln!("{err}");
                    outcome.source_errors = true;
                    continue;
                }
            },
        };

        match result {
            Ok(matched) => outcome.matched |= matched,
            Err(err) => {
                // The output sink failed (e.g. a closed pipe); there is no
                // point scanning further sources.
                debug!("output error: {err}");
                outcome.source_errors = true;
                break;
            }
        }

        if options.quiet && outcome.matched {
            break;
        }
    }

    debug!(matched = outcome.matched, "scan finished");
    outcome
}
