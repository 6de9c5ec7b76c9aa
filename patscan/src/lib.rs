//! Line-oriented text search with a self-contained regular-expression
//! engine: a pattern parser and recursive backtracking matcher with capture
//! groups and backreferences, plus the line searcher, output formatting,
//! and source iteration that turn it into a grep-style tool.

pub mod config;
pub mod errors;
pub mod filters;
pub mod regex;
pub mod search;
pub mod sources;

pub use config::SearchDefaults;
pub use errors::{ScanError, ScanResult};
pub use filters::WalkFilters;
pub use regex::{matches, parse, ParseError, Pattern, PatternSet};
pub use search::{scan_sources, LineSearcher, Printer, RunOutcome, SearchOptions};
pub use sources::Source;
