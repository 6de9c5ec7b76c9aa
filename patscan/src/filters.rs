//! Filtering for recursive directory walks.
//!
//! Non-recursive invocations scan exactly the files they were given; these
//! filters only prune walked trees, driven by the defaults file rather than
//! flags (see [`crate::config`]).

use glob::Pattern;
use std::path::Path;

/// Walk-time filters: glob patterns to skip and an optional extension
/// allowlist. Empty filters admit everything.
#[derive(Debug, Clone, Default)]
pub struct WalkFilters {
    pub ignore_patterns: Vec<String>,
    pub file_extensions: Option<Vec<String>>,
}

/// True if the path's extension is in the allowlist (or no allowlist is
/// configured). Comparison ignores ASCII case.
pub fn matches_extension(path: &Path, extensions: &Option<Vec<String>>) -> bool {
    let Some(allowed) = extensions else {
        return true;
    };
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| allowed.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// True if any configured glob matches the path. Backslashes are normalized
/// so the same globs work across platforms.
pub fn is_ignored(path: &Path, ignore_patterns: &[String]) -> bool {
    let normalized = path.to_string_lossy().replace('\\', "/");
    ignore_patterns.iter().any(|pattern| {
        Pattern::new(pattern)
            .map(|p| p.matches(&normalized))
            .unwrap_or(false)
    })
}

/// Combined walk filter applied to every candidate file.
pub fn should_scan(path: &Path, filters: &WalkFilters) -> bool {
    matches_extension(path, &filters.file_extensions) && !is_ignored(path, &filters.ignore_patterns)
}
