//! Input sources and line iteration.
//!
//! A source is either the standard input stream or a named file; recursive
//! invocations expand directory arguments into file sources up front. Lines
//! are LF-delimited, numbered from 1, and a trailing partial line is
//! yielded if it is non-empty.

use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::errors::{ScanError, ScanResult};
use crate::filters::{self, WalkFilters};

/// One place to read lines from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    /// The name used in output prefixes and diagnostics. Stdin has none.
    pub fn name(&self) -> Option<String> {
        match self {
            Source::Stdin => None,
            Source::File(path) => Some(path.display().to_string()),
        }
    }
}

/// Expands command-line path arguments into concrete sources. With no paths
/// the single source is stdin; with `recursive` each path is walked as a
/// directory tree. Paths that cannot be expanded are reported as errors in
/// argument order while the rest proceed.
pub fn expand_paths(
    paths: &[String],
    recursive: bool,
    filters: &WalkFilters,
) -> (Vec<Source>, Vec<ScanError>) {
    if paths.is_empty() {
        return (vec![Source::Stdin], Vec::new());
    }

    let mut sources = Vec::new();
    let mut errors = Vec::new();

    for raw in paths {
        let path = Path::new(raw);
        if recursive {
            if !path.exists() {
                errors.push(ScanError::file_not_found(path));
            } else if !path.is_dir() {
                errors.push(ScanError::not_a_directory(path));
            } else {
                sources.extend(walk_directory(path, filters));
            }
        } else {
            sources.push(Source::File(path.to_path_buf()));
        }
    }

    (sources, errors)
}

/// Collects every file under `root`, filtered and sorted by path so runs
/// are deterministic regardless of directory enumeration order.
fn walk_directory(root: &Path, filters: &WalkFilters) -> Vec<Source> {
    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .hidden(false)
        .follow_links(false);

    let mut files: Vec<PathBuf> = builder
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("walk error under {}: {err}", root.display());
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| entry.into_path())
        .filter(|path| filters::should_scan(path, filters))
        .collect();
    files.sort();

    debug!("walked {}: {} files", root.display(), files.len());
    files.into_iter().map(Source::File).collect()
}

/// Reads a file and returns its numbered lines. Directories, unreadable
/// files, and non-UTF-8 content all come back as a single diagnostic error
/// so the caller can skip the source and move on.
pub fn file_lines(path: &Path) -> ScanResult<impl Iterator<Item = (usize, String)>> {
    let meta = fs::metadata(path).map_err(|e| ScanError::from_io(path, e))?;
    if meta.is_dir() {
        return Err(ScanError::is_directory(path));
    }

    let bytes = fs::read(path).map_err(|e| ScanError::from_io(path, e))?;
    let text = String::from_utf8(bytes).map_err(|_| ScanError::encoding(path))?;

    let lines: Vec<String> = text.lines().map(str::to_string).collect();
    Ok(lines
        .into_iter()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line)))
}

/// Numbered lines from an arbitrary reader (used for stdin). Iteration ends
/// at the first read error; the error is logged rather than fatal.
pub fn reader_lines<R: BufRead>(reader: R) -> impl Iterator<Item = (usize, String)> {
    reader
        .lines()
        .map_while(|result| match result {
            Ok(line) => Some(line),
            Err(err) => {
                warn!("input stream: {err}");
                None
            }
        })
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
}
