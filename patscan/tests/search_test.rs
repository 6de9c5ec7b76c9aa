use std::fs;
use std::path::Path;

use patscan::sources::expand_paths;
use patscan::{scan_sources, PatternSet, Printer, SearchOptions, Source, WalkFilters};
use tempfile::tempdir;

fn write_file(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path.display().to_string()
}

fn scan(
    paths: &[String],
    pattern: &str,
    options: &SearchOptions,
    line_numbers: bool,
) -> (bool, String) {
    let patterns = PatternSet::compile(&[pattern], false).unwrap();
    let sources: Vec<Source> = paths
        .iter()
        .map(|p| Source::File(p.into()))
        .collect();
    let show_filename = sources.len() > 1;
    let mut printer = Printer::new(Vec::new(), show_filename, line_numbers);
    let outcome = scan_sources(&sources, &patterns, options, &mut printer);
    (
        outcome.matched,
        String::from_utf8(printer.into_inner()).unwrap(),
    )
}

#[test]
fn matching_lines_are_emitted() {
    let dir = tempdir().unwrap();
    let file = write_file(dir.path(), "fruit.txt", "apple\nbanana\ncherry\n");

    let (matched, out) = scan(&[file], "an", &SearchOptions::default(), false);
    assert!(matched);
    assert_eq!(out, "banana\n");
}

#[test]
fn inverted_numbered_output() {
    let dir = tempdir().unwrap();
    let file = write_file(dir.path(), "lines.txt", "line1\nline2\nline3\n");

    let options = SearchOptions {
        invert: true,
        ..SearchOptions::default()
    };
    let (matched, out) = scan(&[file], "line2", &options, true);
    assert!(matched);
    assert_eq!(out, "1:line1\n3:line3\n");
}

#[test]
fn backreference_selects_repeated_words() {
    let dir = tempdir().unwrap();
    let file = write_file(dir.path(), "pets.txt", "cat and cat\ndog and cat\n");

    let (matched, out) = scan(&[file], r"(\w+) and \1", &SearchOptions::default(), false);
    assert!(matched);
    assert_eq!(out, "cat and cat\n");
}

#[test]
fn count_mode_prints_the_total() {
    let dir = tempdir().unwrap();
    let file = write_file(dir.path(), "log.txt", "Error: A\nError: B\nError: C\n");

    let options = SearchOptions {
        count_only: true,
        ..SearchOptions::default()
    };
    let (matched, out) = scan(&[file], "Error", &options, false);
    assert!(matched);
    assert_eq!(out, "3\n");
}

#[test]
fn context_lines_are_printed_once() {
    let dir = tempdir().unwrap();
    let file = write_file(dir.path(), "alpha.txt", "a\nb\nc\nd\ne\n");

    let options = SearchOptions {
        before_context: 1,
        after_context: 1,
        ..SearchOptions::default()
    };
    let (matched, out) = scan(&[file], "c", &options, false);
    assert!(matched);
    assert_eq!(out, "b\nc\nd\n");
}

#[test]
fn files_with_matches_names_the_matching_file() {
    let dir = tempdir().unwrap();
    let a = write_file(dir.path(), "A", "x\n");
    let b = write_file(dir.path(), "B", "y\n");

    let options = SearchOptions {
        files_with_matches: true,
        ..SearchOptions::default()
    };
    let (matched, out) = scan(&[a, b.clone()], "y", &options, false);
    assert!(matched);
    assert_eq!(out, format!("{b}\n"));
}

#[test]
fn files_without_match_names_the_other_file() {
    let dir = tempdir().unwrap();
    let a = write_file(dir.path(), "A", "x\n");
    let b = write_file(dir.path(), "B", "y\n");

    let options = SearchOptions {
        files_without_match: true,
        ..SearchOptions::default()
    };
    let (matched, out) = scan(&[a.clone(), b], "y", &options, false);
    assert!(matched);
    assert_eq!(out, format!("{a}\n"));
}

#[test]
fn multiple_files_get_filename_prefixes() {
    let dir = tempdir().unwrap();
    let a = write_file(dir.path(), "one.txt", "needle here\nnothing\n");
    let b = write_file(dir.path(), "two.txt", "also a needle\n");

    let (matched, out) = scan(&[a.clone(), b.clone()], "needle", &SearchOptions::default(), false);
    assert!(matched);
    assert_eq!(out, format!("{a}:needle here\n{b}:also a needle\n"));
}

#[test]
fn per_file_counts_in_multi_file_mode() {
    let dir = tempdir().unwrap();
    let a = write_file(dir.path(), "one.txt", "hit\nhit\n");
    let b = write_file(dir.path(), "two.txt", "miss\n");

    let options = SearchOptions {
        count_only: true,
        ..SearchOptions::default()
    };
    let (matched, out) = scan(&[a.clone(), b.clone()], "hit", &options, false);
    assert!(matched);
    assert_eq!(out, format!("{a}:2\n{b}:0\n"));
}

#[test]
fn unreadable_files_are_skipped_not_fatal() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("gone.txt").display().to_string();
    let good = write_file(dir.path(), "good.txt", "present\n");

    let (matched, out) = scan(&[missing, good], "present", &SearchOptions::default(), false);
    assert!(matched);
    assert!(out.contains("present"));
}

#[test]
fn non_utf8_files_are_skipped() {
    let dir = tempdir().unwrap();
    let blob = dir.path().join("blob.bin");
    fs::write(&blob, [0xff, 0xfe, 0x41]).unwrap();
    let good = write_file(dir.path(), "good.txt", "text line\n");

    let (matched, out) = scan(
        &[blob.display().to_string(), good],
        "text",
        &SearchOptions::default(),
        false,
    );
    assert!(matched);
    assert_eq!(out.lines().count(), 1);
}

#[test]
fn recursive_scan_visits_nested_files_in_order() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "b.txt", "needle b\n");
    write_file(dir.path(), "a.txt", "needle a\n");
    write_file(dir.path(), "sub/c.txt", "needle c\nplain\n");

    let root = dir.path().display().to_string();
    let (sources, errors) = expand_paths(&[root], true, &WalkFilters::default());
    assert!(errors.is_empty());
    assert_eq!(sources.len(), 3);

    let patterns = PatternSet::compile(&["needle"], false).unwrap();
    let mut printer = Printer::new(Vec::new(), true, false);
    let outcome = scan_sources(
        &sources,
        &patterns,
        &SearchOptions::default(),
        &mut printer,
    );
    assert!(outcome.matched);

    let out = String::from_utf8(printer.into_inner()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("needle a"));
    assert!(lines[1].ends_with("needle b"));
    assert!(lines[2].ends_with("needle c"));
}

#[test]
fn recursive_walk_honors_configured_filters() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "keep.txt", "needle\n");
    write_file(dir.path(), "skip.log", "needle\n");

    let filters = WalkFilters {
        ignore_patterns: vec!["**/*.log".to_string()],
        file_extensions: None,
    };
    let root = dir.path().display().to_string();
    let (sources, _) = expand_paths(&[root], true, &filters);
    assert_eq!(sources.len(), 1);
    assert!(sources[0].name().unwrap().ends_with("keep.txt"));
}

#[test]
fn case_insensitive_search_end_to_end() {
    let dir = tempdir().unwrap();
    let file = write_file(dir.path(), "mixed.txt", "WARN: disk\ninfo: ok\nWarn: net\n");

    let patterns = PatternSet::compile(&["^warn"], true).unwrap();
    let sources = vec![Source::File(file.into())];
    let mut printer = Printer::new(Vec::new(), false, false);
    let outcome = scan_sources(
        &sources,
        &patterns,
        &SearchOptions::default(),
        &mut printer,
    );
    assert!(outcome.matched);
    let out = String::from_utf8(printer.into_inner()).unwrap();
    assert_eq!(out, "WARN: disk\nWarn: net\n");
}
