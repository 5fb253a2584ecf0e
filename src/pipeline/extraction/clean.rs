use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

/// Lines repeated at least this often are treated as running headers/footers.
const REPEATED_LINE_MIN_COUNT: usize = 4;
/// Only lines shorter than this (in characters) can be headers/footers.
const REPEATED_LINE_MAX_CHARS: usize = 100;

static BLANK_LINE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

static PAGE_NUMBER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\d{1,3}\s*\n").unwrap());

/// Clean extracted text before passing it downstream.
/// Collapses blank-line runs, drops page-number lines and removes running
/// headers/footers, then trims the result.
pub fn clean_text(raw: &str) -> String {
    let text = BLANK_LINE_RUN.replace_all(raw, "\n\n");
    let text = PAGE_NUMBER_LINE.replace_all(&text, "\n");

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for line in text.split('\n') {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            *counts.entry(trimmed).or_default() += 1;
        }
    }

    let repeated: HashSet<&str> = counts
        .into_iter()
        .filter(|(line, count)| {
            *count >= REPEATED_LINE_MIN_COUNT
                && line.chars().count() < REPEATED_LINE_MAX_CHARS
        })
        .map(|(line, _)| line)
        .collect();

    if repeated.is_empty() {
        return text.trim().to_string();
    }

    tracing::debug!(
        patterns = repeated.len(),
        "Removed repeated header/footer lines"
    );

    let kept = text
        .split('\n')
        .filter(|line| !repeated.contains(line.trim()))
        .collect::<Vec<_>>()
        .join("\n");
    // Removed lines can leave their surrounding blank lines adjacent
    BLANK_LINE_RUN.replace_all(&kept, "\n\n").trim().to_string()
}
