//! Line diff rendering for the preview step
//!
//! Only changed lines are shown; untouched file content stays out of the
//! preview entirely.

use similar::{ChangeTag, TextDiff};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Render the changed lines between two documents
///
/// Returns `None` when the documents are line-identical, which is what the
/// writer uses to short-circuit the whole confirm/backup/write sequence.
pub fn render_changes(old: &str, new: &str) -> Option<String> {
    let diff = TextDiff::from_lines(old, new);
    let mut result = String::new();

    for change in diff.iter_all_changes() {
        let (sign, color) = match change.tag() {
            ChangeTag::Delete => ("- ", RED),
            ChangeTag::Insert => ("+ ", GREEN),
            ChangeTag::Equal => continue,
        };
        result.push_str(color);
        result.push_str(sign);
        result.push_str(change.value().trim_end_matches('\n'));
        result.push_str(RESET);
        result.push('\n');
    }

    if result.is_empty() {
        None
    } else {
        Some(result)
    }
}
