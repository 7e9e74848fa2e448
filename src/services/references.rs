use std::sync::OnceLock;

use regex::Regex;

use crate::models::reference::ReferenceMark;

fn marker_regex() -> &'static Regex {
    static MARKER_RE: OnceLock<Regex> = OnceLock::new();
    MARKER_RE.get_or_init(|| {
        Regex::new(r"!\[Source-([0-9])\]\(([^)]+)\)").expect("source marker pattern is valid")
    })
}

/// Extracts every `![Source-D](P)` marker, in order of appearance.
///
/// Repeated paths are kept as separate marks.
pub fn extract(text: &str) -> Vec<ReferenceMark> {
    marker_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let digit = caps.get(1)?.as_str().chars().next()?;
            let path = caps.get(2)?.as_str();
            Some(ReferenceMark::new(digit, path))
        })
        .collect()
}

/// Removes markers so chat text can be displayed without them.
pub fn strip_markers(text: &str) -> String {
    marker_regex().replace_all(text, "").into_owned()
}
