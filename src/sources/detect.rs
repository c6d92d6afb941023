//! Source format classification
//!
//! A cheap structural sniff over a bounded prefix of the document, not a
//! grammar check. Ambiguous or truncated content defaults to flat-text,
//! whose parser degrades gracefully on anything.

use crate::models::SourceFormat;

/// How many non-empty lines the sniff examines.
const SNIFF_LINES: usize = 10;

/// Classify raw source text as M3U or flat-text.
pub fn detect_format(text: &str) -> SourceFormat {
    let is_m3u = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(SNIFF_LINES)
        .any(|line| line.contains("#EXTINF"));

    if is_m3u {
        SourceFormat::M3u
    } else {
        SourceFormat::Text
    }
}
