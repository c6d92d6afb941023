//! Tolerant M3U parsing
//!
//! A two-register state machine over `#EXTINF` metadata lines and the URL
//! lines that follow them. The primary extraction takes both the
//! `group-title` and the display name from one line; when that fails, a
//! `tvg-name` fallback recovers just the name and leaves the category
//! register untouched. A URL only produces an entry when both registers
//! are populated, so an orphaned name (no category context) emits nothing.

use regex::Regex;

use crate::models::ChannelIndex;

pub struct M3uParser {
    group_title: Regex,
    tvg_name: Regex,
}

impl Default for M3uParser {
    fn default() -> Self {
        Self::new()
    }
}

impl M3uParser {
    pub fn new() -> Self {
        Self {
            group_title: Regex::new(r#"group-title="(.*?)",(.*)"#).expect("static regex"),
            tvg_name: Regex::new(r#"tvg-name="(.*?)""#).expect("static regex"),
        }
    }

    /// Parse one M3U document into a per-source channel index.
    pub fn parse(&self, text: &str) -> ChannelIndex {
        let mut index = ChannelIndex::new();
        let mut current_category: Option<String> = None;
        let mut pending_name: Option<String> = None;

        for line in text.lines() {
            let line = line.trim();

            if line.starts_with("#EXTINF") {
                if let Some(caps) = self.group_title.captures(line) {
                    let category = caps[1].trim().to_string();
                    index.ensure_category(&category);
                    current_category = Some(category);
                    pending_name = Some(caps[2].trim().to_string());
                } else if let Some(caps) = self.tvg_name.captures(line) {
                    // Name-only fallback: the category register keeps
                    // whatever the last full EXTINF established.
                    pending_name = Some(caps[1].trim().to_string());
                }
            } else if !line.is_empty() && !line.starts_with('#') {
                if let (Some(category), Some(name)) = (&current_category, pending_name.take()) {
                    index.push(category, name, line.to_string());
                }
                // URLs without category or name context are dropped.
            }
        }

        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ChannelIndex {
        M3uParser::new().parse(text)
    }

    #[test]
    fn parses_group_title_entries() {
        let index = parse(
            "#EXTM3U\n\
             #EXTINF:-1 tvg-id=\"1\" group-title=\"央视频道\",CCTV1\n\
             http://example.com/cctv1\n",
        );
        let entries = index.entries("央视频道");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "CCTV1");
        assert_eq!(entries[0].url, "http://example.com/cctv1");
    }

    #[test]
    fn category_persists_across_entries() {
        let index = parse(
            "#EXTINF:-1 group-title=\"央视频道\",CCTV1\n\
             http://example.com/1\n\
             #EXTINF:-1 tvg-name=\"CCTV2\"\n\
             http://example.com/2\n",
        );
        let entries = index.entries("央视频道");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].name, "CCTV2");
    }

    #[test]
    fn tvg_name_without_category_context_emits_nothing() {
        // Scenario: no prior group-title, only a tvg-name fallback.
        let index = parse(
            "#EXTINF:-1 tvg-name=\"CCTV1\"\n\
             http://example.com/orphan\n",
        );
        assert!(index.is_empty());
    }

    #[test]
    fn orphaned_extinf_is_overwritten_by_the_next_one() {
        let index = parse(
            "#EXTINF:-1 group-title=\"a\",First\n\
             #EXTINF:-1 group-title=\"b\",Second\n\
             http://example.com/x\n",
        );
        assert!(index.entries("a").is_empty());
        assert_eq!(index.entries("b")[0].name, "Second");
    }

    #[test]
    fn non_extinf_comments_are_ignored() {
        let index = parse(
            "#EXTM3U\n\
             #EXTINF:-1 group-title=\"a\",Chan\n\
             #EXTVLCOPT:network-caching=1000\n\
             http://example.com/1\n",
        );
        assert_eq!(index.entries("a").len(), 1);
    }

    #[test]
    fn url_with_no_pending_name_is_dropped() {
        let index = parse("http://example.com/stray\n");
        assert!(index.is_empty());
    }
}
