//! Heuristic flat-text parsing
//!
//! Flat-text sources are the wild west: `Name,URL` lines grouped under
//! `Category,#genre#` headers in the good case, but also headerless lists,
//! bare URL lines, stray comments and category headers missing their
//! marker. Every rule here degrades gracefully; at worst a line
//! contributes nothing, and no input aborts the source.

use regex::Regex;

use crate::config::CategoryKeyword;
use crate::models::ChannelIndex;

/// Category used when nothing better can be derived from the source URL.
const FALLBACK_CATEGORY: &str = "默认分类";

/// Lines shorter than this may be comments or unmarked category headers.
const SHORT_LINE: usize = 50;

pub struct TextHeuristicParser {
    /// Accepts scheme-prefixed URLs, raw `ip:port` endpoints and any
    /// `scheme://` remainder.
    url_shape: Regex,
    /// Stricter shape for comma-free lines: known schemes or `ip:port` only.
    bare_url: Regex,
    /// Last path segment, with common stream extensions stripped.
    path_name: Regex,
    /// Source document basename, for the per-source default category.
    source_file: Regex,
    /// `name=` query parameter, the second default-category candidate.
    name_param: Regex,
    keywords: Vec<CategoryKeyword>,
}

impl TextHeuristicParser {
    pub fn new(keywords: Vec<CategoryKeyword>) -> Self {
        Self {
            url_shape: Regex::new(
                r"^(https?|rtp|rtsp|udp)://|^\d{1,3}(\.\d{1,3}){3}:\d+|^[a-zA-Z0-9]+://",
            )
            .expect("static regex"),
            bare_url: Regex::new(r"^(https?|rtp|rtsp|udp)://|^\d{1,3}(\.\d{1,3}){3}:\d+")
                .expect("static regex"),
            path_name: Regex::new(r"/([^/]+?)(?:\.m3u8|\.ts|\.mp4)?$").expect("static regex"),
            source_file: Regex::new(r"/([^/]+?)\.(txt|m3u|m3u8)$").expect("static regex"),
            name_param: Regex::new(r"[?&]name=([^&]+)").expect("static regex"),
            keywords,
        }
    }

    /// Parse one flat-text document into a per-source channel index.
    ///
    /// `source_url` is only used to derive the default category name for
    /// entries seen before any category header.
    pub fn parse(&self, text: &str, source_url: &str) -> ChannelIndex {
        let default_category = self.default_category(source_url);
        let mut index = ChannelIndex::new();
        let mut current_category: Option<String> = None;

        for (line_idx, raw_line) in text.lines().enumerate() {
            let line_num = line_idx + 1;
            let line = raw_line.trim();

            if line.is_empty() {
                continue;
            }

            // Short comment line without a comma: harmless, skip.
            if line.starts_with('#')
                && line.chars().count() < SHORT_LINE
                && !line.contains(',')
            {
                continue;
            }

            let lower = line.to_lowercase();

            // Category opener carrying the genre marker anywhere in the line.
            if lower.contains("#genre#") {
                let category = match line.split_once(',') {
                    Some((name, _)) => name.trim().to_string(),
                    None => default_category.clone(),
                };
                index.open_category(&category);
                current_category = Some(category);
                continue;
            }

            if line.contains(',') {
                // "Name,#genre#" variants that slipped past the check above.
                if lower.ends_with("#genre#") {
                    let category = first_field(line);
                    index.open_category(&category);
                    current_category = Some(category);
                    continue;
                }

                let (name_part, url_part) = match line.split_once(',') {
                    Some(parts) => parts,
                    None => continue,
                };
                let url = url_part.trim();

                if self.url_shape.is_match(url) {
                    let name = strip_annotation(name_part);
                    let category = match &current_category {
                        Some(category) => category.clone(),
                        None => {
                            let category = self.fallback_category(&name, &default_category);
                            index.open_category(&category);
                            current_category = Some(category.clone());
                            category
                        }
                    };
                    let name = if name.is_empty() {
                        self.synthesize_name(url, line_num)
                    } else {
                        name
                    };
                    index.push(&category, name, url.to_string());
                } else {
                    // Not URL-shaped: likely a category header that lost its
                    // marker. Category names are short; long text is prose.
                    let candidate = first_field(line);
                    if !candidate.is_empty() && candidate.chars().count() < SHORT_LINE {
                        index.open_category(&candidate);
                        current_category = Some(candidate);
                    }
                }
            } else if self.bare_url.is_match(line) {
                // Anonymous entry: URL with no name at all.
                let name = self.synthesize_name(line, line_num);
                let category = match &current_category {
                    Some(category) => category.clone(),
                    None => {
                        let category = self.fallback_category(&name, &default_category);
                        index.open_category(&category);
                        current_category = Some(category.clone());
                        category
                    }
                };
                index.push(&category, name, line.to_string());
            }
        }

        index
    }

    /// Default category for a source: document basename, then a `name=`
    /// query parameter, then a literal placeholder.
    fn default_category(&self, source_url: &str) -> String {
        if let Some(caps) = self.source_file.captures(source_url) {
            return caps[1].to_string();
        }
        if let Some(caps) = self.name_param.captures(source_url) {
            return caps[1].to_string();
        }
        FALLBACK_CATEGORY.to_string()
    }

    /// First keyword hit wins; the table is ordered and not exhaustive.
    fn fallback_category(&self, name: &str, default_category: &str) -> String {
        self.keywords
            .iter()
            .find(|entry| name.contains(entry.keyword.as_str()))
            .map(|entry| entry.category.clone())
            .unwrap_or_else(|| default_category.to_string())
    }

    /// Name for a nameless entry: last URL path segment, else host, else a
    /// positional placeholder.
    fn synthesize_name(&self, url: &str, line_num: usize) -> String {
        if let Some(caps) = self.path_name.captures(url) {
            return caps[1].to_string();
        }
        if let Some(host) = url::Url::parse(url).ok().and_then(|u| u.host_str().map(String::from)) {
            return host;
        }
        format!("channel_{line_num}")
    }
}

/// Strip a trailing `#...` annotation from a channel name.
fn strip_annotation(name: &str) -> String {
    match name.find('#') {
        Some(pos) => name[..pos].trim().to_string(),
        None => name.trim().to_string(),
    }
}

fn first_field(line: &str) -> String {
    line.split(',').next().unwrap_or_default().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> TextHeuristicParser {
        TextHeuristicParser::new(vec![
            CategoryKeyword {
                keyword: "CCTV".to_string(),
                category: "央视频道".to_string(),
            },
            CategoryKeyword {
                keyword: "卫视".to_string(),
                category: "卫视频道".to_string(),
            },
        ])
    }

    #[test]
    fn parses_categorized_entries() {
        let index = parser().parse(
            "央视频道,#genre#\nCCTV1,http://example.com/1\nCCTV2,http://example.com/2\n",
            "http://host/live.txt",
        );
        let entries = index.entries("央视频道");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "CCTV1");
    }

    #[test]
    fn genre_marker_is_case_insensitive() {
        let index = parser().parse(
            "央视频道,#GENRE#\nCCTV1,http://example.com/1\n",
            "http://host/live.txt",
        );
        assert_eq!(index.entries("央视频道").len(), 1);
    }

    #[test]
    fn bare_genre_marker_opens_default_category() {
        let index = parser().parse(
            "这是一个包含 #genre# 标记但没有逗号的较长行，用来测试默认分类回退逻辑\nChan,http://example.com/1\n",
            "http://host/mylist.txt",
        );
        // Default category is the source document basename.
        assert_eq!(index.entries("mylist").len(), 1);
    }

    #[test]
    fn default_category_falls_back_to_name_param_then_placeholder() {
        let p = parser();
        assert_eq!(p.default_category("http://host/feed?name=hotel"), "hotel");
        assert_eq!(p.default_category("http://host/feed"), FALLBACK_CATEGORY);
    }

    #[test]
    fn short_comment_lines_are_skipped() {
        let index = parser().parse(
            "# update 2024-01-01\n央视频道,#genre#\nCCTV1,http://example.com/1\n",
            "http://host/live.txt",
        );
        assert_eq!(index.entries("央视频道").len(), 1);
    }

    #[test]
    fn keyword_fallback_opens_category_for_headerless_entries() {
        let index = parser().parse(
            "CCTV1,http://example.com/1\n",
            "http://host/feed",
        );
        assert_eq!(index.entries("央视频道").len(), 1);
    }

    #[test]
    fn headerless_entry_without_keyword_uses_default_category() {
        let index = parser().parse(
            "神秘频道,http://example.com/1\n",
            "http://host/somelist.txt",
        );
        assert_eq!(index.entries("somelist").len(), 1);
    }

    #[test]
    fn unmarked_short_header_reopens_category() {
        let index = parser().parse(
            "央视频道,#genre#\nCCTV1,http://example.com/1\n港台频道,备注\n凤凰卫视,http://example.com/2\n",
            "http://host/live.txt",
        );
        assert_eq!(index.entries("央视频道").len(), 1);
        assert_eq!(index.entries("港台频道")[0].name, "凤凰卫视");
    }

    #[test]
    fn long_non_url_line_is_ignored() {
        let prose = "这是一段很长的说明文字，完全不是频道数据，".repeat(4);
        let index = parser().parse(
            &format!("{prose},还有更多文字\n"),
            "http://host/live.txt",
        );
        assert!(index.is_empty());
    }

    #[test]
    fn repeated_genre_header_resets_the_category() {
        let index = parser().parse(
            "央视频道,#genre#\nCCTV1,http://example.com/1\n央视频道,#genre#\nCCTV2,http://example.com/2\n",
            "http://host/live.txt",
        );
        let entries = index.entries("央视频道");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "CCTV2");
    }

    #[test]
    fn bare_url_line_synthesizes_a_name() {
        let index = parser().parse(
            "央视频道,#genre#\nhttp://example.com/cctv5.m3u8\n",
            "http://host/live.txt",
        );
        let entries = index.entries("央视频道");
        assert_eq!(entries[0].name, "cctv5");
        assert_eq!(entries[0].url, "http://example.com/cctv5.m3u8");
    }

    #[test]
    fn ip_port_line_is_a_valid_bare_entry() {
        let index = parser().parse(
            "央视频道,#genre#\n1.2.3.4:8888/stream\n",
            "http://host/live.txt",
        );
        assert_eq!(index.entries("央视频道").len(), 1);
    }

    #[test]
    fn name_annotation_is_stripped() {
        let index = parser().parse(
            "央视频道,#genre#\nCCTV1 #高清,http://example.com/1\n",
            "http://host/live.txt",
        );
        assert_eq!(index.entries("央视频道")[0].name, "CCTV1");
    }

    #[test]
    fn empty_name_is_synthesized_from_url_path() {
        let index = parser().parse(
            "央视频道,#genre#\n,http://example.com/sports.m3u8\n",
            "http://host/live.txt",
        );
        assert_eq!(index.entries("央视频道")[0].name, "sports");
    }

    #[test]
    fn empty_name_falls_back_to_host() {
        let index = parser().parse(
            "央视频道,#genre#\n,http://example.com\n",
            "http://host/live.txt",
        );
        assert_eq!(index.entries("央视频道")[0].name, "example.com");
    }

    #[test]
    fn unparseable_prose_yields_nothing() {
        // Scenario: a source that is just text, no URL-shaped lines.
        let index = parser().parse(
            "hello world\nthis is not a playlist\njust some prose\n",
            "http://host/live.txt",
        );
        assert!(index.is_empty());
    }

    #[test]
    fn trailing_genre_comma_variant_opens_category() {
        let index = parser().parse(
            "港台频道,#Genre#\n凤凰卫视,http://example.com/1\n",
            "http://host/live.txt",
        );
        assert_eq!(index.entries("港台频道").len(), 1);
    }
}
