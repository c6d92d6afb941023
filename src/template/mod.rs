//! Channel template loading
//!
//! The template is a plain text document: `<category>,#genre#` lines open a
//! category, and any following non-comment line contributes its first
//! comma-delimited field as a channel name. Lines before the first category
//! opener are ignored, as are blank and `#`-prefixed lines. The template
//! defines the exact category and channel order of the final output.

use std::path::Path;

use crate::errors::AppError;
use crate::models::{ChannelTemplate, TemplateCategory};

/// Literal marker that turns a line into a category opener.
pub const GENRE_MARKER: &str = "#genre#";

/// Read and parse the template file. A missing or unreadable file is fatal.
pub fn load_template(path: &Path) -> Result<ChannelTemplate, AppError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| AppError::template(path.display().to_string(), e))?;
    Ok(parse_template(&contents))
}

/// Parse template text. Malformed lines are skipped, never an error.
pub fn parse_template(text: &str) -> ChannelTemplate {
    let mut template = ChannelTemplate::default();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.contains(GENRE_MARKER) {
            let name = first_field(line);
            template.categories.push(TemplateCategory {
                name,
                channels: Vec::new(),
            });
        } else if let Some(category) = template.categories.last_mut() {
            category.channels.push(first_field(line));
        }
        // Channel lines before the first category opener are dropped.
    }

    template
}

fn first_field(line: &str) -> String {
    line.split(',').next().unwrap_or_default().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_categories_and_channels_in_order() {
        let text = "央视频道,#genre#\nCCTV1\nCCTV2,备注\n卫视频道,#genre#\n湖南卫视\n";
        let template = parse_template(text);

        assert_eq!(template.categories.len(), 2);
        assert_eq!(template.categories[0].name, "央视频道");
        assert_eq!(template.categories[0].channels, vec!["CCTV1", "CCTV2"]);
        assert_eq!(template.categories[1].name, "卫视频道");
        assert_eq!(template.categories[1].channels, vec!["湖南卫视"]);
        assert_eq!(template.channel_count(), 3);
    }

    #[test]
    fn ignores_lines_before_first_category() {
        let template = parse_template("CCTV1\nCCTV2\n央视频道,#genre#\nCCTV3\n");
        assert_eq!(template.categories.len(), 1);
        assert_eq!(template.categories[0].channels, vec!["CCTV3"]);
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let template = parse_template("# header comment\n\n央视频道,#genre#\n\nCCTV1\n# note\n");
        assert_eq!(template.categories[0].channels, vec!["CCTV1"]);
    }

    #[test]
    fn category_name_is_text_before_first_comma() {
        let template = parse_template("我的,分类,#genre#\n频道一\n");
        assert_eq!(template.categories[0].name, "我的");
    }

    #[test]
    fn empty_template_yields_no_categories() {
        assert!(parse_template("").is_empty());
    }
}
