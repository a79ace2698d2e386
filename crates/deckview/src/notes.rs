//! Speaker notes pulled from HTML comments in the deck source.
//!
//! Notes are the raw text of `<!-- ... -->` blocks. Comments that look like
//! renderer directives (`layout: two-column`, `class:intro`) are skipped.

use std::sync::LazyLock;

use regex::Regex;

/// Line that separates two slides in the source.
pub const SLIDE_BREAK: &str = "\n---\n";

static FRONTMATTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A---.*?---").expect("frontmatter pattern"));

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--(.*?)-->").expect("comment pattern"));

static DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A\s*\w+\s*:").expect("directive pattern"));

/// Split deck source into per-slide sections.
///
/// Line endings are normalized and a leading `---` metadata block is dropped
/// first. Always yields at least one section.
pub fn split_sections(source: &str) -> Vec<String> {
    let source = source.replace("\r\n", "\n");
    let body = FRONTMATTER.replace(&source, "");
    body.split(SLIDE_BREAK).map(String::from).collect()
}

/// Notes for every section of `source`, one entry per slide.
///
/// Slides without notes get an empty string so indices line up with the
/// rendered slides.
pub fn extract_notes(source: &str) -> Vec<String> {
    split_sections(source)
        .iter()
        .map(|section| section_notes(section))
        .collect()
}

/// Joined note text of one section.
pub fn section_notes(section: &str) -> String {
    COMMENT
        .captures_iter(section)
        .filter_map(|caps| {
            let content = caps.get(1)?.as_str().trim();
            if content.is_empty() || DIRECTIVE.is_match(content) {
                None
            } else {
                Some(content)
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// `section` with every comment block removed.
pub fn strip_comments(section: &str) -> String {
    COMMENT.replace_all(section, "").into_owned()
}
