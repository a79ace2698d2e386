//! Reduce slide markup to plain text the viewer can lay out.
//!
//! This is not an HTML engine: the first heading becomes the title, block
//! elements become line breaks, list items get a bullet and every other tag
//! is dropped.

use std::sync::LazyLock;

use regex::Regex;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideText {
    pub title: Option<String>,
    pub body: String,
}

impl SlideText {
    /// Short label for thumbnails: the title, else the first body line.
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .or_else(|| self.body.lines().find(|l| !l.trim().is_empty()))
            .unwrap_or("")
    }
}

static HIDDEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<!--.*?-->|<(style|script|head)\b[^>]*>.*?</(style|script|head)\s*>")
        .expect("hidden pattern")
});

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<h([1-6])\b[^>]*>(.*?)</h[1-6]\s*>").expect("heading pattern")
});

static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<li\b[^>]*>").expect("list item pattern"));

static BLOCK_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(p|div|li|ul|ol|pre|blockquote|section|h[1-6]|tr|table)\s*>")
        .expect("block pattern")
});

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));

static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank run pattern"));

pub fn slide_text(html: &str) -> SlideText {
    let html = HIDDEN.replace_all(html, "");

    let (title, html) = match HEADING.captures(&html) {
        Some(caps) => {
            let title = inline_text(caps.get(2).map_or("", |m| m.as_str()));
            let whole = caps.get(0).map_or(0..0, |m| m.range());
            let mut rest = String::with_capacity(html.len());
            rest.push_str(&html[..whole.start]);
            rest.push('\n');
            rest.push_str(&html[whole.end..]);
            ((!title.is_empty()).then_some(title), rest)
        }
        None => (None, html.to_string()),
    };

    let text = LIST_ITEM.replace_all(&html, "\u{2022} ");
    let text = BLOCK_BREAK.replace_all(&text, "\n");
    let text = TAG.replace_all(&text, "");
    let text = decode_entities(&text);

    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let body = BLANK_RUN
        .replace_all(&lines.join("\n"), "\n\n")
        .trim_matches('\n')
        .to_string();

    SlideText { title, body }
}

/// Tag-free text of an inline fragment, whitespace collapsed.
fn inline_text(html: &str) -> String {
    let text = TAG.replace_all(html, "");
    decode_entities(&text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_becomes_title() {
        let text = slide_text("<section><h1>Hello <em>world</em></h1><p>Body text</p></section>");
        assert_eq!(text.title.as_deref(), Some("Hello world"));
        assert_eq!(text.body, "Body text");
    }

    #[test]
    fn test_list_items_bulleted() {
        let text = slide_text("<h2>List</h2><ul><li>One</li><li>Two</li></ul>");
        assert_eq!(text.body, "\u{2022} One\n\u{2022} Two");
    }

    #[test]
    fn test_pre_block_keeps_layout() {
        let text = slide_text("<pre># Title\n\n  indented &amp; escaped &lt;b&gt;</pre>");
        assert_eq!(text.title, None);
        assert_eq!(text.body, "# Title\n\n  indented & escaped <b>");
    }

    #[test]
    fn test_hidden_content_dropped() {
        let text = slide_text(
            "<style>h1 { color: red }</style><!-- note --><h1>T</h1><script>alert(1)</script><p>x</p>",
        );
        assert_eq!(text.title.as_deref(), Some("T"));
        assert_eq!(text.body, "x");
    }

    #[test]
    fn test_blank_runs_collapsed() {
        let text = slide_text("<p>a</p><p></p><p></p><p></p><p>b</p>");
        assert_eq!(text.body, "a\n\nb");
    }

    #[test]
    fn test_label_falls_back_to_body() {
        assert_eq!(slide_text("<h1>Intro</h1>").label(), "Intro");
        assert_eq!(slide_text("<p></p><p>first</p><p>second</p>").label(), "first");
        assert_eq!(slide_text("").label(), "");
    }

    #[test]
    fn test_empty_heading_is_no_title() {
        let text = slide_text("<h1> </h1><p>body</p>");
        assert_eq!(text.title, None);
        assert_eq!(text.body, "body");
    }
}
