//! A rendered deck: per-slide markup plus the shared CSS, fonts and notes.

pub mod markup;
pub mod renderer;

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use renderer::load_deck;

#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    #[error("deck has no slides")]
    Empty,

    #[error("invalid renderer output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("renderer failed: {0}")]
    Renderer(String),
}

/// What a renderer hands back for one deck source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderedDeck {
    pub html: Vec<String>,
    #[serde(default)]
    pub css: String,
    #[serde(default)]
    pub fonts: Vec<String>,
    #[serde(default)]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    pub html: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontRef {
    pub href: String,
}

/// A loaded deck. Never empty; notes line up with slides.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    pub id: String,
    pub slides: Vec<Slide>,
    pub css: String,
    pub fonts: Vec<FontRef>,
    pub notes: Vec<String>,
}

impl Deck {
    /// Build a deck from renderer output.
    ///
    /// When the renderer supplied no notes they are taken from `source`
    /// comments. A notes list of the wrong length is padded or cut to fit.
    pub fn from_rendered(
        id: impl Into<String>,
        rendered: RenderedDeck,
        source: Option<&str>,
    ) -> Result<Self, DeckError> {
        let RenderedDeck {
            html,
            css,
            fonts,
            notes,
        } = rendered;
        if html.is_empty() {
            return Err(DeckError::Empty);
        }

        let mut notes = if notes.is_empty() {
            source.map(crate::notes::extract_notes).unwrap_or_default()
        } else {
            notes
        };
        let id = id.into();
        if !notes.is_empty() && notes.len() != html.len() {
            log::warn!(
                "deck '{}': {} notes for {} slides",
                id,
                notes.len(),
                html.len()
            );
        }
        notes.resize(html.len(), String::new());

        Ok(Self {
            id,
            slides: html.into_iter().map(|html| Slide { html }).collect(),
            css,
            fonts: fonts.into_iter().map(|href| FontRef { href }).collect(),
            notes,
        })
    }

    pub fn slide_count(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.slides.len()).unwrap_or(NonZeroUsize::MIN)
    }

    pub fn notes_for(&self, index: usize) -> &str {
        self.notes.get(index).map(String::as_str).unwrap_or_default()
    }
}

impl From<Deck> for RenderedDeck {
    fn from(deck: Deck) -> Self {
        Self {
            html: deck.slides.into_iter().map(|s| s.html).collect(),
            css: deck.css,
            fonts: deck.fonts.into_iter().map(|f| f.href).collect(),
            notes: deck.notes,
        }
    }
}

/// Deck id for a source file: lowercase stem, runs of other characters
/// collapsed to `-`.
pub fn deck_id(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let mut id = String::with_capacity(stem.len());
    for c in stem.chars() {
        if c.is_alphanumeric() {
            id.push(c);
        } else if !id.is_empty() && !id.ends_with('-') {
            id.push('-');
        }
    }
    let id = id.trim_end_matches('-');
    if id.is_empty() {
        "deck".to_string()
    } else {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(slides: usize) -> RenderedDeck {
        RenderedDeck {
            html: (1..=slides).map(|n| format!("<h1>Slide {n}</h1>")).collect(),
            ..RenderedDeck::default()
        }
    }

    #[test]
    fn test_empty_deck_rejected() {
        let err = Deck::from_rendered("talk", RenderedDeck::default(), None).unwrap_err();
        assert!(matches!(err, DeckError::Empty));
    }

    #[test]
    fn test_notes_from_source_when_renderer_has_none() {
        let source = "# A\n<!-- hello -->\n---\n# B\n---\n# C\n---\n# D\n<!-- bye -->";
        let deck = Deck::from_rendered("talk", rendered(4), Some(source)).unwrap();
        assert_eq!(deck.notes.len(), 4);
        assert_eq!(deck.notes_for(0), "hello");
        assert_eq!(deck.notes_for(1), "");
        assert_eq!(deck.notes_for(3), "bye");
    }

    #[test]
    fn test_renderer_notes_win() {
        let deck = Deck::from_rendered(
            "talk",
            RenderedDeck {
                notes: vec!["from renderer".to_string(), String::new()],
                ..rendered(2)
            },
            Some("<!-- from source -->"),
        )
        .unwrap();
        assert_eq!(deck.notes_for(0), "from renderer");
    }

    #[test]
    fn test_notes_padded_and_truncated() {
        let short = Deck::from_rendered("a", rendered(3), Some("<!-- one -->")).unwrap();
        assert_eq!(short.notes, vec!["one", "", ""]);

        let long = Deck::from_rendered(
            "b",
            RenderedDeck {
                notes: vec!["1".into(), "2".into(), "3".into()],
                ..rendered(2)
            },
            None,
        )
        .unwrap();
        assert_eq!(long.notes, vec!["1", "2"]);
    }

    #[test]
    fn test_no_notes_at_all() {
        let deck = Deck::from_rendered("a", rendered(2), None).unwrap();
        assert_eq!(deck.notes, vec!["", ""]);
        assert_eq!(deck.notes_for(9), "");
    }

    #[test]
    fn test_renderer_contract_defaults() {
        let parsed: RenderedDeck = serde_json::from_str(r#"{"html":["<p>x</p>"]}"#).unwrap();
        assert_eq!(parsed.html.len(), 1);
        assert!(parsed.css.is_empty());
        assert!(parsed.fonts.is_empty());
        assert!(parsed.notes.is_empty());
    }

    #[test]
    fn test_fonts_and_css_carried() {
        let deck = Deck::from_rendered(
            "a",
            RenderedDeck {
                css: "h1 { color: red }".into(),
                fonts: vec!["fonts/inter.woff2".into()],
                ..rendered(1)
            },
            None,
        )
        .unwrap();
        assert_eq!(deck.css, "h1 { color: red }");
        assert_eq!(deck.fonts[0].href, "fonts/inter.woff2");
        assert_eq!(deck.slide_count().get(), 1);
    }

    #[test]
    fn test_back_to_renderer_json_keeps_source_notes() {
        let deck = Deck::from_rendered("a", rendered(2), Some("<!-- a -->\n---\n<!-- b -->")).unwrap();
        let json = serde_json::to_string(&RenderedDeck::from(deck)).unwrap();
        let again: RenderedDeck = serde_json::from_str(&json).unwrap();
        assert_eq!(again.notes, vec!["a", "b"]);
        assert_eq!(again.html.len(), 2);
    }

    #[test]
    fn test_deck_id_from_stem() {
        assert_eq!(deck_id(Path::new("talks/Rust Intro (v2).md")), "rust-intro-v2");
        assert_eq!(deck_id(Path::new("deck.json")), "deck");
        assert_eq!(deck_id(Path::new("___.md")), "deck");
        assert_eq!(deck_id(Path::new("Q3_review.md")), "q3-review");
    }
}
