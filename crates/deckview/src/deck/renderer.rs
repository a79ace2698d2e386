use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use super::{Deck, DeckError, RenderedDeck, deck_id};
use crate::notes;

/// Turns deck source into per-slide markup.
pub trait Renderer {
    fn render(&self, source: &str) -> Result<RenderedDeck, DeckError>;

    /// Whether notes should be recovered from source comments when the
    /// output carries none.
    fn reads_source_notes(&self) -> bool {
        true
    }
}

/// External renderer program. The source is written to its stdin and a
/// `RenderedDeck` JSON document is expected on stdout.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
}

impl CommandRenderer {
    /// Parse a whitespace separated command line such as `mdrender --json`.
    pub fn parse(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(String::from);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl Renderer for CommandRenderer {
    fn render(&self, source: &str) -> Result<RenderedDeck, DeckError> {
        log::debug!("running renderer: {} {}", self.program, self.args.join(" "));
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| DeckError::Renderer(format!("cannot start '{}': {e}", self.program)))?;

        // stdin is fed from its own thread; the child may fill stdout first.
        let stdin = child.stdin.take();
        let input = source.to_string();
        let writer = std::thread::spawn(move || {
            if let Some(mut stdin) = stdin {
                stdin.write_all(input.as_bytes())
            } else {
                Ok(())
            }
        });

        let output = child
            .wait_with_output()
            .map_err(|e| DeckError::Renderer(format!("'{}' did not finish: {e}", self.program)))?;
        match writer.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::warn!("renderer closed stdin early: {e}"),
            Err(_) => log::warn!("renderer input thread panicked"),
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DeckError::Renderer(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

/// Input that already is renderer output.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrerenderedRenderer;

impl Renderer for PrerenderedRenderer {
    fn render(&self, source: &str) -> Result<RenderedDeck, DeckError> {
        Ok(serde_json::from_str(source)?)
    }

    fn reads_source_notes(&self) -> bool {
        false
    }
}

/// Fallback when no renderer is configured: every section is shown verbatim
/// in a `<pre>` block, comments removed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceRenderer;

impl Renderer for SourceRenderer {
    fn render(&self, source: &str) -> Result<RenderedDeck, DeckError> {
        if source.trim().is_empty() {
            return Ok(RenderedDeck::default());
        }
        let html = notes::split_sections(source)
            .iter()
            .map(|section| {
                let text = notes::strip_comments(section);
                format!("<pre>{}</pre>", escape_html(text.trim()))
            })
            .collect();
        Ok(RenderedDeck {
            html,
            ..RenderedDeck::default()
        })
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Pick a renderer for `path`: `.json` files are taken as-is, anything else
/// goes through the configured command or the source fallback.
pub fn renderer_for(path: &Path, command: Option<&str>) -> Box<dyn Renderer> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        return Box::new(PrerenderedRenderer);
    }
    match command.and_then(CommandRenderer::parse) {
        Some(renderer) => Box::new(renderer),
        None => Box::new(SourceRenderer),
    }
}

/// Read, render and assemble the deck at `path`.
pub fn load_deck(path: &Path, command: Option<&str>) -> Result<Deck, DeckError> {
    let source = std::fs::read_to_string(path).map_err(|source| DeckError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let renderer = renderer_for(path, command);
    let rendered = renderer.render(&source)?;
    let notes_source = renderer.reads_source_notes().then_some(source.as_str());
    let deck = Deck::from_rendered(deck_id(path), rendered, notes_source)?;
    log::info!(
        "loaded deck '{}' ({} slides) from {}",
        deck.id,
        deck.slides.len(),
        path.display()
    );
    Ok(deck)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_renderer_one_block_per_section() {
        let rendered = SourceRenderer
            .render("# One\n<!-- note -->\n---\n# Two & <b>bold</b>")
            .unwrap();
        assert_eq!(
            rendered.html,
            vec![
                "<pre># One</pre>".to_string(),
                "<pre># Two &amp; &lt;b&gt;bold&lt;/b&gt;</pre>".to_string()
            ]
        );
    }

    #[test]
    fn test_source_renderer_blank_source_is_empty() {
        assert!(SourceRenderer.render(" \n\n").unwrap().html.is_empty());
    }

    #[test]
    fn test_prerendered_parses_contract() {
        let rendered = PrerenderedRenderer
            .render(r#"{"html":["<h1>A</h1>","<h1>B</h1>"],"notes":["a",""]}"#)
            .unwrap();
        assert_eq!(rendered.html.len(), 2);
        assert_eq!(rendered.notes, vec!["a", ""]);
    }

    #[test]
    fn test_prerendered_rejects_garbage() {
        let err = PrerenderedRenderer.render("not json").unwrap_err();
        assert!(matches!(err, DeckError::Json(_)));
    }

    #[test]
    fn test_command_parse() {
        let renderer = CommandRenderer::parse("  mdrender --json --fast ").unwrap();
        assert_eq!(renderer.program, "mdrender");
        assert_eq!(renderer.args, vec!["--json", "--fast"]);
        assert!(CommandRenderer::parse("   ").is_none());
    }

    #[test]
    fn test_missing_program_is_renderer_error() {
        let renderer = CommandRenderer::parse("deckview-no-such-renderer-binary").unwrap();
        let err = renderer.render("# A").unwrap_err();
        assert!(matches!(err, DeckError::Renderer(_)));
    }

    #[test]
    fn test_renderer_selection() {
        assert!(!renderer_for(Path::new("deck.JSON"), Some("x")).reads_source_notes());
        assert!(renderer_for(Path::new("deck.md"), None).reads_source_notes());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_deck(Path::new("/definitely/not/here.md"), None).unwrap_err();
        assert!(matches!(err, DeckError::Io { .. }));
    }

    #[test]
    fn test_load_sample_deck() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../sample-decks/intro.md");
        let deck = load_deck(&path, None).unwrap();
        assert_eq!(deck.id, "intro");
        assert_eq!(deck.slides.len(), 4);
        assert_eq!(deck.notes.len(), 4);
        assert!(!deck.notes_for(0).is_empty());
        assert_eq!(deck.notes_for(1), "");
    }
}
