use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::config::Config;
use crate::deck::load_deck;
use crate::deck::markup::slide_text;

/// Print the speaker notes of every slide.
pub fn run(file: &Path, json: bool) -> Result<()> {
    let config = Config::load_or_default();
    let deck = load_deck(file, config.renderer_command())
        .with_context(|| format!("Failed to load {}", file.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&deck.notes)?);
        return Ok(());
    }

    let total = deck.slides.len();
    for (index, slide) in deck.slides.iter().enumerate() {
        let text = slide_text(&slide.html);
        let heading = match text.label() {
            "" => format!("Slide {} / {total}", index + 1),
            label => format!("Slide {} / {total}: {label}", index + 1),
        };
        println!("{}", heading.cyan().bold());
        let note = deck.notes_for(index);
        if note.is_empty() {
            println!("{}", "(no notes)".dimmed());
        } else {
            println!("{note}");
        }
        println!();
    }
    Ok(())
}
