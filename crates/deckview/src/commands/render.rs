use anyhow::{Context, Result};
use std::path::Path;

use crate::config::Config;
use crate::deck::{RenderedDeck, load_deck};

/// Print the deck as renderer JSON, notes filled in. The output can be
/// opened again directly.
pub fn run(file: &Path) -> Result<()> {
    let config = Config::load_or_default();
    let deck = load_deck(file, config.renderer_command())
        .with_context(|| format!("Failed to load {}", file.display()))?;
    let rendered = RenderedDeck::from(deck);
    println!("{}", serde_json::to_string_pretty(&rendered)?);
    Ok(())
}
