use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load_or_default();
            config.set(&key, &value)?;
            let path = config.save()?;
            println!("{} {key} = {value}", "Set".green().bold());
            println!("{}", format!("Saved to {}", path.display()).dimmed());
            Ok(())
        }
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = match Config::load_from(&path) {
        Ok(config) => {
            println!("{}", format!("# {}", path.display()).dimmed());
            config
        }
        Err(_) => {
            println!("{}", "No config file yet; showing defaults.".yellow());
            Config::default()
        }
    };

    let settings = config.viewer_settings("");
    let rows = [
        ("defaults.theme", config.theme().unwrap_or("light").to_string()),
        (
            "defaults.start_mode",
            config.start_mode().unwrap_or("first").to_string(),
        ),
        (
            "viewer.wheel_debounce_ms",
            settings.wheel_debounce.as_millis().to_string(),
        ),
        (
            "viewer.edge_zone_percent",
            format!("{:.0}", settings.edge_zone * 100.0),
        ),
        (
            "viewer.home_url",
            config.home_url().unwrap_or("(close window)").to_string(),
        ),
        (
            "viewer.share_base_url",
            if settings.share_base.is_empty() {
                "(deck file URL)".to_string()
            } else {
                settings.share_base.clone()
            },
        ),
        (
            "renderer.command",
            config
                .renderer_command()
                .unwrap_or("(show source)")
                .to_string(),
        ),
    ];
    for (key, value) in rows {
        println!("{:<26} {}", key.cyan(), value);
    }
    Ok(())
}
