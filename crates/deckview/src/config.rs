use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::nav::{DEFAULT_EDGE_ZONE, DEFAULT_WHEEL_DEBOUNCE, ViewerSettings};

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "deckview";

/// Edge bands wider than half the slide would swallow the centre.
const EDGE_ZONE_PERCENT: std::ops::RangeInclusive<u8> = 1..=49;

const VALID_KEYS: &str = "defaults.theme, defaults.start_mode, viewer.wheel_debounce_ms, \
    viewer.edge_zone_percent, viewer.home_url, viewer.share_base_url, renderer.command";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewer: Option<ViewerConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renderer: Option<RendererConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_mode: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wheel_debounce_ms: Option<u64>,

    /// Width of the clickable edge bands in percent of the slide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_zone_percent: Option<u8>,

    /// Where "go home" leads. Without it the audience window just closes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_url: Option<String>,

    /// Public URL of the deck, used for copied slide links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RendererConfig {
    /// External program turning deck source into renderer JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `deckview config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# deckview configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'."),
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .theme = Some(value.to_string());
            }
            "defaults.start_mode" => {
                let is_slide = value.parse::<usize>().is_ok_and(|n| n >= 1);
                if value != "first" && value != "overview" && !is_slide {
                    anyhow::bail!(
                        "Invalid start_mode: {value}. Must be 'first', 'overview', or a slide number."
                    );
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .start_mode = Some(value.to_string());
            }
            "viewer.wheel_debounce_ms" => {
                let ms: u64 = value.parse().map_err(|_| {
                    anyhow::anyhow!("Invalid wheel_debounce_ms: {value}. Must be a whole number of milliseconds.")
                })?;
                self.viewer_mut().wheel_debounce_ms = Some(ms);
            }
            "viewer.edge_zone_percent" => {
                let percent = value
                    .parse::<u8>()
                    .ok()
                    .filter(|p| EDGE_ZONE_PERCENT.contains(p))
                    .ok_or_else(|| {
                        anyhow::anyhow!("Invalid edge_zone_percent: {value}. Must be between 1 and 49.")
                    })?;
                self.viewer_mut().edge_zone_percent = Some(percent);
            }
            "viewer.home_url" => {
                self.viewer_mut().home_url = non_empty(value);
            }
            "viewer.share_base_url" => {
                self.viewer_mut().share_base_url = non_empty(value);
            }
            "renderer.command" => {
                self.renderer
                    .get_or_insert_with(RendererConfig::default)
                    .command = non_empty(value);
            }
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {VALID_KEYS}"),
        }
        Ok(())
    }

    fn viewer_mut(&mut self) -> &mut ViewerConfig {
        self.viewer.get_or_insert_with(ViewerConfig::default)
    }

    pub fn theme(&self) -> Option<&str> {
        self.defaults.as_ref()?.theme.as_deref()
    }

    pub fn start_mode(&self) -> Option<&str> {
        self.defaults.as_ref()?.start_mode.as_deref()
    }

    pub fn home_url(&self) -> Option<&str> {
        self.viewer.as_ref()?.home_url.as_deref()
    }

    pub fn renderer_command(&self) -> Option<&str> {
        self.renderer.as_ref()?.command.as_deref()
    }

    /// Navigation tuning with defaults filled in. `fallback_share_base` is
    /// used when no share URL is configured.
    pub fn viewer_settings(&self, fallback_share_base: &str) -> ViewerSettings {
        let viewer = self.viewer.clone().unwrap_or_default();
        ViewerSettings {
            wheel_debounce: viewer
                .wheel_debounce_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_WHEEL_DEBOUNCE),
            edge_zone: match viewer.edge_zone_percent {
                Some(p) if EDGE_ZONE_PERCENT.contains(&p) => f32::from(p) / 100.0,
                Some(p) => {
                    log::warn!(
                        "Ignoring viewer.edge_zone_percent = {p}: must be between 1 and 49"
                    );
                    DEFAULT_EDGE_ZONE
                }
                None => DEFAULT_EDGE_ZONE,
            },
            share_base: viewer
                .share_base_url
                .unwrap_or_else(|| fallback_share_base.to_string()),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
