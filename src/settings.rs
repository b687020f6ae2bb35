use crate::config::Rgb;
use crate::error::TreeError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Optional overrides read from `config.toml`
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub tree: TreeSettings,
    #[serde(default)]
    pub glyphs: GlyphSettings,
    #[serde(default)]
    pub colors: ColorSettings,
    #[serde(default)]
    pub animation: AnimationSettings,
}

#[derive(Debug, Default, Deserialize)]
pub struct TreeSettings {
    pub height: Option<usize>,
    pub segments: Option<usize>,
    pub indent: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GlyphSettings {
    pub star: Option<char>,
    pub body: Option<String>,    // Repeat a glyph to make it more common
    pub lights: Option<String>,
    pub stump: Option<char>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ColorSettings {
    pub star: Option<Rgb>,
    pub body: Option<Rgb>,
    pub stump: Option<Rgb>,
    pub unknown: Option<Rgb>,
    pub lights: Option<Vec<Rgb>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnimationSettings {
    pub fps: Option<f32>,
    pub background: Option<Rgb>,
    pub title: Option<String>,
}

impl Settings {
    /// Load from the default location. A broken file is reported and ignored.
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load an explicitly requested file; every failure is an error
    pub fn load_from(path: &Path) -> Result<Self, TreeError> {
        let content = fs::read_to_string(path).map_err(|source| TreeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded settings from {}", path.display());
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, TreeError> {
        Ok(toml::from_str(content)?)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("xmastree")
            .join("config.toml")
    }
}
