pub mod theme;

use std::path::{Path, PathBuf};

use enum_map::EnumMap;
use iced_core::Color;
use serde::Deserialize;

use crate::chart::{Series, default_series_colors};
use crate::selection::{Company, Month, Selection};
use crate::util::ok_or_default;
use theme::{Theme, hex_to_color};

pub const APP_DIR: &str = "stockline";
pub const CONFIG_FILE: &str = "stockline.json";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no data directory on this platform")]
    NoDataDir,
}

/// User settings. Each field falls back to its default on its own when the
/// stored value can't be decoded.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(deserialize_with = "ok_or_default")]
    pub theme: Theme,
    #[serde(deserialize_with = "ok_or_default")]
    pub default_company: Company,
    #[serde(deserialize_with = "ok_or_default")]
    pub default_month: Month,
    #[serde(deserialize_with = "ok_or_default")]
    pub data_path: Option<PathBuf>,
    #[serde(deserialize_with = "ok_or_default")]
    pub open_color: Option<String>,
    #[serde(deserialize_with = "ok_or_default")]
    pub close_color: Option<String>,
}

impl Config {
    pub fn path() -> Result<PathBuf, ConfigError> {
        dirs_next::data_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or(ConfigError::NoDataDir)
    }

    /// Reads the config from the platform data directory. A missing file is
    /// not an error.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::read_from(&path)
    }

    pub fn read_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Selection shown before the user interacts.
    pub fn selection(&self) -> Selection {
        Selection::new(self.default_company, self.default_month)
    }

    /// Series colors with any valid overrides applied.
    pub fn series_colors(&self) -> EnumMap<Series, Color> {
        let mut colors = default_series_colors();

        for (series, hex) in [
            (Series::Open, &self.open_color),
            (Series::Close, &self.close_color),
        ] {
            let Some(hex) = hex else { continue };
            match hex_to_color(hex) {
                Some(color) => colors[series] = color,
                None => log::warn!("Ignoring invalid {series} color {hex:?}"),
            }
        }

        colors
    }
}
