//! Application configuration with TOML file support.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Window creation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title.
    pub title: String,
    /// Requested client width in pixels.
    pub width: u32,
    /// Requested client height in pixels.
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Pong".to_owned(),
            width: 640,
            height: 480,
        }
    }
}

impl WindowConfig {
    /// The requested client size as a pair.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Window settings.
    pub window: WindowConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file silently yields the defaults; a malformed file is
    /// logged and also yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => match toml::from_str(&text) {
                Ok(config) => config,
                Err(err) => {
                    log::warn!("ignoring malformed config {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}
