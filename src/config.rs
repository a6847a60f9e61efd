use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::games::geometry::Field;
use crate::games::sky_defender::SkyVariant;

const CONFIG_FILE: &str = "reflexcade.toml";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tick_rate_ms: u64,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
    pub playfield: PlayfieldConfig,
    pub sky_defender: SkyDefenderConfig,
    pub log: LogConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayfieldConfig {
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SkyDefenderConfig {
    pub variant: SkyVariant,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub file: PathBuf,
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: 16, // ~60 FPS
            seed: None,
            playfield: PlayfieldConfig::default(),
            sky_defender: SkyDefenderConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self { width: 600.0, height: 400.0 }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { file: PathBuf::from("reflexcade.log"), level: "info".to_string() }
    }
}

impl PlayfieldConfig {
    pub fn field(&self) -> Field {
        Field::new(self.width, self.height)
    }
}

impl Config {
    /// Reads `path`, or `reflexcade.toml` next to the executable. A missing
    /// default file yields the defaults; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_path(), false),
        };
        if !explicit && !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn default_path() -> PathBuf {
        // Store next to the executable
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                return dir.join(CONFIG_FILE);
            }
        }
        PathBuf::from(CONFIG_FILE)
    }
}
