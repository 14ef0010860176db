use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::terminal::OpenConfiguration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Bring the terminal to the foreground when opening a location.
    #[serde(default = "default_true")]
    pub activate: bool,
    #[serde(default)]
    pub new_instance: bool,
    /// Used by `open` and `button` when no path is given.
    pub default_location: Option<PathBuf>,
    /// Let `POST /api/open` carry commands. Off by default: the endpoint
    /// would otherwise run arbitrary shell text.
    #[serde(default)]
    pub allow_remote_commands: bool,
    /// Extra folders scanned for `.app` bundles.
    #[serde(default)]
    pub extra_app_dirs: Vec<PathBuf>,
}

fn default_port() -> u16 {
    42069
}
fn default_bind() -> String {
    "127.0.0.1".into()
}
fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
            activate: true,
            new_instance: false,
            default_location: None,
            allow_remote_commands: false,
            extra_app_dirs: Vec::new(),
        }
    }
}

impl Config {
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("openterm")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = path.cloned().unwrap_or_else(Self::config_path);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config: {}", config_path.display()))?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save(&config_path)?;
            tracing::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    pub fn save(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir: {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    pub fn open_configuration(&self) -> OpenConfiguration {
        OpenConfiguration {
            activates: self.activate,
            new_instance: self.new_instance,
        }
    }

    /// Location to open when the caller gave none.
    pub fn resolve_location(&self, explicit: Option<PathBuf>) -> Result<PathBuf> {
        let location = match explicit.or_else(|| self.default_location.clone()) {
            Some(path) => path,
            None => std::env::current_dir().context("Failed to read current directory")?,
        };
        std::path::absolute(&location)
            .with_context(|| format!("Failed to resolve location: {}", location.display()))
    }
}
