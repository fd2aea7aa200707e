use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "CLIMA_API_KEY";

/// Top-level configuration stored on disk.
///
/// The credential never lives in source; it comes from this file or from
/// `CLIMA_API_KEY`, which takes precedence.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Tomorrow.io API key.
    pub api_key: Option<String>,

    /// Default location when `show` is called without one,
    /// e.g. "20.2767,-97.960".
    pub location: Option<String>,

    /// Display name shown above the reading, e.g. "Tierra Negra".
    pub name: Option<String>,
}

impl Config {
    /// Resolve the API key: environment first, then the stored value.
    pub fn api_key(&self) -> Result<String> {
        self.resolve_api_key(env::var(API_KEY_ENV).ok())
    }

    fn resolve_api_key(&self, env_override: Option<String>) -> Result<String> {
        if let Some(key) = env_override.filter(|k| !k.is_empty()) {
            return Ok(key);
        }

        self.api_key.clone().filter(|k| !k.is_empty()).ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `clima configure` or set the {API_KEY_ENV} environment variable."
            )
        })
    }

    pub fn set_api_key(&mut self, key: String) {
        self.api_key = Some(key);
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "clima", "clima-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
