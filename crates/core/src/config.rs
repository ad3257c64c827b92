use crate::{
    error::{CoreError, Result},
    model::{MatchMode, Theme},
    selection::MAX_DECK_SIZE,
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root folder holding the asset directories
    pub data_dir: PathBuf,

    /// Card JSON directory, relative to `data_dir` unless absolute
    pub cards_dir: PathBuf,

    /// Character JSON directory, relative to `data_dir` unless absolute
    pub characters_dir: PathBuf,

    /// Deck capacity
    pub deck_limit: usize,

    /// UI theme
    pub theme: Theme,

    /// Disable colors
    pub no_color: bool,

    /// Title matching used by the event search
    pub match_mode: MatchMode,

    /// Input poll interval in milliseconds
    pub tick_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            cards_dir: PathBuf::from("cartas"),
            characters_dir: PathBuf::from("cavalas"),
            deck_limit: MAX_DECK_SIZE,
            theme: Theme::Dark,
            no_color: false,
            match_mode: MatchMode::Prefix,
            tick_ms: 100,
        }
    }
}

impl Config {
    /// Load configuration from multiple sources in order of preference:
    /// 1. CLI arguments override everything
    /// 2. JSON config file if specified
    /// 3. Default config file locations
    /// 4. Built-in defaults
    pub fn load(cli_config: Option<&CliConfig>, json_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(default_config) = Self::load_default_config() {
            config = default_config;
        }

        if let Some(path) = json_path {
            config = Self::load_from_file(path)?;
        }

        if let Some(cli) = cli_config {
            config.apply_cli_overrides(cli);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific JSON file. Missing keys take defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CoreError::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let config: Self = serde_json::from_str(&contents).map_err(|e| {
            CoreError::config(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "config file loaded");
        Ok(config)
    }

    /// First readable config among the default locations
    fn load_default_config() -> Option<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping config file");
                        continue;
                    }
                }
            }
        }

        None
    }

    /// Get default configuration file search paths
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("cavala").join("config.json"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".cavala.json"));
        }

        paths.push(PathBuf::from("cavala.json"));

        paths
    }

    /// Apply CLI argument overrides
    pub fn apply_cli_overrides(&mut self, cli: &CliConfig) {
        if let Some(data_dir) = &cli.data_dir {
            self.data_dir = data_dir.clone();
        }
        if let Some(limit) = cli.deck_limit {
            self.deck_limit = limit;
        }
        if let Some(theme) = &cli.theme {
            self.theme = theme.clone();
        }
        if cli.no_color {
            self.no_color = true;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.deck_limit == 0 || self.deck_limit > MAX_DECK_SIZE {
            return Err(CoreError::config(format!(
                "Deck limit must be between 1 and {MAX_DECK_SIZE}"
            )));
        }

        if self.tick_ms < 10 {
            return Err(CoreError::config("Tick interval must be at least 10ms"));
        }

        if self.tick_ms > 1000 {
            return Err(CoreError::config("Tick interval must be at most 1 second"));
        }

        Ok(())
    }

    pub fn cards_path(&self) -> PathBuf {
        self.data_dir.join(&self.cards_dir)
    }

    pub fn characters_path(&self) -> PathBuf {
        self.data_dir.join(&self.characters_dir)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

/// CLI configuration (temporary struct for CLI parsing)
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub data_dir: Option<PathBuf>,
    pub deck_limit: Option<usize>,
    pub theme: Option<Theme>,
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_win() {
        let mut config = Config::default();
        config.apply_cli_overrides(&CliConfig {
            data_dir: Some(PathBuf::from("/assets")),
            deck_limit: Some(4),
            theme: Some(Theme::Light),
            no_color: true,
        });

        assert_eq!(config.deck_limit, 4);
        assert_eq!(config.theme, Theme::Light);
        assert!(config.no_color);
        assert_eq!(config.cards_path(), PathBuf::from("/assets/cartas"));
        assert_eq!(config.characters_path(), PathBuf::from("/assets/cavalas"));
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.deck_limit = 7;
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        config.deck_limit = 6;
        config.tick_ms = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"match_mode": "Contains"}"#).unwrap();
        assert_eq!(config.match_mode, MatchMode::Contains);
        assert_eq!(config.deck_limit, MAX_DECK_SIZE);
        assert_eq!(config.tick_ms, 100);
    }
}
