use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// The single user this installation writes entries for.
pub const DEFAULT_USER_ID: i64 = 1;
pub const DEFAULT_API_URL: &str = "http://54.180.131.3:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const APP_DIR: &str = "diary";

/// Where a setting's current value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl ConfigSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigSource::Default => "default",
            ConfigSource::File => "file",
            ConfigSource::Environment => "environment",
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A setting together with the layer that supplied it
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    fn default_value(value: T) -> Self {
        Self {
            value,
            source: ConfigSource::Default,
        }
    }

    fn set(&mut self, value: T, source: ConfigSource) {
        self.value = value;
        self.source = source;
    }
}

/// Diary service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Pull the server's entries into the local store before data commands
    pub sync_on_start: bool,
    /// Per-request limit; a slower server counts as unreachable
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            sync_on_start: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub database_path: ConfigValue<PathBuf>,
    pub user_id: ConfigValue<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    pub api: ApiConfig,
}

/// The YAML file layout; every key is optional
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileLayer {
    database_path: Option<PathBuf>,
    user_id: Option<i64>,
    api: Option<ApiConfig>,
}

impl FileLayer {
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Config {
    /// Defaults, then the YAML file (if present), then `DIARY_*` variables.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::defaults();

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            config.apply_file(&path, FileLayer::read(&path)?);
        }

        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    fn defaults() -> Self {
        Self {
            database_path: ConfigValue::default_value(Self::default_data_dir().join("diary.db")),
            user_id: ConfigValue::default_value(DEFAULT_USER_ID),
            config_file: None,
            api: ApiConfig::default(),
        }
    }

    fn apply_file(&mut self, path: &Path, layer: FileLayer) {
        self.config_file = Some(path.to_path_buf());

        if let Some(db_path) = layer.database_path {
            // Relative database paths live next to the config file
            let db_path = match path.parent() {
                Some(dir) if db_path.is_relative() => dir.join(db_path),
                _ => db_path,
            };
            self.database_path.set(db_path, ConfigSource::File);
        }
        if let Some(id) = layer.user_id {
            self.user_id.set(id, ConfigSource::File);
        }
        if let Some(api) = layer.api {
            self.api = api;
        }
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(db_path) = var("DIARY_DATABASE_PATH") {
            self.database_path
                .set(PathBuf::from(db_path), ConfigSource::Environment);
        }
        if let Some(id) = var("DIARY_USER_ID") {
            self.user_id
                .set(parse_var("DIARY_USER_ID", id)?, ConfigSource::Environment);
        }
        if let Some(url) = var("DIARY_API_URL") {
            self.api.base_url = url;
        }
        if let Some(secs) = var("DIARY_API_TIMEOUT_SECS") {
            self.api.timeout_secs = parse_var("DIARY_API_TIMEOUT_SECS", secs)?;
        }
        Ok(())
    }

    /// Platform config directory, e.g. `~/.config/diary/` on Linux
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Platform data directory, e.g. `~/.local/share/diary/` on Linux
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidValue { name, value })
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid value '{value}' for {name}")]
    InvalidValue { name: &'static str, value: String },
}
