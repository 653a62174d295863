//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::args::CliArgs;
use crate::domain::entities::ApiKey;

pub(crate) const APP_NAME: &str = "spice-drawers";
pub(crate) const APP_QUALIFIER: &str = "com";
pub(crate) const APP_ORGANIZATION: &str = "spice-drwrs";

/// Firestore REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";
/// Collection holding the spices.
pub const DEFAULT_COLLECTION: &str = "spices";
/// Firestore database id used when none is configured.
pub const DEFAULT_DATABASE: &str = "(default)";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, from the config file and CLI.
#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Use the in-process store instead of Firestore.
    #[serde(skip)]
    pub memory: bool,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Remote store connection.
    #[serde(default)]
    pub store: StoreConfig,

    /// UI configuration.
    #[serde(default)]
    pub ui: UiConfig,

    /// Theme configuration.
    #[serde(default)]
    pub theme: ThemeConfig,
}

/// Static connection parameters of the document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Firebase project id.
    #[serde(default)]
    pub project_id: String,

    /// Web API key of the project.
    #[serde(default)]
    pub api_key: String,

    /// Firestore database id.
    #[serde(default = "default_database")]
    pub database: String,

    /// REST endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Collection name.
    #[serde(default = "default_collection")]
    pub collection: String,

    /// How often the live watcher re-reads the collection.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl StoreConfig {
    /// Returns the API key, if one is configured.
    #[must_use]
    pub fn api_key(&self) -> Option<ApiKey> {
        ApiKey::new(self.api_key.as_str())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            api_key: String::new(),
            database: default_database(),
            base_url: default_base_url(),
            collection: default_collection(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Show emoji after badge labels.
    #[serde(default = "default_true")]
    pub show_emoji: bool,

    /// How long save results stay in the status bar, in seconds.
    #[serde(default = "default_status_duration")]
    pub status_duration: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_emoji: true,
            status_duration: default_status_duration(),
        }
    }
}

/// Theme mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Dark mode (default).
    #[default]
    Dark,
    /// Light mode.
    Light,
}

/// Theme configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Accent color (name or hex code).
    #[serde(default = "default_accent_color")]
    pub accent_color: String,

    /// Theme mode (Dark, Light).
    #[serde(default)]
    pub mode: ThemeMode,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            accent_color: default_accent_color(),
            mode: ThemeMode::default(),
        }
    }
}

fn default_accent_color() -> String {
    "#6200ee".to_string()
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

const fn default_poll_interval_ms() -> u64 {
    2000
}

const fn default_status_duration() -> u64 {
    4
}

const fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(config_path) = args.config {
            self.config = Some(config_path);
        }
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(project_id) = args.project_id {
            self.store.project_id = project_id;
        }
        if let Some(api_key) = args.api_key {
            self.store.api_key = api_key;
        }
        if let Some(collection) = args.collection {
            self.store.collection = collection;
        }
        if let Some(poll_interval_ms) = args.poll_interval_ms {
            self.store.poll_interval_ms = poll_interval_ms;
        }
        if let Some(accent_color) = args.accent_color {
            self.theme.accent_color = accent_color;
        }
        if let Some(show_emoji) = args.show_emoji {
            self.ui.show_emoji = show_emoji;
        }
        self.memory = args.memory;
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("spice-drawers.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            memory: false,
            log_level: LogLevel::Info,
            store: StoreConfig::default(),
            ui: UiConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_config_file() {
        let toml_content = r#"
            log_level = "debug"

            [store]
            project_id = "spice-drwrs"
            api_key = "AIzaSyExample"
            poll_interval_ms = 500

            [ui]
            show_emoji = false

            [theme]
            accent_color = "Magenta"
            mode = "light"
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.store.project_id, "spice-drwrs");
        assert_eq!(config.store.collection, "spices");
        assert_eq!(config.store.database, "(default)");
        assert_eq!(config.store.poll_interval_ms, 500);
        assert!(!config.ui.show_emoji);
        assert_eq!(config.theme.mode, ThemeMode::Light);
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.store.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.store.collection, DEFAULT_COLLECTION);
        assert!(config.store.api_key().is_none());
        assert!(config.ui.show_emoji);
        assert!(!config.memory);
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut config: AppConfig = toml::from_str(
            r#"
            [store]
            project_id = "from-file"
            collection = "jars"
            "#,
        )
        .unwrap();

        let args = CliArgs::parse_from([
            "spice-drawers",
            "--project-id",
            "from-cli",
            "--log-level",
            "warn",
            "--memory",
        ]);
        config.merge_with_args(args);

        assert_eq!(config.store.project_id, "from-cli");
        assert_eq!(config.store.collection, "jars");
        assert_eq!(config.log_level, LogLevel::Warn);
        assert!(config.memory);
    }
}
