use super::app_config::{APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, AppConfig};
use directories::ProjectDirs;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Failures while locating or writing `config.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform reports no per-user config location.
    #[error("no config directory available on this platform")]
    NoConfigDir,
    /// Reading or writing the file failed.
    #[error("config file i/o: {0}")]
    Io(#[from] std::io::Error),
    /// Defaults could not be encoded as TOML.
    #[error("could not encode default config: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Location of `config.toml`. A broken file never stops startup.
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// Uses the per-user config directory, e.g. `~/.config/spice-drawers`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConfigDir` if the platform has none.
    pub fn new() -> Result<Self, ConfigError> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| Self::at(dirs.config_dir().to_path_buf()))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Uses `dir` instead of the platform location.
    #[must_use]
    pub const fn at(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Reads the config. `path_override` replaces the default file location
    /// and leaves the config directory alone.
    ///
    /// A missing file is created with defaults. A file that does not parse
    /// is left as it is and defaults are used for this run.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or the defaults
    /// cannot be written.
    pub fn load(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let path = match path_override {
            Some(path) => path.to_path_buf(),
            None => self.default_path()?,
        };

        if !path.exists() {
            return Self::write_defaults(&path);
        }

        let content = fs::read_to_string(&path)?;
        toml::from_str::<AppConfig>(&content).or_else(|e| {
            warn!(path = %path.display(), error = %e, "Config does not parse, running with defaults");
            Ok(AppConfig::default())
        })
    }

    fn default_path(&self) -> Result<PathBuf, ConfigError> {
        if !self.dir.exists() {
            debug!(dir = %self.dir.display(), "Creating config directory");
            fs::create_dir_all(&self.dir)?;
        }
        Ok(self.dir.join(CONFIG_FILE_NAME))
    }

    fn write_defaults(path: &Path) -> Result<AppConfig, ConfigError> {
        info!(path = %path.display(), "Writing default config");
        let config = AppConfig::default();
        let content = toml::to_string_pretty(&config)?;

        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        // Staged beside the target, then renamed over it.
        let mut staged = tempfile::NamedTempFile::new_in(dir)?;
        staged.write_all(content.as_bytes())?;
        staged.persist(path).map_err(|e| e.error)?;

        Ok(config)
    }
}
