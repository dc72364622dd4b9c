//! Configuration file handling for posr.
//!
//! The configuration file is stored at `$POSR_HOME/config.json` and contains settings such as
//! the maximum message length and the location of the report history.

use crate::delivery::DEFAULT_MESSAGE_LIMIT;
use crate::history::{History, REPORTS_JSON};
use crate::{utils, Result};
use anyhow::{bail, ensure, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "posr";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$POSR_HOME` and from there it loads `$POSR_HOME/config.json`. It provides paths to
/// other items that are either configurable or are expected in a certain location within the home
/// directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory and an initial `config.json` file with default settings.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the home directory, e.g. `$HOME/posr`
    /// - `message_limit` - The maximum message length in bytes, `DEFAULT_MESSAGE_LIMIT` if `None`.
    ///
    /// # Errors
    /// - Returns an error if the directory already holds a config file or if any file operation
    ///   fails.
    pub async fn create(dir: impl Into<PathBuf>, message_limit: Option<usize>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the posr home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        ensure!(
            !config_path.exists(),
            "A config file already exists at '{}'",
            config_path.display()
        );

        let config_file = ConfigFile {
            message_limit: message_limit.unwrap_or(DEFAULT_MESSAGE_LIMIT),
            ..ConfigFile::default()
        };
        config_file.validate()?;
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that the home directory exists and that the config file exists
    /// - load and validate the config file
    /// - return the loaded configuration object
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The posr home directory is missing, run 'posr init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Reports of this many bytes or more are replaced by a notice when delivered.
    pub fn message_limit(&self) -> usize {
        self.config_file.message_limit
    }

    /// Returns the stored `history_path` if it is absolute, otherwise resolves it against the home
    /// directory.
    pub fn history_path(&self) -> PathBuf {
        let p = self.config_file.history_path();
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }

    /// Creates a `History` for the configured history file.
    pub fn history(&self) -> History {
        History::new(self.history_path())
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "posr",
///   "config_version": 1,
///   "message_limit": 4000,
///   "history_path": "reports.json"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "posr"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Maximum length of a delivered message, in bytes
    #[serde(default = "default_message_limit")]
    message_limit: usize,

    /// Path to the report history (optional, relative to the home directory or absolute)
    /// Defaults to $POSR_HOME/reports.json if not specified
    #[serde(skip_serializing_if = "Option::is_none")]
    history_path: Option<PathBuf>,
}

fn default_message_limit() -> usize {
    DEFAULT_MESSAGE_LIMIT
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            message_limit: DEFAULT_MESSAGE_LIMIT,
            history_path: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or has invalid settings
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .with_context(|| format!("Failed to load config file at {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            self.app_name
        );
        ensure!(
            self.config_version == CONFIG_VERSION,
            "Unsupported config_version {}, expected {}",
            self.config_version,
            CONFIG_VERSION
        );
        ensure!(self.message_limit > 0, "message_limit must be greater than zero");
        Ok(())
    }

    /// Gets the history path.
    ///
    /// If the path is relative, it should be interpreted as relative to the home directory.
    /// If None, defaults to $POSR_HOME/reports.json
    fn history_path(&self) -> PathBuf {
        self.history_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(REPORTS_JSON))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_and_load() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("posr");
        let created = Config::create(&home, None).await.unwrap();
        assert!(created.config_path().is_file());
        assert_eq!(created.message_limit(), DEFAULT_MESSAGE_LIMIT);

        let loaded = Config::load(&home).await.unwrap();
        assert_eq!(loaded.root(), created.root());
        assert_eq!(loaded.history_path(), loaded.root().join(REPORTS_JSON));
    }

    #[tokio::test]
    async fn test_create_twice_fails() {
        let dir = TempDir::new().unwrap();
        Config::create(dir.path(), Some(100)).await.unwrap();
        assert!(Config::create(dir.path(), None).await.is_err());
        assert_eq!(Config::load(dir.path()).await.unwrap().message_limit(), 100);
    }

    #[tokio::test]
    async fn test_create_rejects_zero_limit() {
        let dir = TempDir::new().unwrap();
        assert!(Config::create(dir.path(), Some(0)).await.is_err());
    }

    #[tokio::test]
    async fn test_load_missing_home() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(dir.path().join("nope")).await.is_err());
        assert!(Config::load(dir.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_load_custom_history_path() {
        let dir = TempDir::new().unwrap();
        let elsewhere = dir.path().join("elsewhere.json");
        let config_file = ConfigFile {
            history_path: Some(elsewhere.clone()),
            ..ConfigFile::default()
        };
        config_file
            .save(dir.path().join(CONFIG_JSON))
            .await
            .unwrap();
        let config = Config::load(dir.path()).await.unwrap();
        assert_eq!(config.history_path(), elsewhere);
        assert_eq!(config.history().path(), elsewhere.as_path());
    }

    #[tokio::test]
    async fn test_load_defaults_message_limit() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_JSON),
            r#"{"app_name":"posr","config_version":1,"history_path":"old/reports.json"}"#,
        )
        .unwrap();
        let config = Config::load(dir.path()).await.unwrap();
        assert_eq!(config.message_limit(), DEFAULT_MESSAGE_LIMIT);
        assert_eq!(
            config.history_path(),
            config.root().join("old").join("reports.json")
        );
    }

    #[tokio::test]
    async fn test_load_wrong_app_name() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_JSON),
            r#"{"app_name":"other-app","config_version":1}"#,
        )
        .unwrap();
        let e = Config::load(dir.path()).await.unwrap_err();
        assert!(format!("{e:#}").contains("Invalid app_name"));
    }
}
