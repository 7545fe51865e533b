//! Configuration file handling.
//!
//! The configuration file is stored at `$BUDGET_BOOK_HOME/config.json`. It is small: beyond
//! identifying itself it only carries `recent_limit`, the size of the recent-transactions
//! window shown after an insert.

use crate::db::Db;
use crate::home::Home;
use crate::Result;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;

const APP_NAME: &str = "budget-book";
const CONFIG_VERSION: u8 = 1;
const DEFAULT_RECENT_LIMIT: u32 = 10;

/// The `Config` object represents the configuration of the app. It is constructed from a
/// [`Home`], loads `config.json` from there, and owns the database handle. Components that need
/// persistence receive the handle through this object; there is no global connection.
#[derive(Debug, Clone)]
pub struct Config {
    home: Home,
    config_file: ConfigFile,
    db: Db,
}

impl Config {
    /// Creates a fresh data directory: writes an initial `config.json` with default settings
    /// and initializes a new, empty database.
    ///
    /// # Errors
    /// - Returns an error if the directory has already been initialized, or if any file
    ///   operation fails.
    pub async fn create(home: &Home) -> Result<Self> {
        if home.config().is_file() {
            bail!(
                "There is already a config file at '{}'",
                home.config().display()
            );
        }

        let config_file = ConfigFile::default();
        config_file.save(home.config()).await?;

        let db = Db::init(home.db()).await?;

        Ok(Self {
            home: home.clone(),
            config_file,
            db,
        })
    }

    /// Loads an initialized data directory: reads and validates `config.json`, then opens the
    /// database (migrating it forward if needed).
    pub async fn load(home: &Home) -> Result<Self> {
        if !home.config().is_file() {
            bail!(
                "The config file is missing at '{}', run `budget init` first",
                home.config().display()
            );
        }
        let config_file = ConfigFile::load(home.config()).await?;
        let db = Db::load(home.db()).await?;

        Ok(Self {
            home: home.clone(),
            config_file,
            db,
        })
    }

    pub fn home(&self) -> &Home {
        &self.home
    }

    pub(crate) fn db(&self) -> &Db {
        &self.db
    }

    /// How many transactions the recent-transactions window holds.
    pub fn recent_limit(&self) -> u32 {
        self.config_file.recent_limit
    }

    /// Releases the database handle. Called on every exit path.
    pub async fn close(&self) {
        self.db.close().await;
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "budget-book",
///   "config_version": 1,
///   "recent_limit": 10
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "budget-book"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Number of transactions shown in the recent window
    recent_limit: u32,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it does not identify
    /// itself as a budget-book config.
    async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;
        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        tokio::fs::write(path, data)
            .await
            .with_context(|| format!("Unable to write config file at {}", path.display()))
    }
}
