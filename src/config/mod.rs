use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    errors::{Result, SpenderError},
    utils::{
        ensure_dir,
        persistence::{backup_file_name, list_backup_names, load_json, prune_backups, save_json},
        PathResolver,
    },
};

const DEFAULT_OVERALL_BUDGET: f64 = 2000.0;
const DEFAULT_BACKUP_RETENTION: usize = 5;

/// User preferences persisted alongside ledgers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Overall budget created for the current month when none exists.
    #[serde(default = "Config::default_overall_budget")]
    pub default_overall_budget: f64,
    /// Force expense categories negative and income categories positive.
    #[serde(default = "Config::default_enforce_category_sign")]
    pub enforce_category_sign: bool,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_opened_ledger: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            default_overall_budget: Self::default_overall_budget(),
            enforce_category_sign: Self::default_enforce_category_sign(),
            backup_retention: Self::default_backup_retention(),
            last_opened_ledger: None,
        }
    }
}

impl Config {
    fn default_overall_budget() -> f64 {
        DEFAULT_OVERALL_BUDGET
    }

    fn default_enforce_category_sign() -> bool {
        true
    }

    fn default_backup_retention() -> usize {
        DEFAULT_BACKUP_RETENTION
    }
}

/// Loads, saves, and snapshots [`Config`] under the application directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
    backups_dir: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        let backups_dir = PathResolver::config_backup_dir_in(&base);
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            backups_dir,
        })
    }

    /// Returns the stored config, or defaults when nothing has been saved yet.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no config file; using defaults");
            return Ok(Config::default());
        }
        load_json(&self.path).map_err(config_error)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        save_json(config, &self.path)
    }

    /// Snapshots `config`, then prunes to its `backup_retention`.
    pub fn backup(&self, config: &Config, note: Option<&str>) -> Result<String> {
        ensure_dir(&self.backups_dir)?;
        let name = backup_file_name("config", Utc::now(), note);
        save_json(config, &self.backups_dir.join(&name))?;
        let removed = prune_backups(&self.backups_dir, config.backup_retention)?;
        debug!(backup = %name, removed, "configuration backed up");
        Ok(name)
    }

    pub fn restore(&self, backup_name: &str) -> Result<Config> {
        let path = self.backups_dir.join(backup_name);
        if !path.exists() {
            return Err(SpenderError::ConfigError(format!(
                "configuration backup `{}` not found",
                backup_name
            )));
        }
        let config: Config = load_json(&path).map_err(config_error)?;
        self.save(&config)?;
        Ok(config)
    }

    /// Backup names, newest first.
    pub fn list_backups(&self) -> Result<Vec<String>> {
        list_backup_names(&self.backups_dir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn config_error(err: SpenderError) -> SpenderError {
    match err {
        SpenderError::StorageError(message) => SpenderError::ConfigError(message),
        other => other,
    }
}
