use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    errors::SpenderError,
    ledger::Ledger,
    utils::{
        ensure_dir,
        persistence::{backup_file_name, list_backup_names, load_json, prune_backups, save_json},
        PathResolver,
    },
};

use super::StorageBackend;
use crate::errors::Result;

const DEFAULT_RETENTION: usize = 5;

/// File-backed ledger storage: one pretty-printed JSON document per ledger,
/// with rotating timestamped backups.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    ledgers_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let root = PathResolver::resolve_base(root);
        let ledgers_dir = PathResolver::ledger_dir_in(&root);
        let backups_dir = PathResolver::backup_dir_in(&root);
        ensure_dir(&ledgers_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            root,
            ledgers_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    /// Storage under `root` keeping `config.backup_retention` backups per ledger.
    pub fn from_config(root: Option<PathBuf>, config: &Config) -> Result<Self> {
        Self::new(root, Some(config.backup_retention))
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn ledger_path(&self, name: &str) -> PathBuf {
        self.ledgers_dir
            .join(format!("{}.json", canonical_name(name)))
    }

    pub fn backup_path(&self, name: &str, backup_name: &str) -> PathBuf {
        self.backup_dir(name).join(backup_name)
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let backup_name = backup_file_name(&canonical_name(name), Utc::now(), None);
        fs::copy(path, dir.join(&backup_name))?;
        self.prune_backups(name)
    }

    fn prune_backups(&self, name: &str) -> Result<()> {
        let removed = prune_backups(&self.backup_dir(name), self.retention)?;
        if removed > 0 {
            debug!(ledger = %name, removed, "pruned ledger backups");
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, ledger: &Ledger, name: &str) -> Result<()> {
        let path = self.ledger_path(name);
        self.backup_existing_file(name, &path)?;
        save_ledger_to_path(ledger, &path)?;
        info!(ledger = %name, transactions = ledger.transactions.len(), "ledger saved");
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Ledger> {
        let ledger = load_ledger_from_path(&self.ledger_path(name))?;
        for warning in ledger.warnings() {
            warn!(ledger = %name, "{warning}");
        }
        Ok(ledger)
    }

    fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        list_backup_names(&self.backup_dir(name))
    }

    fn backup(&self, ledger: &Ledger, name: &str, note: Option<&str>) -> Result<String> {
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let backup_name = backup_file_name(&canonical_name(name), Utc::now(), note);
        save_json(ledger, &dir.join(&backup_name))?;
        self.prune_backups(name)?;
        Ok(backup_name)
    }

    fn restore(&self, name: &str, backup_name: &str) -> Result<Ledger> {
        let backup_path = self.backup_path(name, backup_name);
        if !backup_path.exists() {
            return Err(SpenderError::StorageError(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        let target = self.ledger_path(name);
        fs::copy(&backup_path, &target)?;
        info!(ledger = %name, backup = %backup_name, "ledger restored from backup");
        load_ledger_from_path(&target)
    }
}

pub fn save_ledger_to_path(ledger: &Ledger, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    save_json(ledger, path)
}

pub fn load_ledger_from_path(path: &Path) -> Result<Ledger> {
    load_json(path)
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "ledger".into()
    } else {
        sanitized
    }
}
