use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

const HOME_ENV: &str = "SPENDER_CORE_HOME";
const DEFAULT_DIR_NAME: &str = ".spender_core";
const LEDGER_DIR: &str = "ledgers";
const BACKUP_DIR: &str = "backups";
const CONFIG_DIR: &str = "config";
const CONFIG_BACKUP_DIR: &str = "backups";
const CONFIG_FILE: &str = "config.json";

/// Resolves the on-disk layout used by storage and configuration.
pub struct PathResolver;

impl PathResolver {
    /// Application data directory: `$SPENDER_CORE_HOME`, else `~/.spender_core`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn resolve_base(custom: Option<PathBuf>) -> PathBuf {
        custom.unwrap_or_else(Self::base_dir)
    }

    pub fn ledger_dir_in(base: &Path) -> PathBuf {
        base.join(LEDGER_DIR)
    }

    pub fn backup_dir_in(base: &Path) -> PathBuf {
        base.join(BACKUP_DIR)
    }

    pub fn config_dir_in(base: &Path) -> PathBuf {
        base.join(CONFIG_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        Self::config_dir_in(base).join(CONFIG_FILE)
    }

    pub fn config_backup_dir_in(base: &Path) -> PathBuf {
        Self::config_dir_in(base).join(CONFIG_BACKUP_DIR)
    }
}

/// Creates `path` and any missing parents.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_base_wins_over_default() {
        let custom = PathBuf::from("/tmp/spender-test");
        assert_eq!(PathResolver::resolve_base(Some(custom.clone())), custom);
    }

    #[test]
    fn config_paths_nest_under_config_dir() {
        let base = PathBuf::from("/data");
        assert_eq!(
            PathResolver::config_file_in(&base),
            PathBuf::from("/data/config/config.json")
        );
        assert_eq!(
            PathResolver::config_backup_dir_in(&base),
            PathBuf::from("/data/config/backups")
        );
    }
}
