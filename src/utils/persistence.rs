//! Atomic JSON file helpers shared by ledger storage and configuration.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::errors::Result;

use super::ensure_dir;

const TMP_SUFFIX: &str = "tmp";

pub const BACKUP_EXTENSION: &str = "json";
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";

/// Serializes `value` as pretty JSON, staging to a temporary file before renaming.
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp = tmp_path(path);
    write_file(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

pub fn write_file(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Lower-case, dash separated label derived from a free-form backup note.
pub fn sanitize_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Builds `<stem>_<timestamp>[_<note>].json` for a new backup file.
pub fn backup_file_name(stem: &str, now: DateTime<Utc>, note: Option<&str>) -> String {
    let mut name = format!("{}_{}", stem, now.format(BACKUP_TIMESTAMP_FORMAT));
    if let Some(label) = sanitize_note(note) {
        name.push('_');
        name.push_str(&label);
    }
    name.push('.');
    name.push_str(BACKUP_EXTENSION);
    name
}

/// Extracts the timestamp embedded by [`backup_file_name`].
///
/// The stem may itself contain underscores, so the first `YYYYMMDD_HHMM` pair
/// found scanning from the right wins.
pub fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{}", BACKUP_EXTENSION))?;
    let parts: Vec<&str> = trimmed.split('_').collect();
    parts.windows(2).rev().find_map(|pair| {
        if !is_digits(pair[0], 8) || !is_digits(pair[1], 4) {
            return None;
        }
        let raw = format!("{}{}", pair[0], pair[1]);
        NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M")
            .ok()
            .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
    })
}

/// Lists `*.json` backup names in `dir`, newest first.
pub fn list_backup_names(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
            entries.push(name.to_string());
        }
    }
    entries.sort_by(|a, b| {
        parse_backup_timestamp(b)
            .cmp(&parse_backup_timestamp(a))
            .then_with(|| b.cmp(a))
    });
    Ok(entries)
}

/// Deletes all but the newest `retention` backups in `dir` (at least one is
/// kept). Returns how many were removed.
pub fn prune_backups(dir: &Path, retention: usize) -> Result<usize> {
    let mut removed = 0;
    for name in list_backup_names(dir)?.iter().skip(retention.max(1)) {
        match fs::remove_file(dir.join(name)) {
            Ok(()) => removed += 1,
            Err(err) => warn!(backup = %name, error = %err, "failed to prune backup"),
        }
    }
    Ok(removed)
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}
