//! JSON file backing for the proof store.
//!
//! The whole store is one JSON document. Saves write a sibling temporary
//! file and rename it over the old one, so a crash mid-write leaves the
//! previous contents in place.

use crate::ProofRecord;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// On-disk layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreFile {
    /// Next id to hand out. Ids are never reused, even after `empty`.
    pub next_id: u64,
    pub records: Vec<ProofRecord>,
}

/// Read the store at `path`.
///
/// A missing file is an empty store. A file that exists but does not parse
/// is moved aside to `<path>.unreadable` and treated as empty.
pub fn load(path: &Path) -> anyhow::Result<StoreFile> {
    if !path.exists() {
        return Ok(StoreFile::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading proof store {}", path.display()))?;

    match serde_json::from_str::<StoreFile>(&contents) {
        Ok(file) => {
            tracing::debug!(path = %path.display(), records = file.records.len(), "loaded proof store");
            Ok(file)
        }
        Err(err) => {
            let aside = unreadable_path(path);
            tracing::warn!(
                path = %path.display(),
                moved_to = %aside.display(),
                error = %err,
                "proof store is unreadable; starting empty"
            );
            std::fs::rename(path, &aside)
                .with_context(|| format!("moving aside {}", path.display()))?;
            Ok(StoreFile::default())
        }
    }
}

/// Replace the store at `path` with `file`.
pub fn save(path: &Path, file: &StoreFile) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(file)?;
    let tmp = temporary_path(path);
    std::fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
    std::fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

fn temporary_path(path: &Path) -> PathBuf {
    with_suffix(path, ".tmp")
}

pub(crate) fn unreadable_path(path: &Path) -> PathBuf {
    with_suffix(path, ".unreadable")
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}
