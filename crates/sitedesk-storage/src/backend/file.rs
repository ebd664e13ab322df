// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Directory-backed slots: `<root>/<key>.json`.
//!
//! Writes go to a temp file in the same directory and are renamed into
//! place, so a slot is either the old value or the new one, never a torn mix.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use sitedesk_core::{KvBackend, SitedeskError};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::validate_key;

const SLOT_EXTENSION: &str = "json";

/// File-per-slot backend rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Open (creating if needed) the data directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, SitedeskError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(SitedeskError::storage)?;
        debug!(root = %root.display(), "file backend opened");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, SitedeskError> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.{SLOT_EXTENSION}")))
    }
}

impl KvBackend for FileBackend {
    fn name(&self) -> &str {
        "file"
    }

    /// A slot file that is not UTF-8 reads as an empty string, which no
    /// reader parses, so it is handled like any other malformed slot.
    fn get(&self, key: &str) -> Result<Option<String>, SitedeskError> {
        let bytes = match fs::read(self.slot_path(key)?) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SitedeskError::storage(e)),
        };
        match String::from_utf8(bytes) {
            Ok(content) => Ok(Some(content)),
            Err(e) => {
                warn!(key, error = %e, "slot is not valid UTF-8");
                Ok(Some(String::new()))
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SitedeskError> {
        let path = self.slot_path(key)?;
        let mut tmp = NamedTempFile::new_in(&self.root).map_err(SitedeskError::storage)?;
        tmp.write_all(value.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(SitedeskError::storage)?;
        tmp.persist(&path)
            .map_err(|e| SitedeskError::storage(e.error))?;
        debug!(key, bytes = value.len(), "slot written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SitedeskError> {
        match fs::remove_file(self.slot_path(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SitedeskError::storage(e)),
        }
    }

    fn keys(&self) -> Result<Vec<String>, SitedeskError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(SitedeskError::storage)? {
            let path = entry.map_err(SitedeskError::storage)?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SLOT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && validate_key(stem).is_ok()
            {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}
