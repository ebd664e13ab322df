// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process backend for tests and ephemeral sessions.

use std::collections::BTreeMap;
use std::sync::RwLock;

use sitedesk_core::{KvBackend, SitedeskError};

use super::validate_key;

/// Map-backed slots that vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slots: RwLock<BTreeMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> SitedeskError {
    SitedeskError::Internal("memory backend lock poisoned".to_string())
}

impl KvBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<Option<String>, SitedeskError> {
        validate_key(key)?;
        Ok(self.slots.read().map_err(poisoned)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SitedeskError> {
        validate_key(key)?;
        self.slots
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SitedeskError> {
        validate_key(key)?;
        self.slots.write().map_err(poisoned)?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, SitedeskError> {
        Ok(self.slots.read().map_err(poisoned)?.keys().cloned().collect())
    }
}
