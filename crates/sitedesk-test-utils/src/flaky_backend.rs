// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend that simulates a full or read-only store.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use sitedesk_core::{KvBackend, SitedeskError};
use sitedesk_storage::MemoryBackend;
use tracing::debug;

/// In-memory backend with switchable write failures.
///
/// Reads always succeed. While failing, `set` and `remove` return a
/// storage error and leave the slots untouched.
#[derive(Debug, Default)]
pub struct FlakyBackend {
    inner: MemoryBackend,
    failing: AtomicBool,
    writes: AtomicUsize,
}

impl FlakyBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail (`true`) or succeed (`false`).
    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self, key: &str) -> Result<(), SitedeskError> {
        if self.failing.load(Ordering::SeqCst) {
            debug!(key, "simulated write failure");
            return Err(SitedeskError::storage(format!(
                "simulated quota exceeded writing `{key}`"
            )));
        }
        Ok(())
    }
}

impl KvBackend for FlakyBackend {
    fn name(&self) -> &str {
        "flaky"
    }

    fn get(&self, key: &str) -> Result<Option<String>, SitedeskError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SitedeskError> {
        self.check(key)?;
        self.inner.set(key, value)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SitedeskError> {
        self.check(key)?;
        self.inner.remove(key)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, SitedeskError> {
        self.inner.keys()
    }
}
