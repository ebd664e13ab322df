// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage entry point: opens a backend and prepares it for use.

use std::sync::Arc;

use sitedesk_config::model::StorageConfig;
use sitedesk_core::{KvBackend, Record, SitedeskError};
use tracing::info;

use crate::{FileBackend, KeyedStore, MemoryBackend, migration, seed};

/// Handle to an opened data directory (or in-memory equivalent).
///
/// Cheap to clone; every clone shares the same backend.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn KvBackend>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl Storage {
    /// Open the file backend at `config.data_dir`.
    ///
    /// Runs the legacy leave migration, then seeds defaults when enabled.
    pub fn open(config: &StorageConfig) -> Result<Self, SitedeskError> {
        let backend = FileBackend::open(&config.data_dir)?;
        info!(data_dir = %config.data_dir, "opened data directory");
        Self::with_backend(Arc::new(backend), config.seed_defaults)
    }

    /// Prepare an arbitrary backend.
    pub fn with_backend(backend: Arc<dyn KvBackend>, seed: bool) -> Result<Self, SitedeskError> {
        let report = migration::migrate_partitioned_leaves(&backend)?;
        if !report.is_empty() {
            info!(
                migrated = report.migrated.len(),
                skipped = report.skipped.len(),
                records = report.records_moved(),
                "legacy leave migration finished"
            );
        }
        if seed {
            seed::seed_defaults(&backend)?;
        }
        Ok(Self { backend })
    }

    /// Unseeded in-memory storage.
    pub fn in_memory() -> Self {
        Self {
            backend: Arc::new(MemoryBackend::new()),
        }
    }

    pub fn backend(&self) -> &Arc<dyn KvBackend> {
        &self.backend
    }

    /// Open the collection of `T` under its default key.
    pub fn collection<T: Record>(&self) -> Result<KeyedStore<T>, SitedeskError> {
        KeyedStore::open(Arc::clone(&self.backend))
    }
}
