// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fold per-customer `leaves_{id}` slots into the shared `leaves` collection.

use std::sync::Arc;

use serde_json::Value;
use sitedesk_core::{Fields, KvBackend, Leave, SitedeskError};
use tracing::{info, warn};

use crate::KeyedStore;

const LEGACY_PREFIX: &str = "leaves_";

/// What a migration run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Legacy keys folded in, with the number of records each contributed.
    pub migrated: Vec<(String, usize)>,
    /// Legacy-looking keys whose suffix is not a customer id.
    pub skipped: Vec<String>,
}

impl MigrationReport {
    pub fn is_empty(&self) -> bool {
        self.migrated.is_empty() && self.skipped.is_empty()
    }

    pub fn records_moved(&self) -> usize {
        self.migrated.iter().map(|(_, n)| n).sum()
    }
}

/// Move every `leaves_{n}` slot into `leaves` with `ownerId = n`.
///
/// Records get fresh ids from the `leaves` sequence. The legacy slot is
/// removed only after the shared collection has been written, so an
/// interrupted run can at worst duplicate one slot's leaves, never lose them.
pub fn migrate_partitioned_leaves(
    backend: &Arc<dyn KvBackend>,
) -> Result<MigrationReport, SitedeskError> {
    let mut report = MigrationReport::default();
    let legacy: Vec<String> = backend
        .keys()?
        .into_iter()
        .filter(|k| k.starts_with(LEGACY_PREFIX))
        .collect();
    if legacy.is_empty() {
        return Ok(report);
    }

    let mut leaves = KeyedStore::<Leave>::open(Arc::clone(backend))?;
    for key in legacy {
        let Ok(owner_id) = key[LEGACY_PREFIX.len()..].parse::<u64>() else {
            warn!(key = %key, "legacy leave slot has no customer id, skipping");
            report.skipped.push(key);
            continue;
        };

        let records = read_legacy(backend.as_ref(), &key)?;
        let count = records.len();
        for mut fields in records {
            fields.remove("id");
            fields.insert("ownerId".to_string(), Value::from(owner_id));
            leaves.insert(fields)?;
        }
        backend.remove(&key)?;
        info!(key = %key, owner_id, count, "migrated legacy leave slot");
        report.migrated.push((key, count));
    }
    Ok(report)
}

fn read_legacy(backend: &dyn KvBackend, key: &str) -> Result<Vec<Fields>, SitedeskError> {
    let Some(raw) = backend.get(key)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str::<Vec<Value>>(&raw) {
        Ok(values) => Ok(values
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect()),
        Err(e) => {
            warn!(key = %key, error = %e, "malformed legacy leave slot, dropping");
            Ok(Vec::new())
        }
    }
}
