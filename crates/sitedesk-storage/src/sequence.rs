// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-collection monotonic id counters.
//!
//! The `_sequences` slot maps a collection key to the highest id ever issued
//! for it. Ids are never reused, so weak references such as
//! `Customer.siteId` keep pointing at the same record after unrelated deletes.

use std::collections::BTreeMap;

use sitedesk_core::{KvBackend, SitedeskError};
use tracing::warn;

/// Storage key of the sequence table.
pub const SEQUENCES_KEY: &str = "_sequences";

type Table = BTreeMap<String, u64>;

fn read_table(backend: &dyn KvBackend) -> Result<Table, SitedeskError> {
    let Some(raw) = backend.get(SEQUENCES_KEY)? else {
        return Ok(Table::new());
    };
    match serde_json::from_str(&raw) {
        Ok(table) => Ok(table),
        Err(e) => {
            // Ids are also bounded below by the records themselves, so a lost
            // table degrades to max-id + 1.
            warn!(key = SEQUENCES_KEY, error = %e, "malformed sequence table, starting fresh");
            Ok(Table::new())
        }
    }
}

/// Highest id ever issued for `collection`, or 0.
pub fn high_water(backend: &dyn KvBackend, collection: &str) -> Result<u64, SitedeskError> {
    Ok(read_table(backend)?.get(collection).copied().unwrap_or(0))
}

/// Raise the high-water mark for `collection` to at least `id`.
pub fn record_issued(
    backend: &dyn KvBackend,
    collection: &str,
    id: u64,
) -> Result<(), SitedeskError> {
    let mut table = read_table(backend)?;
    let entry = table.entry(collection.to_string()).or_insert(0);
    if *entry >= id {
        return Ok(());
    }
    *entry = id;
    let raw = serde_json::to_string(&table).map_err(SitedeskError::storage)?;
    backend.set(SEQUENCES_KEY, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBackend;

    #[test]
    fn unknown_collection_starts_at_zero() {
        let backend = MemoryBackend::new();
        assert_eq!(high_water(&backend, "sites").unwrap(), 0);
    }

    #[test]
    fn record_issued_only_moves_forward() {
        let backend = MemoryBackend::new();
        record_issued(&backend, "sites", 4).unwrap();
        record_issued(&backend, "sites", 2).unwrap();
        assert_eq!(high_water(&backend, "sites").unwrap(), 4);
        record_issued(&backend, "roles", 1).unwrap();
        assert_eq!(high_water(&backend, "roles").unwrap(), 1);
        assert_eq!(high_water(&backend, "sites").unwrap(), 4);
    }

    #[test]
    fn malformed_table_reads_as_empty() {
        let backend = MemoryBackend::new();
        backend.set(SEQUENCES_KEY, "not json").unwrap();
        assert_eq!(high_water(&backend, "sites").unwrap(), 0);
        record_issued(&backend, "sites", 3).unwrap();
        assert_eq!(high_water(&backend, "sites").unwrap(), 3);
    }
}
