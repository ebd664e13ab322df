// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed CRUD over one named slot.
//!
//! A [`KeyedStore`] keeps the last persisted snapshot of its collection in
//! memory. Every mutation builds the next snapshot, writes the whole slot,
//! and only then replaces the in-memory copy. A failed write therefore
//! leaves memory matching what is on disk.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use sitedesk_core::{Fields, KvBackend, Record, SitedeskError, to_fields};
use tracing::{debug, warn};

use crate::sequence;

/// One persisted collection of `T`, keyed by integer id.
pub struct KeyedStore<T: Record> {
    backend: Arc<dyn KvBackend>,
    key: String,
    records: Vec<T>,
    _marker: PhantomData<T>,
}

impl<T: Record> std::fmt::Debug for KeyedStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedStore")
            .field("backend", &self.backend.name())
            .field("key", &self.key)
            .field("len", &self.records.len())
            .finish()
    }
}

impl<T: Record> KeyedStore<T> {
    /// Open the collection under its default key, [`Record::COLLECTION`].
    pub fn open(backend: Arc<dyn KvBackend>) -> Result<Self, SitedeskError> {
        Self::open_at(backend, T::COLLECTION)
    }

    /// Open the collection stored under an explicit key.
    pub fn open_at(
        backend: Arc<dyn KvBackend>,
        key: impl Into<String>,
    ) -> Result<Self, SitedeskError> {
        let mut store = Self {
            backend,
            key: key.into(),
            records: Vec::new(),
            _marker: PhantomData,
        };
        store.records = store.load_all()?;
        Ok(store)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Records as of the last successful load or write.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    /// Read the slot from the backend.
    ///
    /// An absent slot and a slot that does not parse as an array of `T`
    /// both read as empty; only backend I/O failures are errors.
    pub fn load_all(&self) -> Result<Vec<T>, SitedeskError> {
        let Some(raw) = self.backend.get(&self.key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!(key = %self.key, error = %e, "malformed collection slot, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Re-read the slot, discarding the in-memory snapshot.
    pub fn reload(&mut self) -> Result<(), SitedeskError> {
        self.records = self.load_all()?;
        Ok(())
    }

    /// Serialize `records` and overwrite the slot.
    pub fn save_all(&mut self, records: Vec<T>) -> Result<(), SitedeskError> {
        let raw = serde_json::to_string(&records).map_err(SitedeskError::storage)?;
        self.backend.set(&self.key, &raw)?;
        debug!(key = %self.key, count = records.len(), "collection saved");
        self.records = records;
        Ok(())
    }

    /// The id the next insert will receive.
    ///
    /// One past the larger of the collection's high-water mark and the
    /// largest id present, so ids are never reused after a delete.
    pub fn next_id(&self) -> Result<u64, SitedeskError> {
        let high_water = sequence::high_water(self.backend.as_ref(), &self.key)?;
        let max_present = self.records.iter().map(Record::id).max().unwrap_or(0);
        high_water.max(max_present).checked_add(1).ok_or_else(|| {
            SitedeskError::storage(format!("id sequence for `{}` is exhausted", self.key))
        })
    }

    /// Append `data` as a new record with a fresh id.
    ///
    /// Any `id` in `data` is ignored.
    pub fn insert(&mut self, mut data: Fields) -> Result<T, SitedeskError> {
        let id = self.next_id()?;
        data.insert("id".to_string(), Value::from(id));
        let record: T = from_fields(data)?;

        // Burn the id before writing the records: a failed records write
        // then costs a gap, never a reuse.
        sequence::record_issued(self.backend.as_ref(), &self.key, id)?;

        let mut next = self.records.clone();
        next.push(record.clone());
        self.save_all(next)?;
        debug!(key = %self.key, id, "record inserted");
        Ok(record)
    }

    /// Insert a typed record, assigning it a fresh id.
    pub fn insert_record(&mut self, record: &T) -> Result<T, SitedeskError> {
        self.insert(to_fields(record).map_err(SitedeskError::storage)?)
    }

    /// Shallow-merge `data` over the record with `id`.
    ///
    /// Returns `Ok(None)` without writing when no record has that id. The
    /// record's id is never changed by `data`.
    pub fn update(&mut self, id: u64, data: Fields) -> Result<Option<T>, SitedeskError> {
        let Some(index) = self.records.iter().position(|r| r.id() == id) else {
            debug!(key = %self.key, id, "update of missing record ignored");
            return Ok(None);
        };

        let mut merged = to_fields(&self.records[index]).map_err(SitedeskError::storage)?;
        for (field, value) in data {
            if field != "id" {
                merged.insert(field, value);
            }
        }
        let record: T = from_fields(merged)?;

        let mut next = self.records.clone();
        next[index] = record.clone();
        self.save_all(next)?;
        debug!(key = %self.key, id, "record updated");
        Ok(Some(record))
    }

    /// Replace the record with `id` by a typed value, keeping the id.
    pub fn update_record(&mut self, id: u64, record: &T) -> Result<Option<T>, SitedeskError> {
        self.update(id, to_fields(record).map_err(SitedeskError::storage)?)
    }

    /// Delete the record with `id`. Returns `false` without writing when absent.
    pub fn remove(&mut self, id: u64) -> Result<bool, SitedeskError> {
        if self.get(id).is_none() {
            debug!(key = %self.key, id, "remove of missing record ignored");
            return Ok(false);
        }
        let next: Vec<T> = self.records.iter().filter(|r| r.id() != id).cloned().collect();
        self.save_all(next)?;
        debug!(key = %self.key, id, "record removed");
        Ok(true)
    }

    /// Records matching `predicate`, in collection order.
    pub fn filter<'a>(&'a self, predicate: impl Fn(&T) -> bool + 'a) -> impl Iterator<Item = &'a T> + 'a {
        self.records.iter().filter(move |r| predicate(r))
    }
}

fn from_fields<T: Record>(fields: Fields) -> Result<T, SitedeskError> {
    serde_json::from_value(Value::Object(fields)).map_err(SitedeskError::storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBackend;
    use proptest::prelude::*;
    use serde_json::json;
    use sitedesk_core::types::{Customer, Role, Site};
    use tracing_test::traced_test;

    fn backend() -> Arc<dyn KvBackend> {
        Arc::new(MemoryBackend::new())
    }

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn site(name: &str, city: &str) -> Fields {
        fields(json!({
            "name": name,
            "address": "1 Main St",
            "city": city,
            "state": "MH",
            "country": "IND",
            "postalCode": "411001"
        }))
    }

    /// Backend whose writes always fail, reads delegate to memory.
    struct ReadOnlyBackend(MemoryBackend);

    impl KvBackend for ReadOnlyBackend {
        fn name(&self) -> &str {
            "read-only"
        }
        fn get(&self, key: &str) -> Result<Option<String>, SitedeskError> {
            self.0.get(key)
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), SitedeskError> {
            Err(SitedeskError::storage("quota exceeded"))
        }
        fn remove(&self, _key: &str) -> Result<(), SitedeskError> {
            Err(SitedeskError::storage("quota exceeded"))
        }
        fn keys(&self) -> Result<Vec<String>, SitedeskError> {
            self.0.keys()
        }
    }

    #[test]
    fn exhausted_id_sequence_is_a_storage_error() {
        let backend = backend();
        backend
            .set("sites", &format!(r#"[{{"id":{},"name":"Legacy"}}]"#, u64::MAX))
            .unwrap();
        let mut sites = KeyedStore::<Site>::open(backend.clone()).unwrap();
        assert!(matches!(sites.next_id(), Err(SitedeskError::Storage { .. })));
        assert!(sites.insert(site("Depot", "Pune")).is_err());
        assert_eq!(sites.len(), 1);
    }

    #[test]
    fn first_insert_gets_id_one_then_two() {
        let mut sites = KeyedStore::<Site>::open(backend()).unwrap();
        let first = sites.insert(site("Warehouse", "Pune")).unwrap();
        let second = sites.insert(site("Depot", "Mumbai")).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(sites.len(), 2);
    }

    #[test]
    fn ids_are_not_reused_or_shifted_after_delete() {
        let mut sites = KeyedStore::<Site>::open(backend()).unwrap();
        sites.insert(site("Warehouse", "Pune")).unwrap();
        sites.insert(site("Depot", "Mumbai")).unwrap();

        assert!(sites.remove(1).unwrap());
        assert_eq!(sites.get(2).unwrap().name, "Depot");

        // Deleting the newest record must not hand its id out again.
        assert!(sites.remove(2).unwrap());
        let third = sites.insert(site("Annex", "Nagpur")).unwrap();
        assert_eq!(third.id, 3);
    }

    #[test]
    fn insert_ignores_caller_supplied_id() {
        let mut roles = KeyedStore::<Role>::open(backend()).unwrap();
        let role = roles
            .insert(fields(json!({"id": 99, "name": "Auditor", "menus": []})))
            .unwrap();
        assert_eq!(role.id, 1);
    }

    #[test]
    fn next_id_respects_legacy_records_without_sequence() {
        let backend = backend();
        backend
            .set("sites", r#"[{"id":5,"name":"Old"},{"id":2,"name":"Older"}]"#)
            .unwrap();
        let sites = KeyedStore::<Site>::open(backend).unwrap();
        assert_eq!(sites.next_id().unwrap(), 6);
    }

    #[test]
    fn update_shallow_merges_and_keeps_id() {
        let mut sites = KeyedStore::<Site>::open(backend()).unwrap();
        sites.insert(site("Warehouse", "Pune")).unwrap();

        let updated = sites
            .update(1, fields(json!({"id": 42, "city": "Nashik"})))
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, 1);
        assert_eq!(updated.city, "Nashik");
        assert_eq!(updated.name, "Warehouse");
        assert_eq!(sites.load_all().unwrap()[0].city, "Nashik");
    }

    #[test]
    fn update_missing_id_is_a_no_op() {
        let backend = backend();
        let mut sites = KeyedStore::<Site>::open(backend.clone()).unwrap();
        sites.insert(site("Warehouse", "Pune")).unwrap();
        let before = backend.get("sites").unwrap();

        assert!(sites.update(7, site("X", "Y")).unwrap().is_none());
        assert_eq!(backend.get("sites").unwrap(), before);
    }

    #[test]
    fn remove_missing_id_returns_false() {
        let mut sites = KeyedStore::<Site>::open(backend()).unwrap();
        assert!(!sites.remove(1).unwrap());
    }

    #[test]
    fn removed_record_never_reloads() {
        let backend = backend();
        let mut sites = KeyedStore::<Site>::open(backend.clone()).unwrap();
        sites.insert(site("A", "Pune")).unwrap();
        sites.insert(site("B", "Pune")).unwrap();
        sites.remove(1).unwrap();

        let reopened = KeyedStore::<Site>::open(backend).unwrap();
        assert!(reopened.get(1).is_none());
        assert_eq!(reopened.len(), 1);
    }

    #[test]
    #[traced_test]
    fn malformed_slot_reads_as_empty_and_warns() {
        let backend = backend();
        backend.set("customers", "{not json").unwrap();
        let customers = KeyedStore::<Customer>::open(backend).unwrap();
        assert!(customers.is_empty());
        assert!(logs_contain("malformed collection slot"));
    }

    #[test]
    fn failed_write_keeps_last_persisted_snapshot() {
        let memory = MemoryBackend::new();
        memory
            .set("sites", r#"[{"id":1,"name":"Supermarket"}]"#)
            .unwrap();
        let mut sites = KeyedStore::<Site>::open(Arc::new(ReadOnlyBackend(memory))).unwrap();

        let err = sites.insert(site("Warehouse", "Pune")).unwrap_err();
        assert!(matches!(err, SitedeskError::Storage { .. }));
        assert_eq!(sites.len(), 1);

        assert!(sites.update(1, site("Renamed", "Pune")).is_err());
        assert_eq!(sites.get(1).unwrap().name, "Supermarket");

        assert!(sites.remove(1).is_err());
        assert!(sites.get(1).is_some());
    }

    #[test]
    fn wrongly_typed_update_is_rejected_without_write() {
        let mut roles = KeyedStore::<Role>::open(backend()).unwrap();
        roles
            .insert(fields(json!({"name": "Admin", "menus": ["Dashboard"]})))
            .unwrap();
        let err = roles
            .update(1, fields(json!({"menus": "Dashboard"})))
            .unwrap_err();
        assert!(matches!(err, SitedeskError::Storage { .. }));
        assert_eq!(roles.get(1).unwrap().menus, vec!["Dashboard"]);
    }

    #[test]
    fn open_at_uses_explicit_key() {
        let backend = backend();
        let mut legacy = KeyedStore::<Role>::open_at(backend.clone(), "roles_archive").unwrap();
        legacy.insert_record(&Role { id: 0, name: "Old".into(), menus: vec![] }).unwrap();
        assert!(backend.get("roles_archive").unwrap().is_some());
        assert!(backend.get("roles").unwrap().is_none());
    }

    fn arb_site() -> impl Strategy<Value = Site> {
        (1u64..10_000, "[a-zA-Z ]{0,12}", "[a-zA-Z]{0,8}", proptest::option::of("[a-z:/.]{0,16}"))
            .prop_map(|(id, name, city, image)| Site {
                id,
                image,
                name,
                city,
                ..Default::default()
            })
    }

    proptest! {
        #[test]
        fn save_then_load_roundtrips(records in proptest::collection::vec(arb_site(), 0..20)) {
            let mut sites = KeyedStore::<Site>::open(backend()).unwrap();
            sites.save_all(records.clone()).unwrap();
            prop_assert_eq!(sites.load_all().unwrap(), records);
        }

        #[test]
        fn inserts_never_duplicate_ids(ops in proptest::collection::vec(any::<bool>(), 1..40)) {
            let mut sites = KeyedStore::<Site>::open(backend()).unwrap();
            for insert in ops {
                if insert || sites.is_empty() {
                    sites.insert(site("S", "C")).unwrap();
                } else {
                    let id = sites.records()[0].id;
                    sites.remove(id).unwrap();
                }
                let mut ids: Vec<u64> = sites.iter().map(|s| s.id).collect();
                let total = ids.len();
                ids.sort_unstable();
                ids.dedup();
                prop_assert_eq!(ids.len(), total);
            }
        }
    }
}
