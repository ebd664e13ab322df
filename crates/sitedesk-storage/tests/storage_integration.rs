// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! File-backed storage scenarios across collections.

use serde_json::{Value, json};
use sitedesk_config::model::StorageConfig;
use sitedesk_core::{Customer, Fields, Site};
use sitedesk_storage::{NO_SITE, RelationResolver, Storage};

fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn open(dir: &tempfile::TempDir) -> Storage {
    Storage::open(&StorageConfig {
        data_dir: dir.path().to_string_lossy().into_owned(),
        seed_defaults: false,
    })
    .expect("storage should open")
}

#[test]
fn site_reference_survives_unrelated_delete() {
    let dir = tempfile::tempdir().unwrap();
    let storage = open(&dir);

    let mut sites = storage.collection::<Site>().unwrap();
    let warehouse = sites.insert(fields(json!({"name": "Warehouse", "city": "Pune"}))).unwrap();
    let depot = sites.insert(fields(json!({"name": "Depot", "city": "Mumbai"}))).unwrap();
    assert_eq!((warehouse.id, depot.id), (1, 2));

    let mut customers = storage.collection::<Customer>().unwrap();
    customers
        .insert(fields(json!({"fullName": "Asha Rao", "siteId": 2, "email": "asha@example.com"})))
        .unwrap();

    sites.remove(1).unwrap();

    // Reopen from disk to make sure nothing depends on in-memory state.
    let storage = open(&dir);
    let sites = storage.collection::<Site>().unwrap();
    let customers = storage.collection::<Customer>().unwrap();
    let resolver = RelationResolver::new(&sites);

    let customer = &customers.records()[0];
    assert_eq!(
        resolver.label(customer.site_id, NO_SITE, |s| s.name.clone()),
        "Depot"
    );
    assert_eq!(sites.get(2).unwrap().city, "Mumbai");
}

#[test]
fn deleted_site_resolves_to_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let storage = open(&dir);

    let mut sites = storage.collection::<Site>().unwrap();
    sites.insert(fields(json!({"name": "Warehouse"}))).unwrap();
    let mut customers = storage.collection::<Customer>().unwrap();
    customers
        .insert(fields(json!({"fullName": "Ravi", "siteId": "1"})))
        .unwrap();
    sites.remove(1).unwrap();

    let resolver = RelationResolver::new(&sites);
    let label = resolver.label(customers.records()[0].site_id, NO_SITE, |s| s.name.clone());
    assert_eq!(label, "No Site");
}

#[test]
fn sequence_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let storage = open(&dir);
        let mut sites = storage.collection::<Site>().unwrap();
        sites.insert(fields(json!({"name": "A"}))).unwrap();
        sites.insert(fields(json!({"name": "B"}))).unwrap();
        sites.remove(2).unwrap();
    }
    let storage = open(&dir);
    let mut sites = storage.collection::<Site>().unwrap();
    assert_eq!(sites.insert(fields(json!({"name": "C"}))).unwrap().id, 3);
}

#[test]
fn legacy_leave_slots_are_migrated_on_open() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("leaves_4.json"),
        r#"[{"id":1,"type":"Sick","startDate":"2024-05-01","endDate":"2024-05-02","description":"cold"}]"#,
    )
    .unwrap();

    let storage = open(&dir);
    let leaves = storage.collection::<sitedesk_core::Leave>().unwrap();
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves.records()[0].owner_id, 4);
    assert!(!dir.path().join("leaves_4.json").exists());
}

#[test]
fn corrupt_slot_file_does_not_block_open() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("sites.json"), [0xff, 0xfe, b'[', b']']).unwrap();
    std::fs::write(dir.path().join("currentUser.json"), [0xc3, 0x28]).unwrap();

    let storage = Storage::open(&StorageConfig {
        data_dir: dir.path().to_string_lossy().into_owned(),
        seed_defaults: true,
    })
    .expect("storage should open over a corrupt slot");
    assert!(storage.collection::<Site>().unwrap().is_empty());

    // The next write replaces the corrupt slot.
    let mut sites = storage.collection::<Site>().unwrap();
    sites.insert(fields(json!({"name": "Depot"}))).unwrap();
    let reopened = open(&dir);
    assert_eq!(reopened.collection::<Site>().unwrap().records()[0].name, "Depot");
}
