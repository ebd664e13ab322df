// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! First-run data for an empty data directory.

use std::sync::Arc;

use sitedesk_core::{KvBackend, Menu, Record, Role, Site, SitedeskError};
use tracing::info;

use crate::KeyedStore;

pub fn default_sites() -> Vec<Site> {
    vec![Site {
        id: 0,
        image: Some("https://picsum.photos/seed/picsum/200/300".to_string()),
        name: "Supermarket".to_string(),
        address: "123 Main St FC road".to_string(),
        city: "Pune".to_string(),
        state: "MH".to_string(),
        country: "IND".to_string(),
        postal_code: "10001".to_string(),
    }]
}

pub fn default_roles() -> Vec<Role> {
    let menus = |list: &[Menu]| list.iter().map(ToString::to_string).collect();
    vec![
        Role {
            id: 0,
            name: "Admin".to_string(),
            menus: menus(&[Menu::Dashboard, Menu::Users, Menu::Sites, Menu::Roles]),
        },
        Role {
            id: 0,
            name: "Manager".to_string(),
            menus: menus(&[Menu::Dashboard, Menu::Sites]),
        },
    ]
}

/// Seed sites and roles whose slots have never been written.
///
/// A slot that exists, even as an empty array, is left alone so a user who
/// deleted every seed record does not get them back. Returns how many
/// records were written.
pub fn seed_defaults(backend: &Arc<dyn KvBackend>) -> Result<usize, SitedeskError> {
    Ok(seed_if_absent(backend, default_sites())? + seed_if_absent(backend, default_roles())?)
}

fn seed_if_absent<T: Record>(
    backend: &Arc<dyn KvBackend>,
    records: Vec<T>,
) -> Result<usize, SitedeskError> {
    if backend.get(T::COLLECTION)?.is_some() {
        return Ok(0);
    }
    let mut store = KeyedStore::<T>::open(Arc::clone(backend))?;
    for record in &records {
        store.insert_record(record)?;
    }
    info!(key = T::COLLECTION, count = records.len(), "seeded default records");
    Ok(records.len())
}
