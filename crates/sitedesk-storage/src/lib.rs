// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local persistence layer for Sitedesk.
//!
//! Every collection lives in one named slot of a [`KvBackend`] as a JSON
//! array. [`KeyedStore`] wraps one slot with typed CRUD and a monotonic id
//! sequence; [`RelationResolver`] joins weak foreign keys across stores.
//!
//! [`KvBackend`]: sitedesk_core::KvBackend

pub mod backend;
pub mod keyed;
pub mod migration;
pub mod relation;
pub mod seed;
pub mod sequence;
pub mod storage;

pub use backend::{FileBackend, MemoryBackend};
pub use keyed::KeyedStore;
pub use migration::{MigrationReport, migrate_partitioned_leaves};
pub use relation::{NO_SITE, NO_SITE_ASSIGNED, RelationResolver, Resolved};
pub use storage::Storage;
