// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Sitedesk.
//!
//! This crate provides the error type, the persisted entity types, and the
//! trait definitions shared by the storage, session, and CRUD crates.

pub mod error;
pub mod rules;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{SitedeskError, ValidationErrors};
pub use traits::{Fields, KvBackend, Record, to_fields};
pub use types::{Actor, Customer, Landing, Leave, Menu, Role, Site, User};
