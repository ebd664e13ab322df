// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions at the seams between Sitedesk crates.

pub mod backend;
pub mod record;

pub use backend::KvBackend;
pub use record::{Fields, Record, to_fields};
