// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value backend trait for persistent slots.

use crate::error::SitedeskError;

/// A synchronous string-keyed, string-valued persistent store.
///
/// Each key is one slot holding a serialized JSON value. Writes replace the
/// whole slot; there are no partial updates and no transactions.
pub trait KvBackend: Send + Sync + 'static {
    /// Returns the human-readable name of this backend.
    fn name(&self) -> &str;

    /// Reads a slot, or `None` if it has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, SitedeskError>;

    /// Overwrites a slot.
    fn set(&self, key: &str, value: &str) -> Result<(), SitedeskError>;

    /// Deletes a slot. Removing an absent slot is not an error.
    fn remove(&self, key: &str) -> Result<(), SitedeskError>;

    /// Lists every key currently present, sorted.
    fn keys(&self) -> Result<Vec<String>, SitedeskError>;
}
