// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value backends: one JSON file per slot, or an in-memory map.

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use sitedesk_core::SitedeskError;

/// Reject keys that could escape the data directory or collide with temp files.
///
/// Keys are limited to ASCII letters, digits, `_` and `-`.
pub fn validate_key(key: &str) -> Result<(), SitedeskError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(SitedeskError::storage(format!("invalid slot key `{key}`")))
    }
}
