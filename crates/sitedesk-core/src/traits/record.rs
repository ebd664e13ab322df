// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The record trait implemented by every persisted entity.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A JSON object of field values, used for drafts and shallow-merge updates.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// An entity stored in one named collection with integer identity.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Storage key of the collection this record lives in.
    const COLLECTION: &'static str;

    /// Identity, unique within the collection.
    fn id(&self) -> u64;
}

/// Serialize a record into its field map.
pub fn to_fields<T: Serialize>(record: &T) -> Result<Fields, serde_json::Error> {
    match serde_json::to_value(record)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(serde::ser::Error::custom(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}
