// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Sitedesk.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// The primary error type used across all Sitedesk crates.
#[derive(Debug, Error)]
pub enum SitedeskError {
    /// Configuration errors (invalid TOML, out-of-range values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (I/O failure, serialization, invalid slot key).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// One or more form fields failed validation. Nothing was written.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// Credential mismatch at sign-in.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// An operation needed a signed-in actor and there was none.
    #[error("session error: {0}")]
    Session(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SitedeskError {
    /// Wrap any error as a [`SitedeskError::Storage`].
    pub fn storage<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        SitedeskError::Storage { source: err.into() }
    }

    /// Returns the field errors if this is a validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            SitedeskError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for SitedeskError {
    fn from(errors: ValidationErrors) -> Self {
        SitedeskError::Validation(errors)
    }
}

/// Field-keyed validation messages, ordered by field name.
///
/// Only the first failure per field is kept, matching how a form shows a
/// single helper text under each input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field` unless one is already recorded.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when no field failed, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.fields {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_message_per_field_wins() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "Email is required");
        errors.add("email", "Invalid email format");
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn display_lists_fields_in_order() {
        let mut errors = ValidationErrors::new();
        errors.add("phone", "Invalid phone");
        errors.add("email", "Invalid email");
        assert_eq!(errors.to_string(), "email: Invalid email; phone: Invalid phone");
    }

    #[test]
    fn validation_error_exposes_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "Required");
        let err = SitedeskError::from(errors);
        assert!(err.validation_errors().unwrap().contains("name"));
        assert!(SitedeskError::Internal("x".into()).validation_errors().is_none());
    }
}
