// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only joins across collections by weak foreign key.

use sitedesk_core::Record;

use crate::KeyedStore;

/// Fallback label for a customer row whose site is missing.
pub const NO_SITE: &str = "No Site";

/// Fallback label on the customer dashboard when no site resolves.
pub const NO_SITE_ASSIGNED: &str = "No site assigned";

/// Outcome of a foreign-key lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'a, U> {
    Found(&'a U),
    NotFound,
}

impl<'a, U> Resolved<'a, U> {
    pub fn found(self) -> Option<&'a U> {
        match self {
            Resolved::Found(record) => Some(record),
            Resolved::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Resolved::Found(_))
    }

    /// Project the referenced record to a label, or use `fallback`.
    pub fn label_or(self, fallback: &str, project: impl FnOnce(&U) -> String) -> String {
        match self {
            Resolved::Found(record) => project(record),
            Resolved::NotFound => fallback.to_string(),
        }
    }
}

/// Resolves foreign keys against the records of one store.
///
/// Holds a shared borrow, so neither collection can be mutated while a
/// resolver is alive.
#[derive(Debug)]
pub struct RelationResolver<'a, U: Record> {
    store: &'a KeyedStore<U>,
}

impl<'a, U: Record> RelationResolver<'a, U> {
    pub fn new(store: &'a KeyedStore<U>) -> Self {
        Self { store }
    }

    /// Look up `fk`. A `None` key and a dangling key both give `NotFound`.
    pub fn resolve(&self, fk: Option<u64>) -> Resolved<'a, U> {
        match fk.and_then(|id| self.store.get(id)) {
            Some(record) => Resolved::Found(record),
            None => Resolved::NotFound,
        }
    }

    /// Resolve and project in one step.
    pub fn label(
        &self,
        fk: Option<u64>,
        fallback: &str,
        project: impl FnOnce(&U) -> String,
    ) -> String {
        self.resolve(fk).label_or(fallback, project)
    }
}
