// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `currentUser` slot.
//!
//! The slot holds a detached snapshot of whichever record last signed in.
//! Later edits to the source User or Customer are not reflected until the
//! next sign-in.

use std::sync::Arc;

use sitedesk_core::types::CURRENT_USER_KEY;
use sitedesk_core::{Actor, KvBackend, SitedeskError};
use tracing::{info, warn};

/// Single-slot holder of the authenticated actor.
#[derive(Clone)]
pub struct SessionContext {
    backend: Arc<dyn KvBackend>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl SessionContext {
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self { backend }
    }

    /// Store a snapshot of `actor`, replacing any previous one.
    ///
    /// The stored credential is blanked in the snapshot.
    pub fn sign_in(&self, actor: &Actor) -> Result<(), SitedeskError> {
        let mut snapshot = actor.clone();
        match &mut snapshot {
            Actor::Customer(c) => c.password.clear(),
            Actor::User(u) => u.password.clear(),
        }
        let raw = serde_json::to_string(&snapshot).map_err(SitedeskError::storage)?;
        self.backend.set(CURRENT_USER_KEY, &raw)?;
        info!(id = snapshot.id(), role = snapshot.role(), "signed in");
        Ok(())
    }

    /// Clear the slot. Signing out while anonymous is a no-op.
    pub fn sign_out(&self) -> Result<(), SitedeskError> {
        self.backend.remove(CURRENT_USER_KEY)?;
        info!("signed out");
        Ok(())
    }

    /// The signed-in actor, or `None` when anonymous.
    ///
    /// An unreadable slot counts as anonymous.
    pub fn current(&self) -> Result<Option<Actor>, SitedeskError> {
        let Some(raw) = self.backend.get(CURRENT_USER_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(actor) => Ok(Some(actor)),
            Err(e) => {
                warn!(error = %e, "unreadable session slot, treating as anonymous");
                Ok(None)
            }
        }
    }

    /// The signed-in actor, or a session error when anonymous.
    pub fn require(&self) -> Result<Actor, SitedeskError> {
        self.current()?
            .ok_or_else(|| SitedeskError::Session("not signed in".to_string()))
    }
}
