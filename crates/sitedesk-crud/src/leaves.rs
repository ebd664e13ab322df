// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Leave requests of one customer, and the customer dashboard summary.

use serde_json::Value;
use sitedesk_config::model::ListingConfig;
use sitedesk_core::{Actor, Customer, Fields, Leave, Site, SitedeskError};
use sitedesk_session::owner_id_for;
use sitedesk_storage::{KeyedStore, NO_SITE_ASSIGNED, RelationResolver, Storage};
use tracing::debug;

use crate::controller::CrudController;
use crate::schema;

/// Leaves owned by `owner_id`, in collection order.
pub fn list_by_owner(store: &KeyedStore<Leave>, owner_id: u64) -> Vec<&Leave> {
    store.filter(move |leave| leave.owner_id == owner_id).collect()
}

/// Resolve the customer id owning `actor`'s data.
pub fn resolve_owner(storage: &Storage, actor: &Actor) -> Result<u64, SitedeskError> {
    let customers = storage.collection::<Customer>()?;
    owner_id_for(actor, &customers).ok_or_else(|| {
        SitedeskError::Session(format!(
            "no customer record linked to {}",
            actor.email()
        ))
    })
}

/// A leave controller scoped to one owner.
///
/// Every create stamps `ownerId`; edits and deletes cannot reach another
/// owner's leaves.
#[derive(Debug)]
pub struct LeaveBook {
    owner_id: u64,
    controller: CrudController<Leave>,
}

impl LeaveBook {
    pub fn open(
        storage: &Storage,
        owner_id: u64,
        listing: &ListingConfig,
    ) -> Result<Self, SitedeskError> {
        let controller = CrudController::new(storage.collection()?, schema::leave(), listing)
            .with_scope(move |leave: &Leave| leave.owner_id == owner_id);
        Ok(Self {
            owner_id,
            controller,
        })
    }

    /// Open the book of whoever `actor` resolves to.
    pub fn for_actor(
        storage: &Storage,
        actor: &Actor,
        listing: &ListingConfig,
    ) -> Result<Self, SitedeskError> {
        let owner_id = resolve_owner(storage, actor)?;
        Self::open(storage, owner_id, listing)
    }

    pub fn owner_id(&self) -> u64 {
        self.owner_id
    }

    pub fn controller(&self) -> &CrudController<Leave> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut CrudController<Leave> {
        &mut self.controller
    }

    pub fn list(&self) -> Vec<&Leave> {
        list_by_owner(self.controller.store(), self.owner_id)
    }

    pub fn count(&self) -> usize {
        self.list().len()
    }

    /// Commit the open dialog with this book's owner stamped on.
    pub fn commit(&mut self) -> Result<Option<Leave>, SitedeskError> {
        let mut owner = Fields::new();
        owner.insert("ownerId".to_string(), Value::from(self.owner_id));
        let saved = self.controller.commit_with(owner)?;
        debug!(owner_id = self.owner_id, "leave committed");
        Ok(saved)
    }
}

/// What the customer dashboard shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub greeting: String,
    pub site: String,
    pub leave_count: usize,
}

/// Summarize the dashboard for `actor`.
///
/// The site comes from the actor's own customer record: the session
/// snapshot for a Customer, or the email-joined record for a User.
pub fn dashboard(storage: &Storage, actor: &Actor) -> Result<DashboardSummary, SitedeskError> {
    let customers = storage.collection::<Customer>()?;
    let site_id = match actor {
        Actor::Customer(c) => c.site_id,
        Actor::User(_) => owner_id_for(actor, &customers)
            .and_then(|id| customers.get(id))
            .and_then(|c| c.site_id),
    };
    let sites = storage.collection::<Site>()?;
    let site = RelationResolver::new(&sites).label(site_id, NO_SITE_ASSIGNED, |s| s.name.clone());

    let leave_count = match owner_id_for(actor, &customers) {
        Some(owner_id) => list_by_owner(&storage.collection()?, owner_id).len(),
        None => 0,
    };

    Ok(DashboardSummary {
        greeting: format!("Welcome, {}", actor.display_name()),
        site,
        leave_count,
    })
}
