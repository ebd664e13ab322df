// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sitedesk site|customer|role|leave` command implementations.
//!
//! Each entity contributes a clap field group, the columns of its list
//! table, and nothing else; listing, dialogs, and deletion run through one
//! [`run_action`] over a [`CrudController`].

use clap::Args;
use serde_json::Value;
use sitedesk_core::{Customer, Leave, Record, Role, Site, SitedeskError};
use sitedesk_crud::{CrudController, FormDraft, LeaveBook};
use sitedesk_storage::{KeyedStore, NO_SITE, RelationResolver};

use crate::output::Output;

/// Paging and search flags shared by every `list` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Case-insensitive substring to match against any field.
    #[arg(long, short)]
    pub search: Option<String>,

    /// Page to show, starting at 1.
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page; must be one of the configured options.
    #[arg(long)]
    pub page_size: Option<usize>,
}

/// A screen action with its typed field group.
#[derive(Debug)]
pub enum Action<F> {
    List(ListArgs),
    Add(F),
    Edit(u64, F),
    Delete(u64),
}

/// A flag group that writes the values the user supplied into a draft.
pub trait Patch {
    fn apply<T>(&self, draft: &mut FormDraft<T>);
}

/// Sets each supplied flag; absent flags leave the draft value alone.
fn set_present<T>(draft: &mut FormDraft<T>, pairs: &[(&str, &Option<String>)]) {
    for (field, value) in pairs {
        if let Some(value) = value {
            draft.set(*field, value.as_str());
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct SiteFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub image: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub postal_code: Option<String>,
}

impl Patch for SiteFields {
    fn apply<T>(&self, draft: &mut FormDraft<T>) {
        set_present(
            draft,
            &[
                ("name", &self.name),
                ("image", &self.image),
                ("address", &self.address),
                ("city", &self.city),
                ("state", &self.state),
                ("country", &self.country),
                ("postalCode", &self.postal_code),
            ],
        );
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct CustomerFields {
    #[arg(long)]
    pub full_name: Option<String>,
    /// Site id; pass an empty string to unassign.
    #[arg(long)]
    pub site: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub image: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub role: Option<String>,
    #[arg(long)]
    pub current_location: Option<String>,
    /// Defaults to the configured customer password on add.
    #[arg(long)]
    pub password: Option<String>,
}

impl Patch for CustomerFields {
    fn apply<T>(&self, draft: &mut FormDraft<T>) {
        set_present(
            draft,
            &[
                ("fullName", &self.full_name),
                ("siteId", &self.site),
                ("email", &self.email),
                ("phone", &self.phone),
                ("image", &self.image),
                ("address", &self.address),
                ("city", &self.city),
                ("state", &self.state),
                ("country", &self.country),
                ("role", &self.role),
                ("currentLocation", &self.current_location),
                ("password", &self.password),
            ],
        );
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct RoleFields {
    #[arg(long)]
    pub name: Option<String>,
    /// Menu to grant; repeat for several. Replaces the current set on edit.
    #[arg(long = "menu")]
    pub menus: Vec<String>,
}

impl Patch for RoleFields {
    fn apply<T>(&self, draft: &mut FormDraft<T>) {
        set_present(draft, &[("name", &self.name)]);
        if !self.menus.is_empty() {
            let menus: Vec<Value> = self.menus.iter().map(|m| Value::from(m.as_str())).collect();
            draft.set("menus", menus);
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct LeaveFields {
    /// Leave type, e.g. Sick or Casual.
    #[arg(long = "type")]
    pub kind: Option<String>,
    #[arg(long)]
    pub start_date: Option<String>,
    #[arg(long)]
    pub end_date: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
}

impl Patch for LeaveFields {
    fn apply<T>(&self, draft: &mut FormDraft<T>) {
        set_present(
            draft,
            &[
                ("type", &self.kind),
                ("startDate", &self.start_date),
                ("endDate", &self.end_date),
                ("description", &self.description),
            ],
        );
    }
}

/// How a record shows up in its list table.
pub trait Screen: Record {
    const NOUN: &'static str;
    const TITLE: &'static str;
    const HEADERS: &'static [&'static str];

    fn cells(&self, sites: &RelationResolver<'_, Site>) -> Vec<String>;
}

impl Screen for Site {
    const NOUN: &'static str = "site";
    const TITLE: &'static str = "Sites";
    const HEADERS: &'static [&'static str] =
        &["ID", "Name", "Address", "City", "State", "Country", "Postal Code"];

    fn cells(&self, _: &RelationResolver<'_, Site>) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.address.clone(),
            self.city.clone(),
            self.state.clone(),
            self.country.clone(),
            self.postal_code.clone(),
        ]
    }
}

impl Screen for Customer {
    const NOUN: &'static str = "customer";
    const TITLE: &'static str = "Customers";
    const HEADERS: &'static [&'static str] =
        &["ID", "Full Name", "Site", "Email", "Phone", "City", "Role"];

    fn cells(&self, sites: &RelationResolver<'_, Site>) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.full_name.clone(),
            sites.label(self.site_id, NO_SITE, |s| s.name.clone()),
            self.email.clone(),
            self.phone.clone(),
            self.city.clone(),
            self.role.clone(),
        ]
    }
}

impl Screen for Role {
    const NOUN: &'static str = "role";
    const TITLE: &'static str = "Roles";
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Menus"];

    fn cells(&self, _: &RelationResolver<'_, Site>) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone(), self.menus.join(", ")]
    }
}

impl Screen for Leave {
    const NOUN: &'static str = "leave";
    const TITLE: &'static str = "Leaves";
    const HEADERS: &'static [&'static str] = &["ID", "Type", "Start", "End", "Description"];

    fn cells(&self, _: &RelationResolver<'_, Site>) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.kind.clone(),
            self.start_date.clone(),
            self.end_date.clone(),
            self.description.clone(),
        ]
    }
}

/// Something that owns a controller and knows how to save its dialog.
pub trait Desk<T: Record> {
    fn controller(&mut self) -> &mut CrudController<T>;
    fn save(&mut self) -> Result<Option<T>, SitedeskError>;
}

impl<T: Record> Desk<T> for CrudController<T> {
    fn controller(&mut self) -> &mut CrudController<T> {
        self
    }

    fn save(&mut self) -> Result<Option<T>, SitedeskError> {
        self.commit()
    }
}

impl Desk<Leave> for LeaveBook {
    fn controller(&mut self) -> &mut CrudController<Leave> {
        self.controller_mut()
    }

    fn save(&mut self) -> Result<Option<Leave>, SitedeskError> {
        self.commit()
    }
}

/// Render the current page of `controller` as table rows.
pub fn page_rows<T: Screen>(
    controller: &CrudController<T>,
    sites: &KeyedStore<Site>,
) -> Vec<Vec<String>> {
    let resolver = RelationResolver::new(sites);
    controller
        .view()
        .rows
        .iter()
        .map(|record| record.cells(&resolver))
        .collect()
}

/// Run one screen action against `desk`.
pub fn run_action<T, F, D>(
    desk: &mut D,
    action: Action<F>,
    sites: &KeyedStore<Site>,
    out: &Output,
) -> Result<(), SitedeskError>
where
    T: Screen,
    F: Patch,
    D: Desk<T>,
{
    match action {
        Action::List(args) => {
            let controller = desk.controller();
            if let Some(size) = args.page_size {
                controller.set_page_size(size)?;
            }
            if let Some(term) = args.search {
                controller.set_search(term);
            }
            controller.set_page(args.page.saturating_sub(1));

            let controller = &*controller;
            let view = controller.view();
            out.header(T::TITLE);
            out.table(T::HEADERS, &page_rows(controller, sites));
            out.page_footer(view.page, view.page_size, view.total);
        }
        Action::Add(fields) => {
            fields.apply(desk.controller().begin_create()?);
            if let Some(saved) = desk.save()? {
                out.success(&format!("Added {} {}", T::NOUN, saved.id()));
            }
        }
        Action::Edit(id, fields) => {
            let Some(draft) = desk.controller().begin_edit(id)? else {
                out.info(&format!("No {} with id {id}", T::NOUN));
                return Ok(());
            };
            fields.apply(draft);
            match desk.save()? {
                Some(saved) => out.success(&format!("Updated {} {}", T::NOUN, saved.id())),
                None => out.info(&format!("No {} with id {id}", T::NOUN)),
            }
        }
        Action::Delete(id) => {
            if desk.controller().delete(id)? {
                out.success(&format!("Deleted {} {id}", T::NOUN));
            } else {
                out.info(&format!("No {} with id {id}", T::NOUN));
            }
        }
    }
    Ok(())
}
