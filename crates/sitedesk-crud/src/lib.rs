// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Management-screen logic for Sitedesk.
//!
//! [`CrudController`] drives list, search, pagination, and create/edit/delete
//! dialogs over any collection. [`schema`] declares each entity's form,
//! and [`LeaveBook`] scopes leave requests to their owning customer.

pub mod controller;
pub mod draft;
pub mod leaves;
pub mod page;
pub mod schema;
pub mod search;

pub use controller::{CrudController, DialogState, ListView};
pub use draft::{FieldKind, FieldRule, FieldSpec, FormDraft, FormSchema};
pub use leaves::{DashboardSummary, LeaveBook, dashboard, list_by_owner, resolve_owner};
pub use page::{Pager, last_page, paginate};
pub use search::{search, search_excluding};
