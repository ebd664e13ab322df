// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session commands: signup, login, logout, whoami, dashboard, view-as.

use sitedesk_core::{Actor, Menu, SitedeskError};
use sitedesk_crud::dashboard;
use sitedesk_session::{Accounts, LoginForm, SignupForm};
use sitedesk_storage::Storage;
use strum::IntoEnumIterator;

use crate::output::Output;
use crate::prompt::read_password;

pub fn run_signup(
    accounts: &Accounts,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    out: &Output,
) -> Result<(), SitedeskError> {
    let password = read_password("Password")?;
    let actor = accounts.signup(&SignupForm {
        first_name,
        last_name,
        email,
        phone,
        password,
    })?;
    out.success(&format!("Account created for {}", actor.email()));
    Ok(())
}

pub fn run_login(accounts: &Accounts, email: String, out: &Output) -> Result<(), SitedeskError> {
    let password = read_password("Password")?;
    let actor = accounts.login(&LoginForm { email, password })?;
    out.success(&format!("Signed in as {}", actor.display_name()));
    out.info(&format!("Landing: {}", actor.landing()));
    Ok(())
}

pub fn run_logout(accounts: &Accounts, out: &Output) -> Result<(), SitedeskError> {
    accounts.logout()?;
    out.success("Signed out");
    Ok(())
}

pub fn run_whoami(accounts: &Accounts, out: &Output) -> Result<(), SitedeskError> {
    match accounts.session().current()? {
        Some(actor) => {
            out.table(&["Name", "Email", "Role", "Landing"], &[whoami_row(&actor)]);
        }
        None => out.info("Not signed in"),
    }
    Ok(())
}

fn whoami_row(actor: &Actor) -> Vec<String> {
    vec![
        actor.display_name(),
        actor.email().to_string(),
        actor.role().to_string(),
        actor.landing().to_string(),
    ]
}

pub fn run_dashboard(
    storage: &Storage,
    accounts: &Accounts,
    out: &Output,
) -> Result<(), SitedeskError> {
    let actor = accounts.session().require()?;
    let summary = dashboard(storage, &actor)?;
    out.header(&summary.greeting);
    out.info(&format!("  Site:   {}", summary.site));
    out.info(&format!("  Leaves: {}", summary.leave_count));
    Ok(())
}

pub fn run_view_as(accounts: &Accounts, customer_id: u64, out: &Output) -> Result<(), SitedeskError> {
    let actor = accounts.view_as_customer(customer_id)?;
    out.success(&format!("Viewing as {}", actor.display_name()));
    Ok(())
}

/// The menus a role may be granted.
pub fn run_menus(out: &Output) -> Result<(), SitedeskError> {
    let rows: Vec<Vec<String>> = Menu::iter().map(|m| vec![m.to_string()]).collect();
    out.table(&["Menu"], &rows);
    Ok(())
}

/// The signed-in actor, refused when it is a customer.
pub fn require_staff(accounts: &Accounts) -> Result<Actor, SitedeskError> {
    let actor = accounts.session().require()?;
    if actor.is_customer() {
        return Err(SitedeskError::Auth(
            "this screen is available to staff only".to_string(),
        ));
    }
    Ok(actor)
}
