// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sitedesk - site, customer, role, and leave management.
//!
//! This is the binary entry point. Every invocation opens the data
//! directory, runs one command against it, and exits.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod account;
mod output;
mod prompt;
mod screens;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sitedesk_config::model::SitedeskConfig;
use sitedesk_core::{Customer, Role, Site, SitedeskError};
use sitedesk_crud::{CrudController, LeaveBook, schema};
use sitedesk_session::Accounts;
use sitedesk_storage::Storage;
use tracing::debug;

use crate::output::Output;
use crate::screens::{
    Action, CustomerFields, LeaveFields, ListArgs, RoleFields, SiteFields, run_action,
};

/// Sitedesk - site, customer, role, and leave management.
#[derive(Parser, Debug)]
#[command(name = "sitedesk", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the default locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a customer account and sign in.
    Signup {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
    },
    /// Sign in with email and password.
    Login {
        #[arg(long)]
        email: String,
    },
    /// Clear the current session.
    Logout,
    /// Show who is signed in.
    Whoami,
    /// Show the customer dashboard of the signed-in actor.
    Dashboard,
    /// List the menus a role can grant.
    Menus,
    /// Manage sites.
    Site {
        #[command(subcommand)]
        action: SiteCommand,
    },
    /// Manage customers.
    Customer {
        #[command(subcommand)]
        action: CustomerCommand,
    },
    /// Manage roles.
    Role {
        #[command(subcommand)]
        action: RoleCommand,
    },
    /// Manage your leave requests.
    Leave {
        #[command(subcommand)]
        action: LeaveCommand,
    },
}

#[derive(Subcommand, Debug)]
enum SiteCommand {
    List(ListArgs),
    Add(SiteFields),
    Edit {
        id: u64,
        #[command(flatten)]
        fields: SiteFields,
    },
    Delete {
        id: u64,
    },
}

#[derive(Subcommand, Debug)]
enum CustomerCommand {
    List(ListArgs),
    Add(CustomerFields),
    Edit {
        id: u64,
        #[command(flatten)]
        fields: CustomerFields,
    },
    Delete {
        id: u64,
    },
    /// Switch the session to this customer's dashboard.
    View {
        id: u64,
    },
}

#[derive(Subcommand, Debug)]
enum RoleCommand {
    List(ListArgs),
    Add(RoleFields),
    Edit {
        id: u64,
        #[command(flatten)]
        fields: RoleFields,
    },
    Delete {
        id: u64,
    },
}

#[derive(Subcommand, Debug)]
enum LeaveCommand {
    List(ListArgs),
    Add(LeaveFields),
    Edit {
        id: u64,
        #[command(flatten)]
        fields: LeaveFields,
    },
    Delete {
        id: u64,
    },
}

impl From<SiteCommand> for Action<SiteFields> {
    fn from(command: SiteCommand) -> Self {
        match command {
            SiteCommand::List(args) => Action::List(args),
            SiteCommand::Add(fields) => Action::Add(fields),
            SiteCommand::Edit { id, fields } => Action::Edit(id, fields),
            SiteCommand::Delete { id } => Action::Delete(id),
        }
    }
}

impl From<RoleCommand> for Action<RoleFields> {
    fn from(command: RoleCommand) -> Self {
        match command {
            RoleCommand::List(args) => Action::List(args),
            RoleCommand::Add(fields) => Action::Add(fields),
            RoleCommand::Edit { id, fields } => Action::Edit(id, fields),
            RoleCommand::Delete { id } => Action::Delete(id),
        }
    }
}

impl From<LeaveCommand> for Action<LeaveFields> {
    fn from(command: LeaveCommand) -> Self {
        match command {
            LeaveCommand::List(args) => Action::List(args),
            LeaveCommand::Add(fields) => Action::Add(fields),
            LeaveCommand::Edit { id, fields } => Action::Edit(id, fields),
            LeaveCommand::Delete { id } => Action::Delete(id),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => sitedesk_config::load_and_validate_path(path),
        None => sitedesk_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            sitedesk_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    let out = Output::new(cli.plain);
    let Some(command) = cli.command else {
        out.info("sitedesk: use --help for available commands");
        return;
    };

    if let Err(e) = run(&config, command, &out) {
        out.error(&e);
        std::process::exit(1);
    }
}

fn run(config: &SitedeskConfig, command: Commands, out: &Output) -> Result<(), SitedeskError> {
    let storage = Storage::open(&config.storage)?;
    let accounts = Accounts::new(&storage, &config.security);
    debug!(data_dir = %config.storage.data_dir, "storage opened");

    match command {
        Commands::Signup {
            first_name,
            last_name,
            email,
            phone,
        } => account::run_signup(&accounts, first_name, last_name, email, phone, out),
        Commands::Login { email } => account::run_login(&accounts, email, out),
        Commands::Logout => account::run_logout(&accounts, out),
        Commands::Whoami => account::run_whoami(&accounts, out),
        Commands::Dashboard => account::run_dashboard(&storage, &accounts, out),
        Commands::Menus => account::run_menus(out),
        Commands::Site { action } => {
            account::require_staff(&accounts)?;
            let sites = storage.collection::<Site>()?;
            let mut controller =
                CrudController::new(storage.collection()?, schema::site(), &config.listing);
            run_action(&mut controller, Action::<SiteFields>::from(action), &sites, out)
        }
        Commands::Customer { action } => {
            account::require_staff(&accounts)?;
            let action = match action {
                CustomerCommand::View { id } => return account::run_view_as(&accounts, id, out),
                CustomerCommand::List(args) => Action::List(args),
                CustomerCommand::Add(fields) => Action::Add(fields),
                CustomerCommand::Edit { id, fields } => Action::Edit(id, fields),
                CustomerCommand::Delete { id } => Action::Delete(id),
            };
            let sites = storage.collection::<Site>()?;
            let mut controller = CrudController::<Customer>::new(
                storage.collection()?,
                schema::customer(&config.defaults),
                &config.listing,
            );
            run_action(&mut controller, action, &sites, out)
        }
        Commands::Role { action } => {
            account::require_staff(&accounts)?;
            let sites = storage.collection::<Site>()?;
            let mut controller =
                CrudController::<Role>::new(storage.collection()?, schema::role(), &config.listing);
            run_action(&mut controller, Action::<RoleFields>::from(action), &sites, out)
        }
        Commands::Leave { action } => {
            let actor = accounts.session().require()?;
            let sites = storage.collection::<Site>()?;
            let mut book = LeaveBook::for_actor(&storage, &actor, &config.listing)?;
            run_action(&mut book, Action::<LeaveFields>::from(action), &sites, out)
        }
    }
}

/// Initialize the tracing subscriber with the configured log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sitedesk={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        assert!(stats::allocated::read().unwrap() > 0);
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_site_edit_with_partial_fields() {
        let cli = Cli::parse_from(["sitedesk", "site", "edit", "3", "--city", "Nashik"]);
        let Some(Commands::Site {
            action: SiteCommand::Edit { id, fields },
        }) = cli.command
        else {
            panic!("expected site edit");
        };
        assert_eq!(id, 3);
        assert_eq!(fields.city.as_deref(), Some("Nashik"));
        assert!(fields.name.is_none());
    }

    #[test]
    fn parses_repeated_menus_and_global_plain() {
        let cli = Cli::parse_from([
            "sitedesk", "role", "add", "--name", "Auditor", "--menu", "Reports", "--menu",
            "Dashboard", "--plain",
        ]);
        assert!(cli.plain);
        let Some(Commands::Role {
            action: RoleCommand::Add(fields),
        }) = cli.command
        else {
            panic!("expected role add");
        };
        assert_eq!(fields.menus, ["Reports", "Dashboard"]);
    }

    #[test]
    fn list_page_defaults_to_first() {
        let cli = Cli::parse_from(["sitedesk", "leave", "list", "--search", "sick"]);
        let Some(Commands::Leave {
            action: LeaveCommand::List(args),
        }) = cli.command
        else {
            panic!("expected leave list");
        };
        assert_eq!(args.page, 1);
        assert_eq!(args.search.as_deref(), Some("sick"));
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = sitedesk_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.app.name, "sitedesk");
    }
}
