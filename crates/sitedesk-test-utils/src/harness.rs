// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` opens file-backed storage in a temp directory with KDF
//! costs lowered for speed, and offers helpers that create accounts the way
//! a user would.

use secrecy::SecretString;
use sitedesk_config::model::{SecurityConfig, SitedeskConfig, StorageConfig};
use sitedesk_core::{Actor, SitedeskError, User};
use sitedesk_session::{Accounts, SignupForm};
use sitedesk_storage::Storage;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    seed_defaults: bool,
    config: SitedeskConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            seed_defaults: false,
            config: SitedeskConfig::default(),
        }
    }

    /// Seed the default site and roles on open.
    pub fn seeded(mut self) -> Self {
        self.seed_defaults = true;
        self
    }

    /// Start from a custom configuration. Storage and KDF settings are
    /// still overridden by the harness.
    pub fn with_config(mut self, config: SitedeskConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the test harness, creating the temp data directory.
    pub fn build(self) -> Result<TestHarness, SitedeskError> {
        let temp_dir = tempfile::TempDir::new().map_err(SitedeskError::storage)?;

        let config = SitedeskConfig {
            storage: StorageConfig {
                data_dir: temp_dir.path().to_string_lossy().into_owned(),
                seed_defaults: self.seed_defaults,
            },
            security: SecurityConfig {
                kdf_memory_cost: 8192,
                kdf_iterations: 1,
                kdf_parallelism: 1,
                ..self.config.security.clone()
            },
            ..self.config
        };

        let storage = Storage::open(&config.storage)?;
        let accounts = Accounts::new(&storage, &config.security);

        Ok(TestHarness {
            config,
            storage,
            accounts,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment over a temp data directory.
pub struct TestHarness {
    /// Effective configuration; `storage.data_dir` points at the temp dir.
    pub config: SitedeskConfig,
    pub storage: Storage,
    pub accounts: Accounts,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub fn data_dir(&self) -> &str {
        &self.config.storage.data_dir
    }

    /// Sign up `first_name` with a derived email and phone; the new
    /// customer is left signed in.
    pub fn signup_customer(&self, first_name: &str) -> Result<Actor, SitedeskError> {
        self.accounts.signup(&SignupForm {
            first_name: first_name.to_string(),
            last_name: "Tester".to_string(),
            email: format!("{}@example.com", first_name.to_lowercase()),
            phone: "9876543210".to_string(),
            password: SecretString::from("password1".to_string()),
        })
    }

    /// Sign in a staff snapshot without going through the users collection.
    pub fn sign_in_admin(&self) -> Result<Actor, SitedeskError> {
        let admin = Actor::User(User {
            id: 0,
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
            email: "admin@example.com".to_string(),
            role: "admin".to_string(),
            ..Default::default()
        });
        self.accounts.session().sign_in(&admin)?;
        Ok(admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitedesk_core::{Customer, Landing, Site};

    #[test]
    fn builds_unseeded_by_default() {
        let harness = TestHarness::builder().build().unwrap();
        assert!(harness.storage.collection::<Site>().unwrap().is_empty());
        assert!(std::path::Path::new(harness.data_dir()).is_dir());
    }

    #[test]
    fn seeded_harness_has_default_site() {
        let harness = TestHarness::builder().seeded().build().unwrap();
        assert_eq!(harness.storage.collection::<Site>().unwrap().len(), 1);
    }

    #[test]
    fn signup_customer_creates_linked_records() {
        let harness = TestHarness::builder().build().unwrap();
        let actor = harness.signup_customer("Meera").unwrap();
        assert_eq!(actor.landing(), Landing::CustomerDashboard);
        assert_eq!(
            harness.storage.collection::<Customer>().unwrap().records()[0].email,
            "meera@example.com"
        );
    }

    #[test]
    fn admin_lands_on_dashboard() {
        let harness = TestHarness::builder().build().unwrap();
        harness.sign_in_admin().unwrap();
        let current = harness.accounts.session().require().unwrap();
        assert_eq!(current.landing(), Landing::Dashboard);
    }
}
