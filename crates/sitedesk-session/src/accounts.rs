// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signup, login, and impersonation on top of [`SessionContext`].

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use sitedesk_config::model::SecurityConfig;
use sitedesk_core::rules::{is_blank, is_valid_email, is_valid_phone};
use sitedesk_core::types::CUSTOMER_ROLE;
use sitedesk_core::{Actor, Customer, Fields, SitedeskError, User, ValidationErrors};
use sitedesk_storage::{KeyedStore, Storage};
use tracing::{debug, info, warn};

use crate::SessionContext;
use crate::credentials::{KdfParams, hash_password, is_hashed, verify_password};

/// Message shown for any credential mismatch.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Self-registration input.
#[derive(Debug)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: SecretString,
}

/// Sign-in input.
#[derive(Debug)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
}

/// Account operations over the users and customers collections.
#[derive(Debug, Clone)]
pub struct Accounts {
    storage: Storage,
    session: SessionContext,
    security: SecurityConfig,
}

impl Accounts {
    pub fn new(storage: &Storage, security: &SecurityConfig) -> Self {
        Self {
            session: SessionContext::new(storage.backend().clone()),
            storage: storage.clone(),
            security: security.clone(),
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Register a new `customer` user, link it to a customer record, and
    /// sign it in.
    ///
    /// The customer record is written first and removed again if the user
    /// write fails, so a failed signup leaves neither behind.
    pub fn signup(&self, form: &SignupForm) -> Result<Actor, SitedeskError> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "firstName", &form.first_name, "First Name is required");
        require(&mut errors, "lastName", &form.last_name, "Last Name is required");
        check_email(&mut errors, &form.email);
        if is_blank(&form.phone) {
            errors.add("phone", "Phone is required");
        } else if !is_valid_phone(form.phone.trim()) {
            errors.add("phone", "Phone must be 10 digits starting with 6,7,8, or 9");
        }
        self.check_password(&mut errors, &form.password);

        let mut users = self.storage.collection::<User>()?;
        let email = form.email.trim();
        if find_by_email(&users, email).is_some() {
            errors.add("email", "Email already exists");
        }
        errors.into_result()?;

        let encoded = hash_password(&form.password, &KdfParams::from(&self.security))?;
        let draft = User {
            id: 0,
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            email: email.to_string(),
            password: encoded.clone(),
            phone: form.phone.trim().to_string(),
            role: CUSTOMER_ROLE.to_string(),
        };

        // A customer record staff already created for this email becomes the
        // account's own, so the email join always lands on one record.
        let mut customers = self.storage.collection::<Customer>()?;
        let (customer, created) = match find_customer_by_email(&customers, email) {
            Some(existing) => (existing.clone(), false),
            None => {
                let customer = customers.insert_record(&Customer {
                    full_name: draft.full_name(),
                    email: draft.email.clone(),
                    phone: draft.phone.clone(),
                    role: CUSTOMER_ROLE.to_string(),
                    password: encoded,
                    ..Default::default()
                })?;
                (customer, true)
            }
        };

        let user = match users.insert_record(&draft) {
            Ok(user) => user,
            Err(e) => {
                if created && let Err(undo) = customers.remove(customer.id) {
                    warn!(customer_id = customer.id, error = %undo, "failed to roll back customer record");
                }
                return Err(e);
            }
        };
        info!(
            user_id = user.id,
            customer_id = customer.id,
            linked_existing = !created,
            "account created"
        );

        let actor = Actor::User(user);
        self.session.sign_in(&actor)?;
        Ok(actor)
    }

    /// Check credentials against the users collection and sign in.
    ///
    /// A legacy plaintext credential is re-hashed on a successful match.
    pub fn login(&self, form: &LoginForm) -> Result<Actor, SitedeskError> {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, &form.email);
        self.check_password(&mut errors, &form.password);
        errors.into_result()?;

        let mut users = self.storage.collection::<User>()?;
        let Some(user) = find_by_email(&users, form.email.trim()).cloned() else {
            debug!("login for unknown email");
            return Err(SitedeskError::Auth(INVALID_CREDENTIALS.to_string()));
        };
        if !verify_password(&form.password, &user.password)? {
            debug!(user_id = user.id, "login password mismatch");
            return Err(SitedeskError::Auth(INVALID_CREDENTIALS.to_string()));
        }

        // Records from before ids were assigned all carry id 0 and cannot be
        // addressed individually.
        let user = if is_hashed(&user.password) || user.id == 0 {
            user
        } else {
            self.upgrade_legacy(&mut users, user, &form.password)?
        };

        let actor = Actor::User(user);
        self.session.sign_in(&actor)?;
        Ok(actor)
    }

    pub fn logout(&self) -> Result<(), SitedeskError> {
        self.session.sign_out()
    }

    /// Sign in a snapshot of a customer record on behalf of a staff actor.
    pub fn view_as_customer(&self, customer_id: u64) -> Result<Actor, SitedeskError> {
        let current = self.session.require()?;
        if current.is_customer() {
            return Err(SitedeskError::Auth(
                "customers cannot view other customers' dashboards".to_string(),
            ));
        }
        let customers = self.storage.collection::<Customer>()?;
        let customer = customers
            .get(customer_id)
            .cloned()
            .ok_or_else(|| SitedeskError::Session(format!("no customer with id {customer_id}")))?;
        info!(staff_id = current.id(), customer_id, "viewing as customer");
        let actor = Actor::Customer(customer);
        self.session.sign_in(&actor)?;
        Ok(actor)
    }

    fn check_password(&self, errors: &mut ValidationErrors, password: &SecretString) {
        let password = password.expose_secret();
        let min = self.security.min_password_length;
        if password.is_empty() {
            errors.add("password", "Password is required");
        } else if password.chars().count() < min {
            errors.add("password", format!("Password must be at least {min} characters"));
        }
    }

    fn upgrade_legacy(
        &self,
        users: &mut KeyedStore<User>,
        user: User,
        password: &SecretString,
    ) -> Result<User, SitedeskError> {
        let encoded = hash_password(password, &KdfParams::from(&self.security))?;
        let mut patch = Fields::new();
        patch.insert("password".to_string(), Value::String(encoded.clone()));
        match users.update(user.id, patch) {
            Ok(Some(updated)) => {
                info!(user_id = updated.id, "upgraded legacy plaintext credential");
                Ok(updated)
            }
            Ok(None) => Ok(User { password: encoded, ..user }),
            Err(e) => {
                // Sign-in still succeeds; the upgrade is retried next time.
                warn!(user_id = user.id, error = %e, "failed to upgrade legacy credential");
                Ok(user)
            }
        }
    }
}

/// The customer id that owns `actor`'s leaves.
///
/// A Customer owns its own; a User is joined to the customer record with
/// the same email.
pub fn owner_id_for(actor: &Actor, customers: &KeyedStore<Customer>) -> Option<u64> {
    match actor {
        Actor::Customer(c) => Some(c.id),
        Actor::User(u) => customers
            .iter()
            .find(|c| same_email(&c.email, &u.email))
            .map(|c| c.id),
    }
}

fn find_by_email<'a>(users: &'a KeyedStore<User>, email: &str) -> Option<&'a User> {
    users.iter().find(|u| same_email(&u.email, email))
}

fn find_customer_by_email<'a>(
    customers: &'a KeyedStore<Customer>,
    email: &str,
) -> Option<&'a Customer> {
    customers.iter().find(|c| same_email(&c.email, email))
}

fn same_email(a: &str, b: &str) -> bool {
    !is_blank(a) && a.trim().eq_ignore_ascii_case(b.trim())
}

fn require(errors: &mut ValidationErrors, field: &str, value: &str, message: &str) {
    if is_blank(value) {
        errors.add(field, message);
    }
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    if is_blank(email) {
        errors.add("email", "Email is required");
    } else if !is_valid_email(email.trim()) {
        errors.add("email", "Invalid email format");
    }
}
