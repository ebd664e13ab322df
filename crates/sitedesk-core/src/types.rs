// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entity types persisted by Sitedesk and the signed-in [`Actor`].
//!
//! Field names serialize in camelCase so the persisted JSON keeps the same
//! shape as slots written by earlier browser-based versions of the app.

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::traits::Record;

/// Storage key of the users collection.
pub const USERS_KEY: &str = "users";
/// Storage key of the customers collection.
pub const CUSTOMERS_KEY: &str = "customers";
/// Storage key of the sites collection.
pub const SITES_KEY: &str = "sites";
/// Storage key of the roles collection.
pub const ROLES_KEY: &str = "roles";
/// Storage key of the shared leaves collection.
pub const LEAVES_KEY: &str = "leaves";
/// Storage key of the session slot.
pub const CURRENT_USER_KEY: &str = "currentUser";

/// A physical site that customers can be assigned to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    #[serde(default)]
    pub id: u64,
    /// Data URI or URL. Treated as an opaque string.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub postal_code: String,
}

/// A customer business record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub image: Option<String>,
    pub full_name: String,
    /// Weak reference to [`Site::id`].
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub site_id: Option<u64>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub current_location: String,
    #[serde(default)]
    pub password: String,
}

/// A signup/login credential record.
///
/// `password` holds an encoded Argon2id hash, never the plaintext.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: u64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub role: String,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("phone", &self.phone)
            .field("role", &self.role)
            .finish()
    }
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A named set of menus a role grants access to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub menus: Vec<String>,
}

/// A leave request owned by one customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leave {
    #[serde(default)]
    pub id: u64,
    /// Owning [`Customer::id`].
    #[serde(default)]
    pub owner_id: u64,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub description: String,
}

impl Record for Site {
    const COLLECTION: &'static str = SITES_KEY;

    fn id(&self) -> u64 {
        self.id
    }
}

impl Record for Customer {
    const COLLECTION: &'static str = CUSTOMERS_KEY;

    fn id(&self) -> u64 {
        self.id
    }
}

impl Record for User {
    const COLLECTION: &'static str = USERS_KEY;

    fn id(&self) -> u64 {
        self.id
    }
}

impl Record for Role {
    const COLLECTION: &'static str = ROLES_KEY;

    fn id(&self) -> u64 {
        self.id
    }
}

impl Record for Leave {
    const COLLECTION: &'static str = LEAVES_KEY;

    fn id(&self) -> u64 {
        self.id
    }
}

/// The menu catalogue a role can grant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
pub enum Menu {
    Dashboard,
    Users,
    Sites,
    Roles,
    Reports,
    Settings,
}

/// Role name given to self-registered accounts.
pub const CUSTOMER_ROLE: &str = "customer";

/// The screen an actor lands on after sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Landing {
    #[strum(serialize = "dashboard")]
    Dashboard,
    #[strum(serialize = "customer-dashboard")]
    CustomerDashboard,
}

/// The authenticated actor held by the session slot.
///
/// Persisted untagged so the slot holds the bare record. A `Customer` is
/// recognised by its `fullName` field, a `User` by `firstName`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Actor {
    Customer(Customer),
    User(User),
}

impl Actor {
    pub fn id(&self) -> u64 {
        match self {
            Actor::Customer(c) => c.id,
            Actor::User(u) => u.id,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Actor::Customer(c) => &c.email,
            Actor::User(u) => &u.email,
        }
    }

    pub fn role(&self) -> &str {
        match self {
            Actor::Customer(c) => &c.role,
            Actor::User(u) => &u.role,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Actor::Customer(c) => c.full_name.clone(),
            Actor::User(u) => u.full_name(),
        }
    }

    /// Whether the actor's role is `customer` (case-insensitive).
    pub fn is_customer(&self) -> bool {
        self.role().eq_ignore_ascii_case(CUSTOMER_ROLE)
    }

    pub fn landing(&self) -> Landing {
        if self.is_customer() {
            Landing::CustomerDashboard
        } else {
            Landing::Dashboard
        }
    }
}

/// Accepts a number, a numeric string, an empty string, or null.
///
/// Select inputs hand back their value as a string, so older slots may hold
/// `"3"` where a number is expected.
fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
