// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Sitedesk.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Sitedesk configuration.
///
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SitedeskConfig {
    /// Application identity and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// Where collections are persisted.
    #[serde(default)]
    pub storage: StorageConfig,

    /// List screen pagination.
    #[serde(default)]
    pub listing: ListingConfig,

    /// Password hashing and credential rules.
    #[serde(default)]
    pub security: SecurityConfig,

    /// Values pre-filled into new drafts.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Application identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Display name shown in the CLI header.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_app_name() -> String {
    "sitedesk".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding one `<key>.json` file per slot.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Seed the default site and roles when their slots have never been written.
    #[serde(default = "default_seed_defaults")]
    pub seed_defaults: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            seed_defaults: default_seed_defaults(),
        }
    }
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("sitedesk"))
        .unwrap_or_else(|| std::path::PathBuf::from("sitedesk-data"))
        .to_string_lossy()
        .into_owned()
}

fn default_seed_defaults() -> bool {
    true
}

/// Pagination configuration for list screens.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ListingConfig {
    /// Rows per page when a screen opens.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Page sizes a screen may switch between.
    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<usize>,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            page_size_options: default_page_size_options(),
        }
    }
}

fn default_page_size() -> usize {
    5
}

fn default_page_size_options() -> Vec<usize> {
    vec![5, 10, 25]
}

/// Credential configuration.
///
/// Argon2id parameters used for stored user passwords. Defaults follow the
/// OWASP password-storage minimums.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityConfig {
    /// Argon2id memory cost in KiB (default: 19456 = 19 MiB).
    #[serde(default = "default_kdf_memory_cost")]
    pub kdf_memory_cost: u32,

    /// Argon2id iteration count (default: 2).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Argon2id parallelism lanes (default: 1).
    #[serde(default = "default_kdf_parallelism")]
    pub kdf_parallelism: u32,

    /// Minimum password length accepted at signup and login.
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            kdf_memory_cost: default_kdf_memory_cost(),
            kdf_iterations: default_kdf_iterations(),
            kdf_parallelism: default_kdf_parallelism(),
            min_password_length: default_min_password_length(),
        }
    }
}

fn default_kdf_memory_cost() -> u32 {
    19456
}

fn default_kdf_iterations() -> u32 {
    2
}

fn default_kdf_parallelism() -> u32 {
    1
}

fn default_min_password_length() -> usize {
    6
}

/// Draft defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Password placed in new customer drafts.
    #[serde(default = "default_customer_password")]
    pub customer_password: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            customer_password: default_customer_password(),
        }
    }
}

fn default_customer_password() -> String {
    "default123".to_string()
}
