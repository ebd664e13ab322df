// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::SitedeskConfig;

/// Lowest Argon2id memory cost accepted, in KiB.
const MIN_KDF_MEMORY_COST: u32 = 8192;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &SitedeskConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.app.log_level.to_ascii_lowercase().as_str()) {
        fail(format!(
            "app.log_level `{}` must be one of {}",
            config.app.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.storage.data_dir.trim().is_empty() {
        fail("storage.data_dir must not be empty".to_string());
    }

    let listing = &config.listing;
    if listing.page_size == 0 {
        fail("listing.page_size must be at least 1".to_string());
    }
    if listing.page_size_options.contains(&0) {
        fail("listing.page_size_options must not contain 0".to_string());
    }
    if !listing.page_size_options.is_empty() && !listing.page_size_options.contains(&listing.page_size) {
        fail(format!(
            "listing.page_size {} is not one of listing.page_size_options {:?}",
            listing.page_size, listing.page_size_options
        ));
    }

    let security = &config.security;
    if security.kdf_memory_cost < MIN_KDF_MEMORY_COST {
        fail(format!(
            "security.kdf_memory_cost must be at least {MIN_KDF_MEMORY_COST} (8 MiB), got {}",
            security.kdf_memory_cost
        ));
    }
    if security.kdf_iterations < 1 {
        fail(format!(
            "security.kdf_iterations must be at least 1, got {}",
            security.kdf_iterations
        ));
    }
    if security.kdf_parallelism < 1 {
        fail(format!(
            "security.kdf_parallelism must be at least 1, got {}",
            security.kdf_parallelism
        ));
    }
    if security.min_password_length < 1 {
        fail("security.min_password_length must be at least 1".to_string());
    }

    if config.defaults.customer_password.is_empty() {
        fail("defaults.customer_password must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = SitedeskConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_data_dir_fails_validation() {
        let mut config = SitedeskConfig::default();
        config.storage.data_dir = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "data_dir"));
    }

    #[test]
    fn page_size_outside_options_fails_validation() {
        let mut config = SitedeskConfig::default();
        config.listing.page_size = 7;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "listing.page_size 7"));
    }

    #[test]
    fn zero_page_size_fails_validation() {
        let mut config = SitedeskConfig::default();
        config.listing.page_size = 0;
        config.listing.page_size_options = vec![];
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "at least 1"));
    }

    #[test]
    fn weak_kdf_parameters_are_all_reported() {
        let mut config = SitedeskConfig::default();
        config.security.kdf_memory_cost = 1024;
        config.security.kdf_iterations = 0;
        config.security.kdf_parallelism = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(has_message(&errors, "kdf_memory_cost"));
        assert!(has_message(&errors, "kdf_iterations"));
        assert!(has_message(&errors, "kdf_parallelism"));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = SitedeskConfig::default();
        config.app.log_level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "app.log_level"));
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = SitedeskConfig::default();
        config.storage.data_dir = "/tmp/sitedesk".to_string();
        config.listing.page_size = 25;
        config.security.kdf_memory_cost = 65536;
        config.app.log_level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
