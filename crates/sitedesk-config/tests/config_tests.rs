// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Sitedesk configuration system.

use sitedesk_config::diagnostic::{ConfigError, suggest_key};
use sitedesk_config::model::SitedeskConfig;
use sitedesk_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_sitedesk_config() {
    let toml = r#"
[app]
name = "branch-office"
log_level = "debug"

[storage]
data_dir = "/tmp/sitedesk-test"
seed_defaults = false

[listing]
page_size = 10
page_size_options = [10, 20]

[security]
kdf_memory_cost = 8192
kdf_iterations = 1
kdf_parallelism = 1
min_password_length = 8

[defaults]
customer_password = "changeme1"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.app.name, "branch-office");
    assert_eq!(config.app.log_level, "debug");
    assert_eq!(config.storage.data_dir, "/tmp/sitedesk-test");
    assert!(!config.storage.seed_defaults);
    assert_eq!(config.listing.page_size, 10);
    assert_eq!(config.listing.page_size_options, vec![10, 20]);
    assert_eq!(config.security.kdf_memory_cost, 8192);
    assert_eq!(config.security.min_password_length, 8);
    assert_eq!(config.defaults.customer_password, "changeme1");
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.app.name, "sitedesk");
    assert_eq!(config.app.log_level, "info");
    assert!(
        config.storage.data_dir.ends_with("sitedesk") || config.storage.data_dir == "sitedesk-data",
        "unexpected default data_dir: {}",
        config.storage.data_dir
    );
    assert!(config.storage.seed_defaults);
    assert_eq!(config.listing.page_size, 5);
    assert_eq!(config.listing.page_size_options, vec![5, 10, 25]);
    assert_eq!(config.security.kdf_iterations, 2);
    assert_eq!(config.security.min_password_length, 6);
    assert_eq!(config.defaults.customer_password, "default123");
}

/// Unknown field in [storage] is rejected.
#[test]
fn unknown_field_in_storage_produces_error() {
    let toml = r#"
[storage]
dta_dir = "/tmp"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("dta_dir"),
        "error should mention the unknown field, got: {err_str}"
    );
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[network]
port = 8080
"#;

    assert!(load_config_from_str(toml).is_err());
}

/// `SITEDESK_STORAGE_DATA_DIR` maps to `storage.data_dir`, not `storage.data.dir`.
#[test]
fn env_var_overrides_split_on_section_only() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("custom.toml", "[listing]\npage_size = 10\n")?;
        jail.set_env("SITEDESK_STORAGE_DATA_DIR", "/var/lib/sitedesk");
        jail.set_env("SITEDESK_SECURITY_MIN_PASSWORD_LENGTH", "9");

        let config = sitedesk_config::load_config_from_path(std::path::Path::new("custom.toml"))
            .expect("config should load");
        assert_eq!(config.storage.data_dir, "/var/lib/sitedesk");
        assert_eq!(config.security.min_password_length, 9);
        assert_eq!(config.listing.page_size, 10);
        Ok(())
    });
}

/// A local `sitedesk.toml` is picked up by the layered loader.
#[test]
fn local_config_file_is_layered() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("sitedesk.toml", "[app]\nname = \"from-local\"\n")?;
        let config = sitedesk_config::load_config().expect("config should load");
        assert_eq!(config.app.name, "from-local");
        Ok(())
    });
}

/// Unknown key in a section produces a suggestion and the section's valid keys.
#[test]
fn diagnostic_error_includes_unknown_key_and_suggestion() {
    let toml = r#"
[listing]
page_sise = 10
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "page_sise"
                && suggestion.as_deref() == Some("page_size")
                && valid_keys.contains("page_size_options")
        })
    });
    assert!(found, "expected UnknownKey for page_sise, got: {errors:?}");
}

/// Invalid type (string where number expected) produces an InvalidType diagnostic.
#[test]
fn diagnostic_invalid_type() {
    let toml = r#"
[listing]
page_size = "ten"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("page_size"))),
        "got: {errors:?}"
    );
}

/// Semantic validation runs after a successful parse.
#[test]
fn validation_catches_page_size_outside_options() {
    let toml = r#"
[listing]
page_size = 7
"#;

    let errors = load_and_validate_str(toml).expect_err("page size 7 is not an option");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("page_size"))
    ));
}

#[test]
fn diagnostic_suggestions() {
    assert_eq!(
        suggest_key("min_pasword_length", &["kdf_memory_cost", "min_password_length"]),
        Some("min_password_length".to_string())
    );
    assert_eq!(suggest_key("qqqq", &["name", "log_level"]), None);
}

/// ConfigError renders through miette with its help text.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "dta_dir".to_string(),
        suggestion: Some("data_dir".to_string()),
        valid_keys: "data_dir, seed_defaults".to_string(),
        span: None,
        src: None,
    };

    assert!(error.code().is_some());
    let help = error.help().expect("help text").to_string();
    assert!(help.contains("did you mean `data_dir`"), "got: {help}");

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render");
    assert!(buf.contains("dta_dir"));
}

/// Serialized defaults round-trip through TOML.
#[test]
fn defaults_roundtrip_through_toml() {
    let rendered = toml::to_string(&SitedeskConfig::default()).expect("serialize");
    let config = load_config_from_str(&rendered).expect("defaults should parse back");
    assert_eq!(config.listing.page_size, 5);
}
