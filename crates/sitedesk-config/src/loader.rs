// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./sitedesk.toml` > `~/.config/sitedesk/sitedesk.toml`
//! > `/etc/sitedesk/sitedesk.toml`, with environment variable overrides via the
//! `SITEDESK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SitedeskConfig;

const LOCAL_CONFIG: &str = "sitedesk.toml";
const SYSTEM_CONFIG: &str = "/etc/sitedesk/sitedesk.toml";

/// Config sections, used to split `SITEDESK_SECTION_KEY` env vars.
const SECTIONS: [&str; 5] = ["app", "storage", "listing", "security", "defaults"];

/// Config files consulted by [`load_config`], lowest precedence first.
pub fn config_file_candidates() -> Vec<PathBuf> {
    let mut files = vec![PathBuf::from(SYSTEM_CONFIG)];
    if let Some(dir) = dirs::config_dir() {
        files.push(dir.join("sitedesk").join(LOCAL_CONFIG));
    }
    files.push(PathBuf::from(LOCAL_CONFIG));
    files
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/sitedesk/sitedesk.toml`
/// 3. `~/.config/sitedesk/sitedesk.toml`
/// 4. `./sitedesk.toml`
/// 5. `SITEDESK_*` environment variables
pub fn load_config() -> Result<SitedeskConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<SitedeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SitedeskConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SitedeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SitedeskConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used by [`load_config`] before extraction.
pub fn build_figment() -> Figment {
    config_file_candidates()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(SitedeskConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
        .merge(env_provider())
}

/// Map `SITEDESK_SECTION_KEY` to `section.key`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `SITEDESK_STORAGE_DATA_DIR` maps to `storage.data_dir`.
fn env_provider() -> Env {
    Env::prefixed("SITEDESK_").map(|key| {
        let key_str = key.as_str();
        SECTIONS
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or_else(|| key_str.to_string())
            .into()
    })
}
