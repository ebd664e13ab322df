// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field format rules shared by signup, login, and the management forms.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\S+@\S+$").unwrap());

static PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[6-9]\d{9}$").unwrap());

/// Something, an `@`, something; no whitespace anywhere.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// Ten digits starting with 6, 7, 8 or 9.
pub fn is_valid_phone(value: &str) -> bool {
    PHONE.is_match(value)
}

/// Empty after trimming.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
