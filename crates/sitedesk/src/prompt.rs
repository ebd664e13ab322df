// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password acquisition via TTY prompt or `SITEDESK_PASSWORD`.

use secrecy::SecretString;
use sitedesk_core::SitedeskError;

/// The environment variable consulted before prompting.
pub const PASSWORD_ENV_VAR: &str = "SITEDESK_PASSWORD";

/// Get a password from the environment or an interactive prompt.
///
/// Priority:
/// 1. `SITEDESK_PASSWORD` (for scripts)
/// 2. Interactive TTY prompt via `rpassword`
pub fn read_password(label: &str) -> Result<SecretString, SitedeskError> {
    if let Ok(value) = std::env::var(PASSWORD_ENV_VAR)
        && !value.is_empty()
    {
        return Ok(SecretString::from(value));
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        eprint!("{label}: ");
        let password = rpassword::read_password()
            .map_err(|e| SitedeskError::Internal(format!("failed to read password: {e}")))?;
        return Ok(SecretString::from(password));
    }

    Err(SitedeskError::Auth(format!(
        "No password provided. Set {PASSWORD_ENV_VAR} or run interactively."
    )))
}
