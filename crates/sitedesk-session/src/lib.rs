// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication and the signed-in actor for Sitedesk.
//!
//! [`SessionContext`] owns the `currentUser` slot. [`Accounts`] implements
//! signup and login over the users collection, hashing credentials with
//! Argon2id (see [`credentials`]).

pub mod accounts;
pub mod context;
pub mod credentials;

pub use accounts::{Accounts, INVALID_CREDENTIALS, LoginForm, SignupForm, owner_id_for};
pub use context::SessionContext;
pub use credentials::KdfParams;
