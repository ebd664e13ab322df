// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Sitedesk integration tests.
//!
//! # Components
//!
//! - [`TestHarness`] - temp data directory, cheap KDF settings, and account helpers
//! - [`FlakyBackend`] - in-memory backend whose writes can be made to fail

pub mod flaky_backend;
pub mod harness;

pub use flaky_backend::FlakyBackend;
pub use harness::{TestHarness, TestHarnessBuilder};
