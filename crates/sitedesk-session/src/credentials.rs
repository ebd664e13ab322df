// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id password hashing for stored user credentials.
//!
//! Encoded form: `argon2id$m=<KiB>,t=<iterations>,p=<lanes>$<salt-hex>$<hash-hex>`.
//! Parameters travel with the hash so changing `[security]` only affects
//! newly hashed passwords.

use ring::rand::{SecureRandom, SystemRandom};
use secrecy::{ExposeSecret, SecretString};
use sitedesk_config::model::SecurityConfig;
use sitedesk_core::SitedeskError;
use tracing::warn;
use zeroize::Zeroizing;

const SCHEME: &str = "argon2id";
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub memory_cost: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl From<&SecurityConfig> for KdfParams {
    fn from(config: &SecurityConfig) -> Self {
        Self {
            memory_cost: config.kdf_memory_cost,
            iterations: config.kdf_iterations,
            parallelism: config.kdf_parallelism,
        }
    }
}

fn derive(
    password: &[u8],
    salt: &[u8],
    params: &KdfParams,
) -> Result<Zeroizing<[u8; HASH_LEN]>, SitedeskError> {
    let argon_params = argon2::Params::new(
        params.memory_cost,
        params.iterations,
        params.parallelism,
        Some(HASH_LEN),
    )
    .map_err(|e| SitedeskError::Internal(format!("invalid Argon2id parameters: {e}")))?;

    let argon2 = argon2::Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon_params,
    );

    let mut output = Zeroizing::new([0u8; HASH_LEN]);
    argon2
        .hash_password_into(password, salt, output.as_mut())
        .map_err(|e| SitedeskError::Internal(format!("Argon2id derivation failed: {e}")))?;
    Ok(output)
}

/// Generate a random 16-byte salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN], SitedeskError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)
        .map_err(|_| SitedeskError::Internal("failed to generate random salt".to_string()))?;
    Ok(salt)
}

/// Hash `password` with a fresh salt and return the encoded form.
pub fn hash_password(password: &SecretString, params: &KdfParams) -> Result<String, SitedeskError> {
    let salt = generate_salt()?;
    let hash = derive(password.expose_secret().as_bytes(), &salt, params)?;
    Ok(format!(
        "{SCHEME}$m={},t={},p={}${}${}",
        params.memory_cost,
        params.iterations,
        params.parallelism,
        hex::encode(salt),
        hex::encode(hash.as_ref())
    ))
}

/// Whether `stored` is an encoded hash rather than a legacy plaintext value.
pub fn is_hashed(stored: &str) -> bool {
    stored.starts_with(SCHEME) && stored[SCHEME.len()..].starts_with('$')
}

/// Check `password` against a stored credential.
///
/// Legacy plaintext values are compared directly. A malformed encoded hash
/// never matches.
pub fn verify_password(password: &SecretString, stored: &str) -> Result<bool, SitedeskError> {
    let candidate = password.expose_secret().as_bytes();
    if !is_hashed(stored) {
        return Ok(constant_time_eq(candidate, stored.as_bytes()));
    }

    let Some((params, salt, expected)) = decode(stored) else {
        warn!("stored password hash is malformed");
        return Ok(false);
    };
    let actual = derive(candidate, &salt, &params)?;
    Ok(constant_time_eq(actual.as_ref(), &expected))
}

fn decode(stored: &str) -> Option<(KdfParams, Vec<u8>, Vec<u8>)> {
    let mut parts = stored.split('$');
    if parts.next()? != SCHEME {
        return None;
    }
    let params = parse_params(parts.next()?)?;
    let salt = hex::decode(parts.next()?).ok()?;
    let hash = hex::decode(parts.next()?).ok()?;
    if parts.next().is_some() || hash.len() != HASH_LEN {
        return None;
    }
    Some((params, salt, hash))
}

fn parse_params(segment: &str) -> Option<KdfParams> {
    let mut memory_cost = None;
    let mut iterations = None;
    let mut parallelism = None;
    for pair in segment.split(',') {
        let (name, value) = pair.split_once('=')?;
        let value: u32 = value.parse().ok()?;
        match name {
            "m" => memory_cost = Some(value),
            "t" => iterations = Some(value),
            "p" => parallelism = Some(value),
            _ => return None,
        }
    }
    Some(KdfParams {
        memory_cost: memory_cost?,
        iterations: iterations?,
        parallelism: parallelism?,
    })
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
