//! Mail-provider access tokens.
//!
//! This module provides:
//! - `TokenStore`: the get/put contract for cached tokens, keyed by sender
//! - `KeyringTokenStore`: tokens kept in the OS keychain via keyring
//! - `TokenFile`: tokens kept in a JSON file, expiring after 55 minutes
//!
//! Obtaining a fresh token is left to the caller.

pub mod credentials;
pub mod tokens;

use anyhow::Result;

pub use credentials::KeyringTokenStore;
pub use tokens::TokenFile;

pub trait TokenStore {
    /// A usable token for `user`, if one is stored.
    fn get(&self, user: &str) -> Result<Option<String>>;

    fn put(&self, user: &str, token: &str) -> Result<()>;
}
