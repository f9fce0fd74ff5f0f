use anyhow::{Context, Result};
use keyring::Entry;

use super::TokenStore;

const SERVICE_NAME: &str = "wedding-invites";

/// Stores access tokens in the OS keychain, one entry per sender address.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringTokenStore;

impl TokenStore for KeyringTokenStore {
    fn get(&self, user: &str) -> Result<Option<String>> {
        let entry = Entry::new(SERVICE_NAME, user).context("Failed to create keyring entry")?;
        match entry.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to retrieve token from keychain"),
        }
    }

    fn put(&self, user: &str, token: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, user).context("Failed to create keyring entry")?;
        entry
            .set_password(token)
            .context("Failed to store token in keychain")?;
        Ok(())
    }
}
