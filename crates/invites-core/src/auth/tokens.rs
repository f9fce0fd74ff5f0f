use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::TokenStore;

/// Access tokens are issued for an hour; stop using them a little early.
const TOKEN_LIFETIME_MINUTES: i64 = 55;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    saved_at: DateTime<Utc>,
}

impl StoredToken {
    fn is_expired(&self) -> bool {
        Utc::now() > self.saved_at + Duration::minutes(TOKEN_LIFETIME_MINUTES)
    }
}

/// Stores access tokens in a JSON file keyed by sender address.
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> Result<BTreeMap<String, StoredToken>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .context("Failed to read token storage file")?;
        serde_json::from_str(&contents).context("Failed to parse token storage file")
    }
}

impl TokenStore for TokenFile {
    fn get(&self, user: &str) -> Result<Option<String>> {
        match self.load()?.remove(user) {
            Some(stored) if stored.is_expired() => {
                debug!(user, "Stored token has expired");
                Ok(None)
            }
            Some(stored) => Ok(Some(stored.token)),
            None => Ok(None),
        }
    }

    fn put(&self, user: &str, token: &str) -> Result<()> {
        let mut tokens = self.load()?;
        tokens.insert(
            user.to_string(),
            StoredToken {
                token: token.to_string(),
                saved_at: Utc::now(),
            },
        );
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&tokens)?;
        std::fs::write(&self.path, contents).context("Failed to write token storage file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_has_no_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenFile::new(dir.path().join("tokens.json"));
        assert_eq!(store.get("me@example.com").unwrap(), None);
    }

    #[test]
    fn test_put_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenFile::new(dir.path().join("secrets").join("tokens.json"));
        store.put("me@example.com", "abc").unwrap();
        store.put("you@example.com", "xyz").unwrap();

        assert_eq!(store.get("me@example.com").unwrap().as_deref(), Some("abc"));
        assert_eq!(store.get("you@example.com").unwrap().as_deref(), Some("xyz"));
        assert_eq!(store.get("other@example.com").unwrap(), None);
    }

    #[test]
    fn test_expired_token_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        let saved_at = Utc::now() - Duration::minutes(TOKEN_LIFETIME_MINUTES + 1);
        let json = serde_json::json!({
            "me@example.com": { "token": "old", "saved_at": saved_at }
        });
        std::fs::write(&path, json.to_string()).unwrap();

        assert_eq!(TokenFile::new(path).get("me@example.com").unwrap(), None);
    }
}
