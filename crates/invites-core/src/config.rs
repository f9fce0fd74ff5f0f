//! Application configuration management.
//!
//! The configuration holds the inviter directory (who sends invitations for
//! which parties) and where the party store lives.
//!
//! Configuration is stored at `~/.config/wedding-invites/config.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::import::InviterDirectory;
use crate::models::{EmailAddress, InvalidEmail};

/// Application name used for config/data directory paths
const APP_NAME: &str = "wedding-invites";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Party store file name
const STORE_FILE: &str = "parties.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No inviters configured")]
    NoInviters,

    #[error("Default inviter {0} is not in the inviter list")]
    UnknownDefaultInviter(String),

    #[error("Inviter {name}: {source}")]
    InvalidInviter {
        name: String,
        #[source]
        source: InvalidEmail,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviterConfig {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub inviters: Vec<InviterConfig>,
    pub default_inviter: Option<String>,
    pub store_path: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// The configured store path, or the default under the user data dir.
    pub fn store_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.store_path {
            return Ok(path.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME).join(STORE_FILE))
    }

    pub fn inviter_directory(&self) -> Result<InviterDirectory, ConfigError> {
        let entries = self
            .inviters
            .iter()
            .map(|inviter| {
                EmailAddress::parse(&inviter.email)
                    .map(|address| (inviter.name.trim().to_string(), address))
                    .map_err(|source| ConfigError::InvalidInviter {
                        name: inviter.name.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let directory = InviterDirectory::new(entries)?;
        match self.default_inviter {
            Some(ref name) => directory.with_default(name),
            None => Ok(directory),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            inviters: vec![
                InviterConfig {
                    name: "Jesse".to_string(),
                    email: "Jesse@Example.com".to_string(),
                },
                InviterConfig {
                    name: "Jenny".to_string(),
                    email: "jenny@example.com".to_string(),
                },
            ],
            default_inviter: Some("Jenny".to_string()),
            store_path: None,
        }
    }

    #[test]
    fn test_inviter_directory_from_config() {
        let directory = config().inviter_directory().unwrap();
        assert_eq!(
            directory.lookup("Jesse"),
            Some(&EmailAddress::new("jesse", "example.com"))
        );
        assert_eq!(directory.fallback().0, "Jenny");
    }

    #[test]
    fn test_invalid_inviter_email_is_rejected() {
        let mut config = config();
        config.inviters[1].email = "jenny at example".to_string();
        assert!(matches!(
            config.inviter_directory(),
            Err(ConfigError::InvalidInviter { name, .. }) if name == "Jenny"
        ));
    }

    #[test]
    fn test_empty_config_has_no_inviters() {
        assert!(matches!(
            Config::default().inviter_directory(),
            Err(ConfigError::NoInviters)
        ));
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("missing.json")).unwrap();
        assert!(config.inviters.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"inviters":[{"name":"Jesse","email":"jesse@example.com"}],
                "store_path":"/tmp/parties.json"}"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.inviters.len(), 1);
        assert_eq!(config.default_inviter, None);
        assert_eq!(config.store_path().unwrap(), PathBuf::from("/tmp/parties.json"));
    }
}
