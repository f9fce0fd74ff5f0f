use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{PartyStore, StoreError};
use crate::models::Party;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    parties: Vec<Party>,
    updated_at: DateTime<Utc>,
}

/// Party store backed by a single JSON file.
///
/// Every call reads the file; writes rewrite it whole. The mutex serializes
/// read-modify-write within this process.
pub struct JsonPartyStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonPartyStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create store directory {}", parent.display()))?;
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<Party>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read party store {}", self.path.display()))?;
        let file: StoreFile = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse party store {}", self.path.display()))?;
        Ok(file.parties)
    }

    fn save(&self, parties: Vec<Party>) -> Result<()> {
        let file = StoreFile {
            parties,
            updated_at: Utc::now(),
        };
        let contents = serde_json::to_string_pretty(&file)?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write party store {}", self.path.display()))?;
        debug!(path = %self.path.display(), parties = file.parties.len(), "Saved party store");
        Ok(())
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        // The guarded unit carries no state, so a poisoned lock is still usable.
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl PartyStore for JsonPartyStore {
    async fn get(&self, id: &str) -> Result<Party> {
        let _guard = self.guard();
        self.load()?
            .into_iter()
            .find(|party| party.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()).into())
    }

    async fn get_all(&self) -> Result<Vec<Party>> {
        let _guard = self.guard();
        self.load()
    }

    async fn put_all(&self, parties: &[Party]) -> Result<()> {
        let _guard = self.guard();
        let mut stored = self.load()?;
        for party in parties {
            match stored.iter_mut().find(|existing| existing.id == party.id) {
                Some(existing) => *existing = party.clone(),
                None => stored.push(party.clone()),
            }
        }
        self.save(stored)
    }

    async fn modify(
        &self,
        id: &str,
        update: &(dyn for<'p> Fn(&'p mut Party) + Send + Sync),
    ) -> Result<Party> {
        let _guard = self.guard();
        let mut stored = self.load()?;
        let party = stored
            .iter_mut()
            .find(|party| party.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        update(party);
        let updated = party.clone();
        self.save(stored)?;
        Ok(updated)
    }
}
