//! Party persistence.
//!
//! This module provides the `PartyStore` contract the import and mailing jobs
//! use, keyed by party id, and `JsonPartyStore`, a local JSON-file backend.
//! Read-modify-write is not atomic across processes; only one job is expected
//! to run at a time.

pub mod file;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::models::Party;

pub use file::JsonPartyStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Party not found: {0}")]
    NotFound(String),
}

#[async_trait]
pub trait PartyStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Party>;

    /// All parties, in the order they were first stored.
    async fn get_all(&self) -> Result<Vec<Party>>;

    /// Insert or replace parties by id.
    async fn put_all(&self, parties: &[Party]) -> Result<()>;

    /// Apply `update` to the stored party and write it back.
    async fn modify(
        &self,
        id: &str,
        update: &(dyn for<'p> Fn(&'p mut Party) + Send + Sync),
    ) -> Result<Party>;
}
