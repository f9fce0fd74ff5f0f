//! Mail provider client.
//!
//! This module provides the `MailProvider` contract (create a draft from a raw
//! RFC-2822 message, send a draft) and `GmailClient`, its implementation over
//! the Gmail REST API with a bearer access token.

pub mod error;
pub mod gmail;

use anyhow::Result;
use async_trait::async_trait;

pub use error::ApiError;
pub use gmail::GmailClient;

/// Provider-side handle for a created draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftId(pub String);

impl std::fmt::Display for DraftId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[async_trait]
pub trait MailProvider: Send + Sync {
    /// `raw` is a base64url encoded RFC-2822 message.
    async fn create_draft(&self, raw: &str) -> Result<DraftId>;

    async fn send(&self, draft: &DraftId) -> Result<()>;
}
