//! Gmail drafts API client.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ApiError, DraftId, MailProvider};

/// Base URL for the Gmail users API
const GMAIL_BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1/users";

/// The authenticated user, as Gmail spells it
const GMAIL_USER_ID: &str = "me";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct RawMessage<'a> {
    raw: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateDraftRequest<'a> {
    message: RawMessage<'a>,
}

#[derive(Debug, Serialize)]
struct SendDraftRequest<'a> {
    id: &'a str,
}

#[derive(Debug, Deserialize)]
struct DraftResponse {
    id: String,
}

/// Gmail client acting as the holder of `token`.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct GmailClient {
    client: Client,
    token: String,
}

impl GmailClient {
    pub fn new(token: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, token })
    }

    fn drafts_url(&self) -> String {
        format!("{}/{}/drafts", GMAIL_BASE_URL, GMAIL_USER_ID)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }
}

#[async_trait]
impl MailProvider for GmailClient {
    async fn create_draft(&self, raw: &str) -> Result<DraftId> {
        let response = self
            .client
            .post(self.drafts_url())
            .bearer_auth(&self.token)
            .json(&CreateDraftRequest {
                message: RawMessage { raw },
            })
            .send()
            .await
            .map_err(ApiError::from)
            .context("Failed to send create-draft request")?;

        let response = Self::check_response(response).await?;
        let draft: DraftResponse = response
            .json()
            .await
            .context("Failed to parse create-draft response")?;

        debug!(draft = %draft.id, "Created draft");
        Ok(DraftId(draft.id))
    }

    async fn send(&self, draft: &DraftId) -> Result<()> {
        let url = format!("{}/send", self.drafts_url());
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&SendDraftRequest { id: &draft.0 })
            .send()
            .await
            .map_err(ApiError::from)
            .context("Failed to send draft-send request")?;

        Self::check_response(response).await?;
        debug!(draft = %draft, "Sent draft");
        Ok(())
    }
}
