//! Mailing run orchestration.
//!
//! A run has two phases, each optional:
//!
//! 1. **Envelopes**: render one envelope image per party, upload it and tag
//!    it with the party title.
//! 2. **Emails**: for each party this sender is responsible for, draft (and
//!    optionally send) one invitation per contactable guest, then record the
//!    party as `EmailSent`.
//!
//! Parties are processed one at a time in store order. A failure for one
//! party or guest is logged with the party id and title and never stops the
//! rest of the batch. Nothing is retried.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, error, info};

use crate::api::MailProvider;
use crate::envelope::{find_envelope, EnvelopeRenderer};
use crate::models::{EmailAddress, Party, RsvpStage};
use crate::render::{encode_message, InvitationTemplates};
use crate::storage::{object_key, ObjectStorage};
use crate::store::PartyStore;

/// Tag key attached to uploaded envelopes.
const PARTY_TAG: &str = "party";

/// Which parties a run touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Only(Vec<String>),
}

impl Selection {
    /// An empty id list selects every party. Repeated ids are dropped, keeping
    /// first-seen order, so a party is never mailed twice in one run.
    pub fn from_ids(ids: Vec<String>) -> Self {
        if ids.is_empty() {
            return Selection::All;
        }
        let mut unique: Vec<String> = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        Selection::Only(unique)
    }
}

pub struct EnvelopeJob<'a> {
    pub renderer: &'a dyn EnvelopeRenderer,
    pub storage: &'a dyn ObjectStorage,
    /// Where rendered images are kept.
    pub output_dir: PathBuf,
    pub bucket: String,
    pub prefix: String,
}

pub struct EmailJob<'a> {
    pub mail: &'a dyn MailProvider,
    pub templates: InvitationTemplates,
    /// Only parties whose inviter is this address are mailed.
    pub sender: EmailAddress,
    /// Send drafts right away instead of leaving them for review.
    pub send: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnvelopeReport {
    pub uploaded: usize,
    /// Ids of parties whose envelope could not be rendered or uploaded.
    pub failed: Vec<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MailingReport {
    pub drafts_created: usize,
    pub drafts_sent: usize,
    pub failures: usize,
    pub skipped_other_inviter: usize,
    pub skipped_already_invited: usize,
    /// Parties whose stage advance was written to the store.
    pub recorded: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub envelopes: Option<EnvelopeReport>,
    pub emails: Option<MailingReport>,
}

pub struct Mailer<'a> {
    store: &'a dyn PartyStore,
    selection: Selection,
}

impl<'a> Mailer<'a> {
    pub fn new(store: &'a dyn PartyStore, selection: Selection) -> Self {
        Self { store, selection }
    }

    /// Run the envelope phase, then the email phase; `None` skips a phase.
    pub async fn run(
        &self,
        envelopes: Option<EnvelopeJob<'_>>,
        emails: Option<EmailJob<'_>>,
    ) -> Result<RunReport> {
        let mut report = RunReport::default();

        match envelopes {
            Some(job) => {
                let envelopes = self.create_envelopes(&job).await?;
                info!(
                    uploaded = envelopes.uploaded,
                    failed = envelopes.failed.len(),
                    "Envelope phase finished"
                );
                report.envelopes = Some(envelopes);
            }
            None => info!("Skipping envelopes"),
        }

        match emails {
            Some(job) => {
                let emails = self.create_emails(&job).await?;
                info!(
                    drafts = emails.drafts_created,
                    sent = emails.drafts_sent,
                    failures = emails.failures,
                    recorded = emails.recorded,
                    "Email phase finished"
                );
                report.emails = Some(emails);
            }
            None => info!("Skipping emails"),
        }

        Ok(report)
    }

    /// Fetch the selected parties.
    ///
    /// With an explicit id list only those ids are requested from the store;
    /// an id that cannot be fetched is logged and skipped.
    pub async fn load_parties(&self) -> Result<Vec<Party>> {
        match &self.selection {
            Selection::All => self
                .store
                .get_all()
                .await
                .context("Failed to load parties"),
            Selection::Only(ids) => {
                let mut parties = Vec::with_capacity(ids.len());
                for id in ids {
                    match self.store.get(id).await {
                        Ok(party) => parties.push(party),
                        Err(e) => error!(party_id = %id, error = %format!("{e:#}"), "Failed to load party"),
                    }
                }
                Ok(parties)
            }
        }
    }

    pub async fn create_envelopes(&self, job: &EnvelopeJob<'_>) -> Result<EnvelopeReport> {
        let mut report = EnvelopeReport::default();

        for party in self.load_parties().await? {
            match self.create_envelope(job, &party).await {
                Ok(key) => {
                    info!(party_id = %party.id, title = %party.title, key = %key, "Uploaded envelope");
                    report.uploaded += 1;
                }
                Err(e) => {
                    error!(
                        party_id = %party.id,
                        title = %party.title,
                        error = %format!("{e:#}"),
                        "Failed to create envelope"
                    );
                    report.failed.push(party.id);
                }
            }
        }

        Ok(report)
    }

    async fn create_envelope(&self, job: &EnvelopeJob<'_>, party: &Party) -> Result<String> {
        job.renderer
            .render(std::slice::from_ref(party), &job.output_dir)
            .await
            .context("Envelope renderer failed")?;

        let path = find_envelope(&job.output_dir, &party.id)?
            .ok_or_else(|| anyhow::anyhow!("Renderer produced no image for party"))?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow::anyhow!("Envelope file name is not valid UTF-8"))?;
        let key = object_key(&job.prefix, file_name);

        job.storage.upload(&path, &job.bucket, &key).await?;
        job.storage
            .tag(&job.bucket, &key, PARTY_TAG, &party.title)
            .await?;
        Ok(key)
    }

    pub async fn create_emails(&self, job: &EmailJob<'_>) -> Result<MailingReport> {
        let mut report = MailingReport::default();

        for party in self.load_parties().await? {
            if party.inviter != job.sender {
                debug!(party_id = %party.id, title = %party.title, inviter = %party.inviter, "Party belongs to another inviter");
                report.skipped_other_inviter += 1;
                continue;
            }
            if party.is_invited() {
                info!(party_id = %party.id, title = %party.title, stage = %party.rsvp_stage, "Party already invited");
                report.skipped_already_invited += 1;
                continue;
            }

            self.mail_party(job, &party, &mut report).await;

            let recorded = self
                .store
                .modify(&party.id, &|stored: &mut Party| {
                    stored.advance_to(RsvpStage::EmailSent);
                })
                .await;
            match recorded {
                Ok(_) => report.recorded += 1,
                Err(e) => error!(
                    party_id = %party.id,
                    title = %party.title,
                    error = %format!("{e:#}"),
                    "Failed to record invitation stage"
                ),
            }
        }

        Ok(report)
    }

    async fn mail_party(&self, job: &EmailJob<'_>, party: &Party, report: &mut MailingReport) {
        for rendered in job.templates.build_invitations(party) {
            let invitation = match rendered {
                Ok(invitation) => invitation,
                Err(e) => {
                    error!(party_id = %party.id, title = %party.title, error = %e, "Failed to render invitation");
                    report.failures += 1;
                    continue;
                }
            };

            let raw = encode_message(&job.sender, &invitation);
            let draft = match job.mail.create_draft(&raw).await {
                Ok(draft) => draft,
                Err(e) => {
                    error!(
                        party_id = %party.id,
                        title = %party.title,
                        recipient = %invitation.recipient,
                        error = %format!("{e:#}"),
                        "Failed to create draft"
                    );
                    report.failures += 1;
                    continue;
                }
            };
            report.drafts_created += 1;
            info!(party_id = %party.id, title = %party.title, recipient = %invitation.recipient, draft = %draft, "Created draft");

            if job.send {
                match job.mail.send(&draft).await {
                    Ok(()) => report.drafts_sent += 1,
                    Err(e) => {
                        error!(
                            party_id = %party.id,
                            title = %party.title,
                            recipient = %invitation.recipient,
                            draft = %draft,
                            error = %format!("{e:#}"),
                            "Failed to send draft"
                        );
                        report.failures += 1;
                    }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
