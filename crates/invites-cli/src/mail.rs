use anyhow::{bail, Context, Result};
use tracing::info;

use invites_core::api::GmailClient;
use invites_core::auth::{KeyringTokenStore, TokenFile, TokenStore};
use invites_core::envelope::GimpRenderer;
use invites_core::mailing::{EmailJob, EnvelopeJob, Mailer, Selection};
use invites_core::render::{load_template, InvitationTemplates};
use invites_core::storage::S3Storage;
use invites_core::store::PartyStore;
use invites_core::EmailAddress;

use crate::cli::MailArgs;

pub async fn run(store: &dyn PartyStore, args: &MailArgs) -> Result<()> {
    // Validate every flag before touching a remote service
    let email_settings = if args.skip_email {
        None
    } else {
        Some(email_settings(args)?)
    };
    let envelope_settings = if args.skip_envelopes {
        None
    } else {
        Some(envelope_settings(args)?)
    };

    let envelope_tools = match envelope_settings {
        Some((template, bucket)) => Some((
            GimpRenderer::new(args.gimp_path.clone(), template),
            S3Storage::from_env().await,
            bucket,
        )),
        None => None,
    };
    let envelope_job = envelope_tools
        .as_ref()
        .map(|(renderer, storage, bucket)| EnvelopeJob {
            renderer,
            storage,
            output_dir: args.envelope_dir.clone(),
            bucket: bucket.clone(),
            prefix: args.envelope_prefix.clone(),
        });

    let gmail = match email_settings {
        Some((ref sender, _)) => Some(GmailClient::new(access_token(args, sender)?)?),
        None => None,
    };
    let email_job = match (gmail.as_ref(), email_settings) {
        (Some(mail), Some((sender, templates))) => Some(EmailJob {
            mail,
            templates,
            sender,
            send: args.send,
        }),
        _ => None,
    };

    let selection = Selection::from_ids(args.only.clone());
    Mailer::new(store, selection)
        .run(envelope_job, email_job)
        .await?;
    Ok(())
}

fn email_settings(args: &MailArgs) -> Result<(EmailAddress, InvitationTemplates)> {
    let Some(ref sender) = args.sender else {
        bail!("--sender is required unless --skip-email is given");
    };
    let Some(ref rsvp_url) = args.rsvp_url else {
        bail!("--rsvp-url is required unless --skip-email is given");
    };
    let Some(ref envelope_url) = args.envelope_url else {
        bail!("--envelope-url is required unless --skip-email is given");
    };
    let body = load_template(&args.html_template)?;
    Ok((
        sender.clone(),
        InvitationTemplates::new(rsvp_url.clone(), &body, envelope_url.clone()),
    ))
}

fn envelope_settings(args: &MailArgs) -> Result<(std::path::PathBuf, String)> {
    let Some(ref template) = args.gimp_template else {
        bail!("--gimp-template is required unless --skip-envelopes is given");
    };
    if !template.is_file() {
        bail!("Envelope template {} does not exist", template.display());
    }
    let Some(ref bucket) = args.envelope_bucket else {
        bail!("--envelope-bucket is required unless --skip-envelopes is given");
    };
    Ok((template.clone(), bucket.clone()))
}

/// A stored access token for `sender`, or one pasted in by the operator.
fn access_token(args: &MailArgs, sender: &EmailAddress) -> Result<String> {
    let store: Box<dyn TokenStore> = match args.token_storage_file {
        Some(ref path) => Box::new(TokenFile::new(path.clone())),
        None => Box::new(KeyringTokenStore),
    };

    let user = sender.to_string();
    if let Some(token) = store.get(&user)? {
        return Ok(token);
    }

    eprintln!("No stored Gmail access token for {user}.");
    eprintln!("Create one with the https://www.googleapis.com/auth/gmail.compose scope and paste it below.");
    let token = rpassword::prompt_password("Access token: ").context("Failed to read access token")?;
    let token = token.trim();
    if token.is_empty() {
        bail!("No access token given");
    }

    store.put(&user, token)?;
    info!(user = %user, "Saved access token");
    Ok(token.to_string())
}
