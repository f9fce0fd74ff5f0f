use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use invites_core::EmailAddress;

#[derive(Debug, Parser)]
#[command(name = "invites", version, about = "Import guests and mail wedding invitations")]
pub struct Cli {
    /// Config file holding the inviter list (default: ~/.config/wedding-invites/config.json)
    #[arg(long, env = "INVITES_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Party store file (overrides the config file)
    #[arg(long, env = "PARTIES_FILE", global = true)]
    pub parties_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read the guest spreadsheet and store one record per party
    Import(ImportArgs),
    /// Render envelopes and create invitation emails
    Mail(MailArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// CSV with columns Title, Email, First, Last, Local, Inviter, Warning
    #[arg(long, default_value = "addresses.csv")]
    pub address_file: PathBuf,

    /// Also write the parties as JSON, one per line
    #[arg(long)]
    pub write_json: Option<PathBuf>,

    /// Do not write to the party store
    #[arg(long)]
    pub no_store: bool,
}

#[derive(Debug, Args)]
pub struct MailArgs {
    /// Invitation email body (mustache-style variables: partyName, rsvpUrl, envelopeUrl)
    #[arg(long, env = "TEMPLATE", default_value = "resources/template.html")]
    pub html_template: PathBuf,

    /// Invitation URL, with "{partyId}" and optionally "{guestId}" placeholders,
    /// e.g. "https://example.com/{partyId}/rsvp"
    #[arg(long, env = "RSVP_URL")]
    pub rsvp_url: Option<String>,

    /// Envelope image URL, with a "{partyId}" placeholder
    #[arg(long, env = "ENVELOPE_URL")]
    pub envelope_url: Option<String>,

    /// Address invitations are sent from
    #[arg(long, env = "SENDER")]
    pub sender: Option<EmailAddress>,

    #[arg(long, env = "GIMP_PATH", default_value = "/Applications/GIMP.app/Contents/MacOS/GIMP")]
    pub gimp_path: PathBuf,

    /// GIMP envelope template
    #[arg(long, env = "GIMP_TEMPLATE")]
    pub gimp_template: Option<PathBuf>,

    /// Directory rendered envelopes are written to
    #[arg(long, env = "ENVELOPE_DIR", default_value = "envelopes")]
    pub envelope_dir: PathBuf,

    /// S3 bucket envelopes are uploaded to
    #[arg(long, env = "ENVELOPE_BUCKET")]
    pub envelope_bucket: Option<String>,

    #[arg(long, env = "ENVELOPE_PREFIX", default_value = "envelopes")]
    pub envelope_prefix: String,

    /// Keep access tokens in this file instead of the OS keychain
    #[arg(long, env = "TOKEN_STORAGE_FILE")]
    pub token_storage_file: Option<PathBuf>,

    /// Restrict the run to this party id (repeatable)
    #[arg(long = "only", value_name = "PARTY_ID")]
    pub only: Vec<String>,

    /// Send drafts immediately
    #[arg(long)]
    pub send: bool,

    #[arg(long)]
    pub skip_envelopes: bool,

    #[arg(long)]
    pub skip_email: bool,
}
