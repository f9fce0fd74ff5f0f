//! Core library for the wedding invitation mailer.
//!
//! The pipeline runs in two batch jobs driven by the `invites` binary:
//!
//! 1. **Import**: read the guest spreadsheet, group rows into parties, assign
//!    identifiers and store the parties.
//! 2. **Mail**: render one envelope image per party and upload it, then draft
//!    (and optionally send) one HTML invitation per guest with an email
//!    address, recording each party's progress in the store.
//!
//! External services (party store, mail provider, image renderer, object
//! storage, credential storage) sit behind traits so the orchestrator can be
//! exercised with in-memory fakes.

pub mod api;
pub mod auth;
pub mod config;
pub mod envelope;
pub mod import;
pub mod mailing;
pub mod models;
pub mod render;
pub mod storage;
pub mod store;

pub use config::Config;
pub use models::{EmailAddress, Guest, Invitation, Party, RsvpStage};
