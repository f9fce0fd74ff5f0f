//! Data models for the invitation pipeline.
//!
//! - `EmailAddress`: a validated, lowercase-normalized address
//! - `Party`, `Guest`: the persisted household records
//! - `RsvpStage`: a party's progress through the mailing workflow
//! - `Invitation`: one rendered email, derived per run and never stored

pub mod email;
pub mod invitation;
pub mod party;

pub use email::{EmailAddress, InvalidEmail};
pub use invitation::Invitation;
pub use party::{Guest, Party, RsvpStage};
