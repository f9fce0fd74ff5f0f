use serde::{Deserialize, Serialize};

use super::EmailAddress;

/// Progress of a party through the invitation workflow.
///
/// Stages are ordered; a party only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum RsvpStage {
    #[default]
    NotInvited,
    EmailSent,
    EmailOpened,
    Submitted,
}

impl std::fmt::Display for RsvpStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RsvpStage::NotInvited => write!(f, "Not Invited"),
            RsvpStage::EmailSent => write!(f, "Email Sent"),
            RsvpStage::EmailOpened => write!(f, "Email Opened"),
            RsvpStage::Submitted => write!(f, "Submitted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<EmailAddress>,
    /// Unset until the guest answers the RSVP form.
    #[serde(default)]
    pub attending: Option<bool>,
    #[serde(default)]
    pub rideshare: Option<bool>,
}

impl Guest {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub id: String,
    pub title: String,
    pub local: bool,
    pub guests: Vec<Guest>,
    pub inviter: EmailAddress,
    #[serde(default)]
    pub rsvp_stage: RsvpStage,
}

impl Party {
    /// Guests that can be reached by email, in party order.
    pub fn contactable_guests(&self) -> impl Iterator<Item = (&Guest, &EmailAddress)> {
        self.guests
            .iter()
            .filter_map(|guest| guest.email.as_ref().map(|email| (guest, email)))
    }

    /// Move the party forward to `target`.
    ///
    /// Returns `false` without changing anything if the party is already at or
    /// past `target`.
    pub fn advance_to(&mut self, target: RsvpStage) -> bool {
        if self.rsvp_stage >= target {
            return false;
        }
        self.rsvp_stage = target;
        true
    }

    pub fn is_invited(&self) -> bool {
        self.rsvp_stage >= RsvpStage::EmailSent
    }
}
