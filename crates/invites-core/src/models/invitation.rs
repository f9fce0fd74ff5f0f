use super::EmailAddress;

/// A rendered invitation email for a single guest.
///
/// Rebuilt from the party and templates on every mailing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invitation {
    pub recipient: EmailAddress,
    pub subject: String,
    pub message: String,
}
