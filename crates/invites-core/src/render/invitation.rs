use super::template::{expand_guest, expand_party, BodyTemplate, BodyValues};
use super::RenderError;
use crate::models::{Invitation, Party};

/// Subject line used for every invitation.
pub const INVITATION_SUBJECT: &str = "You're Invited to Our Wedding!";

/// The three templates an invitation is built from.
#[derive(Debug, Clone)]
pub struct InvitationTemplates {
    invitation_url: String,
    body: BodyTemplate,
    envelope_url: String,
}

impl InvitationTemplates {
    /// `invitation_url` may contain `{partyId}` and `{guestId}`;
    /// `envelope_url` may contain `{partyId}`.
    pub fn new(invitation_url: impl Into<String>, body: &str, envelope_url: impl Into<String>) -> Self {
        Self {
            invitation_url: invitation_url.into(),
            body: BodyTemplate::parse(body),
            envelope_url: envelope_url.into(),
        }
    }

    /// Render one invitation per guest with an email address, in guest order.
    ///
    /// Guests without an address are skipped. The rendered HTML has its CSS
    /// moved into inline `style` attributes.
    pub fn build_invitations<'a>(
        &'a self,
        party: &'a Party,
    ) -> impl Iterator<Item = Result<Invitation, RenderError>> + 'a {
        let party_url = expand_party(&self.invitation_url, &party.id);
        let envelope_url = expand_party(&self.envelope_url, &party.id);

        party.contactable_guests().map(move |(guest, email)| {
            let invitation_url = expand_guest(&party_url, &guest.id);
            let html = self.body.render(&BodyValues {
                party_name: &party.title,
                invitation_url: &invitation_url,
                envelope_url: &envelope_url,
            });

            Ok(Invitation {
                recipient: email.clone(),
                subject: INVITATION_SUBJECT.to_string(),
                message: css_inline::inline(&html)?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmailAddress, Guest, RsvpStage};

    fn guest(id: &str, email: Option<&str>) -> Guest {
        Guest {
            id: id.to_string(),
            first_name: id.to_string(),
            last_name: "Smith".to_string(),
            email: email.map(|e| EmailAddress::parse(e).unwrap()),
            attending: None,
            rideshare: None,
        }
    }

    fn party(guests: Vec<Guest>) -> Party {
        Party {
            id: "party/1".to_string(),
            title: "Smith Family".to_string(),
            local: true,
            guests,
            inviter: EmailAddress::new("host", "example.com"),
            rsvp_stage: RsvpStage::NotInvited,
        }
    }

    fn templates() -> InvitationTemplates {
        InvitationTemplates::new(
            "https://example.com/{partyId}/rsvp/{guestId}",
            r#"<html><head><style>p { color: red; }</style></head>
<body><p>Dear {{partyName}}</p><a href="{{rsvpUrl}}">RSVP</a><img src="{{envelopeUrl}}"></body></html>"#,
            "https://cdn.example.com/{partyId}.png",
        )
    }

    #[test]
    fn test_one_invitation_per_contactable_guest() {
        let party = party(vec![
            guest("ann", Some("ann@example.com")),
            guest("bob", None),
            guest("cat", Some("cat@example.com")),
        ]);
        let templates = templates();
        let invitations: Vec<Invitation> = templates
            .build_invitations(&party)
            .collect::<Result<_, _>>()
            .unwrap();

        let recipients: Vec<String> = invitations.iter().map(|i| i.recipient.to_string()).collect();
        assert_eq!(recipients, vec!["ann@example.com", "cat@example.com"]);
        assert!(invitations.iter().all(|i| i.subject == INVITATION_SUBJECT));
    }

    #[test]
    fn test_no_invitations_without_emails() {
        let party = party(vec![guest("bob", None)]);
        assert_eq!(templates().build_invitations(&party).count(), 0);
    }

    #[test]
    fn test_body_substitutes_party_and_guest_urls() {
        let party = party(vec![guest("ann", Some("ann@example.com"))]);
        let templates = templates();
        let invitation = templates.build_invitations(&party).next().unwrap().unwrap();

        assert!(invitation.message.contains("Dear Smith Family"));
        assert!(invitation
            .message
            .contains("https://example.com/party%2F1/rsvp/ann"));
        assert!(invitation
            .message
            .contains("https://cdn.example.com/party%2F1.png"));
    }

    #[test]
    fn test_css_is_inlined() {
        let party = party(vec![guest("ann", Some("ann@example.com"))]);
        let templates = templates();
        let invitation = templates.build_invitations(&party).next().unwrap().unwrap();

        assert!(!invitation.message.contains("<style>"));
        assert!(invitation.message.contains("<p style="));
        assert!(invitation.message.contains("red"));
    }
}
