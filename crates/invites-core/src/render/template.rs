use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Placeholder replaced with the party id in URL templates.
pub const PARTY_ID_TOKEN: &str = "{partyId}";

/// Placeholder replaced with the guest id in URL templates.
pub const GUEST_ID_TOKEN: &str = "{guestId}";

/// Everything except RFC 3986 unreserved characters is escaped.
const ID_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode_id(id: &str) -> String {
    utf8_percent_encode(id, ID_ENCODE_SET).to_string()
}

pub fn expand_party(template: &str, party_id: &str) -> String {
    template.replace(PARTY_ID_TOKEN, &encode_id(party_id))
}

pub fn expand_guest(template: &str, guest_id: &str) -> String {
    template.replace(GUEST_ID_TOKEN, &encode_id(guest_id))
}

/// The variables a body template can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    PartyName,
    InvitationUrl,
    EnvelopeUrl,
}

impl Slot {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "partyName" => Some(Slot::PartyName),
            "rsvpUrl" | "invitationUrl" => Some(Slot::InvitationUrl),
            "envelopeUrl" => Some(Slot::EnvelopeUrl),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    /// `None` for names outside the fixed schema; they render empty.
    Var { slot: Option<Slot>, escape: bool },
}

/// Values substituted into a body template.
#[derive(Debug, Clone, Copy)]
pub struct BodyValues<'a> {
    pub party_name: &'a str,
    pub invitation_url: &'a str,
    pub envelope_url: &'a str,
}

impl BodyValues<'_> {
    fn get(&self, slot: Slot) -> &str {
        match slot {
            Slot::PartyName => self.party_name,
            Slot::InvitationUrl => self.invitation_url,
            Slot::EnvelopeUrl => self.envelope_url,
        }
    }
}

/// A parsed mustache-style template supporting variables only.
///
/// `{{name}}` is HTML-escaped, `{{{name}}}` and `{{& name}}` are inserted
/// verbatim, `{{! ...}}` is a comment. Section and partial tags are not
/// supported and render empty. An unclosed `{{` is kept as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyTemplate {
    segments: Vec<Segment>,
}

impl BodyTemplate {
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut rest = source;

        while let Some(start) = rest.find("{{") {
            let after = &rest[start + 2..];
            let closed = match after.strip_prefix('{') {
                Some(inner) => inner.find("}}}").map(|end| (&inner[..end], end + 4, true)),
                None => after.find("}}").map(|end| (&after[..end], end + 2, false)),
            };
            // An unclosed tag ends parsing; the remainder is literal text.
            let Some((tag, consumed, triple)) = closed else {
                break;
            };

            text.push_str(&rest[..start]);
            if !text.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut text)));
            }
            if let Some(segment) = parse_tag(tag, triple) {
                segments.push(segment);
            }
            rest = &after[consumed..];
        }

        text.push_str(rest);
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }
        Self { segments }
    }

    pub fn render(&self, values: &BodyValues<'_>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Var { slot: Some(slot), escape } => {
                    let value = values.get(*slot);
                    if *escape {
                        escape_html_into(value, &mut out);
                    } else {
                        out.push_str(value);
                    }
                }
                Segment::Var { slot: None, .. } => {}
            }
        }
        out
    }
}

fn parse_tag(tag: &str, triple: bool) -> Option<Segment> {
    let tag = tag.trim();
    if triple {
        return Some(Segment::Var {
            slot: Slot::from_name(tag),
            escape: false,
        });
    }
    if tag.starts_with('!') {
        return None;
    }
    let (name, escape) = match tag.strip_prefix('&') {
        Some(name) => (name.trim(), false),
        None => (tag, true),
    };
    Some(Segment::Var {
        slot: Slot::from_name(name),
        escape,
    })
}

fn escape_html_into(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
