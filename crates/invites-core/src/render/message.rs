use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine as _;
use uuid::Uuid;

use crate::models::{EmailAddress, Invitation};

/// Shown by mail readers that cannot display the HTML part.
const PREAMBLE: &str = "Your mail reader does not support HTML. Please view this message in a browser-capable client.";

/// RFC 2045 limit for base64 body lines.
const BASE64_LINE_LENGTH: usize = 76;

/// Encode an invitation as the base64url RFC-2822 message the mail provider
/// expects in its `raw` field.
pub fn encode_message(sender: &EmailAddress, invitation: &Invitation) -> String {
    let boundary = format!("=_invite_{}", Uuid::new_v4().simple());
    URL_SAFE.encode(format_message(sender, invitation, &boundary))
}

/// Build a `multipart/mixed` message with a single HTML part.
pub fn format_message(sender: &EmailAddress, invitation: &Invitation, boundary: &str) -> String {
    let mut message = String::new();
    message.push_str(&format!("To: {}\r\n", invitation.recipient));
    message.push_str(&format!("From: {}\r\n", sender));
    message.push_str(&format!("Subject: {}\r\n", encode_header(&invitation.subject)));
    message.push_str("MIME-Version: 1.0\r\n");
    message.push_str(&format!(
        "Content-Type: multipart/mixed; boundary=\"{}\"\r\n",
        boundary
    ));
    message.push_str("\r\n");
    message.push_str(PREAMBLE);
    message.push_str("\r\n");

    message.push_str(&format!("--{}\r\n", boundary));
    message.push_str("Content-Type: text/html; charset=\"utf-8\"\r\n");
    message.push_str("Content-Transfer-Encoding: base64\r\n");
    message.push_str("\r\n");
    for line in wrap_ascii(&STANDARD.encode(invitation.message.as_bytes()), BASE64_LINE_LENGTH) {
        message.push_str(line);
        message.push_str("\r\n");
    }
    message.push_str(&format!("--{}--\r\n", boundary));
    message
}

/// Split ASCII text into lines of at most `width` bytes.
///
/// Every byte offset of an ASCII string is a char boundary, so slicing by
/// `width` cannot split a character.
fn wrap_ascii(text: &str, width: usize) -> impl Iterator<Item = &str> {
    debug_assert!(text.is_ascii());
    (0..text.len())
        .step_by(width)
        .map(move |start| &text[start..(start + width).min(text.len())])
}

/// RFC 2047 encoded-word for non-ASCII header values.
fn encode_header(value: &str) -> String {
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?utf-8?b?{}?=", STANDARD.encode(value.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invitation(subject: &str, message: &str) -> Invitation {
        Invitation {
            recipient: EmailAddress::new("ann", "example.com"),
            subject: subject.to_string(),
            message: message.to_string(),
        }
    }

    fn sender() -> EmailAddress {
        EmailAddress::new("host", "example.com")
    }

    #[test]
    fn test_format_message_headers() {
        let message = format_message(&sender(), &invitation("Hello", "<p>Hi</p>"), "BOUNDARY");
        assert!(message.starts_with("To: ann@example.com\r\nFrom: host@example.com\r\nSubject: Hello\r\n"));
        assert!(message.contains("Content-Type: multipart/mixed; boundary=\"BOUNDARY\"\r\n"));
        assert!(message.contains("--BOUNDARY\r\nContent-Type: text/html; charset=\"utf-8\"\r\n"));
        assert!(message.ends_with("--BOUNDARY--\r\n"));
    }

    #[test]
    fn test_format_message_body_is_base64() {
        let message = format_message(&sender(), &invitation("Hello", "<p>Hi</p>"), "B");
        assert!(message.contains(&STANDARD.encode("<p>Hi</p>")));
    }

    #[test]
    fn test_long_body_lines_are_wrapped() {
        let html = "x".repeat(500);
        let message = format_message(&sender(), &invitation("Hello", &html), "B");
        assert!(message.split("\r\n").all(|line| line.len() <= BASE64_LINE_LENGTH.max(PREAMBLE.len())));
    }

    #[test]
    fn test_wrapped_body_decodes_to_original() {
        let html = "<p>Fête à la plage</p>".repeat(20);
        let message = format_message(&sender(), &invitation("Hello", &html), "B");
        let body: String = message
            .split("\r\n")
            .skip_while(|line| !line.starts_with("Content-Transfer-Encoding"))
            .skip(2)
            .take_while(|line| !line.starts_with("--B"))
            .collect();
        assert_eq!(String::from_utf8(STANDARD.decode(body).unwrap()).unwrap(), html);
    }

    #[test]
    fn test_wrap_ascii() {
        let lines: Vec<&str> = wrap_ascii("abcdefg", 3).collect();
        assert_eq!(lines, vec!["abc", "def", "g"]);
        assert_eq!(wrap_ascii("", 3).count(), 0);
    }

    #[test]
    fn test_non_ascii_subject_is_encoded() {
        assert_eq!(encode_header("Plain"), "Plain");
        assert_eq!(encode_header("Fête"), format!("=?utf-8?b?{}?=", STANDARD.encode("Fête")));
    }

    #[test]
    fn test_encode_message_is_url_safe_base64() {
        let raw = encode_message(&sender(), &invitation("Hello", "<p>Hi</p>"));
        assert!(!raw.contains('+') && !raw.contains('/'));
        let decoded = String::from_utf8(URL_SAFE.decode(raw).unwrap()).unwrap();
        assert!(decoded.starts_with("To: ann@example.com\r\n"));
    }
}
