use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Local part: dot-separated runs of alphanumerics, `_`, `+` and `-`.
/// Domain: dot-separated DNS labels ending in an alphabetic TLD.
const EMAIL_PATTERN: &str =
    r"^([_a-z0-9+-]+(?:\.[_a-z0-9+-]+)*)@([a-z0-9-]+(?:\.[a-z0-9-]+)*\.[a-z]{2,})$";

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0} is not a valid email address")]
pub struct InvalidEmail(pub String);

/// An email address split into its two halves.
///
/// Addresses are lowercased when parsed, so equality is case-insensitive with
/// respect to the original input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress {
    pub username: String,
    pub hostname: String,
}

impl EmailAddress {
    pub fn new(username: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            hostname: hostname.into(),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, InvalidEmail> {
        let lowered = raw.trim().to_lowercase();
        let captures = email_re()
            .captures(&lowered)
            .ok_or_else(|| InvalidEmail(raw.to_string()))?;
        Ok(Self::new(&captures[1], &captures[2]))
    }

    /// Parse an optional spreadsheet cell: empty means no address.
    pub fn parse_optional(raw: Option<&str>) -> Result<Option<Self>, InvalidEmail> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => Self::parse(value).map(Some),
        }
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.username, self.hostname)
    }
}

impl FromStr for EmailAddress {
    type Err = InvalidEmail;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
