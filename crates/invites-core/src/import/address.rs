use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use super::ImportError;
use crate::models::EmailAddress;

/// One spreadsheet row as it appears on disk.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Email", default)]
    email: Option<String>,
    #[serde(rename = "First")]
    first: String,
    #[serde(rename = "Last")]
    last: String,
    #[serde(rename = "Local", default)]
    local: Option<String>,
    #[serde(rename = "Inviter")]
    inviter: String,
    #[serde(rename = "Warning", default)]
    warning: Option<String>,
}

/// Columns every guest file must carry; `Warning` may be left out.
const REQUIRED_COLUMNS: [&str; 6] = ["Title", "Email", "First", "Last", "Local", "Inviter"];

/// A validated guest row, ready for the party builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestRow {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<EmailAddress>,
    pub local: bool,
    pub inviter: String,
}

/// All rows sharing a title, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestGroup {
    pub title: String,
    pub rows: Vec<GuestRow>,
}

/// Spreadsheet booleans: only a case-insensitive "true" counts.
pub fn parse_bool(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true")
}

pub fn read_guest_file(path: &Path) -> Result<Vec<GuestGroup>, ImportError> {
    let file = File::open(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_guest_groups(file)
}

/// Parse CSV guest records and group them by title.
///
/// Groups keep the order in which their title first appears; rows keep file
/// order within a group.
pub fn read_guest_groups<R: Read>(reader: R) -> Result<Vec<GuestGroup>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers()?;
    if let Some(missing) = REQUIRED_COLUMNS
        .into_iter()
        .find(|column| !headers.iter().any(|header| header == *column))
    {
        return Err(ImportError::MissingColumn(missing));
    }

    let mut groups: Vec<GuestGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (i, result) in csv_reader.deserialize::<RawRecord>().enumerate() {
        let record = result?;
        // Header is line 1
        let row = i + 2;

        let email = EmailAddress::parse_optional(record.email.as_deref()).map_err(|source| {
            ImportError::InvalidEmail {
                row,
                title: record.title.clone(),
                source,
            }
        })?;

        if let Some(note) = record.warning.as_deref().map(str::trim).filter(|w| !w.is_empty()) {
            let guest_name = format!("{} {}", record.first, record.last);
            warn!(
                title = %record.title,
                guest = %guest_name.trim(),
                note,
                "Guest row carries a warning"
            );
        }

        let guest = GuestRow {
            first_name: record.first,
            last_name: record.last,
            email,
            local: record.local.as_deref().map(parse_bool).unwrap_or(false),
            inviter: record.inviter,
        };

        match index.get(&record.title) {
            Some(&slot) => groups[slot].rows.push(guest),
            None => {
                index.insert(record.title.clone(), groups.len());
                groups.push(GuestGroup {
                    title: record.title,
                    rows: vec![guest],
                });
            }
        }
    }

    debug!(parties = groups.len(), "Grouped guest records");
    Ok(groups)
}
