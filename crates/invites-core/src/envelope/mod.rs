//! Envelope image rendering.
//!
//! Envelopes are produced by an external image tool from a template and a
//! JSON manifest of recipients, writing one image per party id into an output
//! directory.

pub mod gimp;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;

use crate::models::Party;

pub use gimp::GimpRenderer;

/// File extensions treated as rendered envelopes.
const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

#[async_trait]
pub trait EnvelopeRenderer: Send + Sync {
    /// Render one envelope per party into `output_dir`.
    ///
    /// A failure applies to the whole batch.
    async fn render(&self, parties: &[Party], output_dir: &Path) -> Result<()>;
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Recipient<'a> {
    pub title: &'a str,
    pub id: &'a str,
}

/// The renderer's input: `{"recipients": [{"title": ..., "id": ...}]}`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Manifest<'a> {
    pub recipients: Vec<Recipient<'a>>,
}

impl<'a> Manifest<'a> {
    pub fn new(parties: &'a [Party]) -> Self {
        Self {
            recipients: parties
                .iter()
                .map(|party| Recipient {
                    title: &party.title,
                    id: &party.id,
                })
                .collect(),
        }
    }
}

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

/// Locate the rendered image for `party_id` in `dir`.
pub fn find_envelope(dir: &Path, party_id: &str) -> Result<Option<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list envelope directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        let matches_id = path.file_stem().and_then(|stem| stem.to_str()) == Some(party_id);
        if matches_id && path.is_file() && is_image(&path) {
            return Ok(Some(path));
        }
    }
    Ok(None)
}
