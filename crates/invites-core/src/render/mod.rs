//! Invitation rendering.
//!
//! This module provides:
//! - URL template expansion for the `{partyId}` and `{guestId}` placeholders
//! - `BodyTemplate`: a mustache-style, variable-only HTML body template
//! - `InvitationTemplates`: one rendered `Invitation` per contactable guest
//! - `encode_message`: RFC-2822 encoding for the mail provider

pub mod invitation;
pub mod message;
pub mod template;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use invitation::{InvitationTemplates, INVITATION_SUBJECT};
pub use message::encode_message;
pub use template::{expand_guest, expand_party, BodyTemplate, BodyValues};

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template {} does not exist", path.display())]
    Missing { path: PathBuf },

    #[error("Failed to read template {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to inline CSS: {0}")]
    Inline(#[from] css_inline::InlineError),
}

/// Read a template file, reporting a missing file distinctly.
pub fn load_template(path: &Path) -> Result<String, TemplateError> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            TemplateError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            TemplateError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}
