//! Guest list import.
//!
//! This module provides:
//! - `read_guest_file` / `read_guest_groups`: parse the guest spreadsheet and
//!   group rows into households by their `Title` column
//! - `PartyBuilder`: turn grouped rows into `Party` records with fresh ids and
//!   a resolved inviter
//!
//! A malformed email address aborts the import; ambiguous inviter data only
//! produces a warning.

pub mod address;
pub mod builder;

use std::path::PathBuf;

use thiserror::Error;

use crate::models::InvalidEmail;

pub use address::{read_guest_file, read_guest_groups, GuestGroup, GuestRow};
pub use builder::{InviterDirectory, PartyBuilder};

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("row {row} ({title}): {source}")]
    InvalidEmail {
        row: usize,
        title: String,
        #[source]
        source: InvalidEmail,
    },

    #[error("Failed to read guest file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Guest file is missing required column {0}")]
    MissingColumn(&'static str),

    #[error("Malformed guest file: {0}")]
    Csv(#[from] csv::Error),
}
