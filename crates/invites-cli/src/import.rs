use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use invites_core::import::{read_guest_file, PartyBuilder};
use invites_core::store::PartyStore;
use invites_core::{Config, Party};

use crate::cli::ImportArgs;

pub async fn run(config: &Config, store: &dyn PartyStore, args: &ImportArgs) -> Result<()> {
    let directory = config.inviter_directory()?;
    let groups = read_guest_file(&args.address_file)?;
    let parties: Vec<Party> = PartyBuilder::new(&directory).build(groups).collect();

    let guests: usize = parties.iter().map(|party| party.guests.len()).sum();
    info!(parties = parties.len(), guests, file = %args.address_file.display(), "Parsed guest list");

    if let Some(ref path) = args.write_json {
        write_party_json(path, &parties)?;
        info!(path = %path.display(), "Wrote party JSON");
    }

    if args.no_store {
        info!("Not writing to the party store");
    } else {
        store.put_all(&parties).await.context("Failed to store parties")?;
        info!(parties = parties.len(), "Stored parties");
    }
    Ok(())
}

/// One JSON document per line.
fn write_party_json(path: &Path, parties: &[Party]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for party in parties {
        serde_json::to_writer(&mut out, party)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
