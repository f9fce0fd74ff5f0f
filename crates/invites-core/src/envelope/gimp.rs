use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use super::{EnvelopeRenderer, Manifest};
use crate::models::Party;

/// Name of the GIMP python-fu procedure that renders envelopes.
const PLUGIN_PROCEDURE: &str = "python-fu-invite-gen";

/// Runs GIMP in batch mode with the envelope plug-in.
pub struct GimpRenderer {
    gimp_path: PathBuf,
    template: PathBuf,
}

impl GimpRenderer {
    pub fn new(gimp_path: PathBuf, template: PathBuf) -> Self {
        Self {
            gimp_path,
            template,
        }
    }

    fn batch_script(&self, manifest: &Path, output_dir: &Path) -> String {
        format!(
            "({} RUN-NONINTERACTIVE \"{}\" \"{}\" \"{}\")",
            PLUGIN_PROCEDURE,
            self.template.display(),
            manifest.display(),
            output_dir.display()
        )
    }
}

#[async_trait]
impl EnvelopeRenderer for GimpRenderer {
    async fn render(&self, parties: &[Party], output_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;

        let scratch = tempfile::tempdir().context("Failed to create manifest directory")?;
        let manifest_path = scratch.path().join("recipients.json");
        let manifest = serde_json::to_string(&Manifest::new(parties))?;
        std::fs::write(&manifest_path, manifest).context("Failed to write recipients manifest")?;

        let script = self.batch_script(&manifest_path, output_dir);
        debug!(gimp = %self.gimp_path.display(), script = %script, "Running envelope renderer");

        let status = Command::new(&self.gimp_path)
            .arg("--no-interface")
            .arg("--batch")
            .arg(&script)
            .arg("--batch")
            .arg("(gimp-quit 1)")
            .status()
            .await
            .with_context(|| format!("Failed to start {}", self.gimp_path.display()))?;

        if !status.success() {
            bail!("Envelope renderer exited with {}", status);
        }
        info!(count = parties.len(), "Rendered envelopes");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_script() {
        let renderer = GimpRenderer::new(PathBuf::from("gimp"), PathBuf::from("/t/envelope.xcf"));
        assert_eq!(
            renderer.batch_script(Path::new("/tmp/recipients.json"), Path::new("/out")),
            r#"(python-fu-invite-gen RUN-NONINTERACTIVE "/t/envelope.xcf" "/tmp/recipients.json" "/out")"#
        );
    }

    #[tokio::test]
    async fn test_missing_binary_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = GimpRenderer::new(
            dir.path().join("no-such-gimp"),
            dir.path().join("template.xcf"),
        );
        assert!(renderer.render(&[], &dir.path().join("out")).await.is_err());
    }
}
