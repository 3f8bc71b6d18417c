//! Publication layout
//!
//! Batches are published under a root directory for relying-party fetchers:
//!
//! ```text
//! <root>/batches/<b>/signed-validity-window
//! <root>/batches/<b>/assertions
//! <root>/batches/<b>/tree
//! <root>/batches/latest
//! ```
//!
//! `assertions` holds the batch's serialized assertion vector so certificates
//! can be issued after the fact; `tree` holds the 32-byte root; `latest` is a
//! text file naming the newest batch number.

use std::fs;
use std::path::{Path, PathBuf};

use mtc_certificate::{BikeshedCertificate, SignedValidityWindow};
use mtc_codec::Codec;
use mtc_types::Assertions;
use tracing::{debug, info};

use crate::batch::IssuedBatch;
use crate::error::{Error, Result};

const SIGNED_WINDOW_FILE: &str = "signed-validity-window";
const ASSERTIONS_FILE: &str = "assertions";
const TREE_FILE: &str = "tree";
const LATEST_FILE: &str = "latest";

/// A publication root on the local filesystem.
#[derive(Debug, Clone)]
pub struct PublicationDir {
    root: PathBuf,
}

impl PublicationDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn batches_dir(&self) -> PathBuf {
        self.root.join("batches")
    }

    /// Directory of one batch.
    pub fn batch_dir(&self, batch_number: u32) -> PathBuf {
        self.batches_dir().join(batch_number.to_string())
    }

    /// Publishes an issued batch and points `latest` at it.
    pub fn write_batch(&self, batch: &IssuedBatch, assertions: &Assertions) -> Result<()> {
        let dir = self.batch_dir(batch.batch_number());
        fs::create_dir_all(&dir)?;

        fs::write(
            dir.join(SIGNED_WINDOW_FILE),
            batch.signed_window().to_bytes(),
        )?;
        fs::write(dir.join(ASSERTIONS_FILE), assertions.to_bytes())?;
        fs::write(dir.join(TREE_FILE), batch.tree().root().as_bytes())?;
        fs::write(
            self.batches_dir().join(LATEST_FILE),
            batch.batch_number().to_string(),
        )?;

        info!(
            batch_number = batch.batch_number(),
            dir = %dir.display(),
            "published batch"
        );
        Ok(())
    }

    /// The newest published batch number, if any batch was published.
    pub fn latest_batch_number(&self) -> Result<Option<u32>> {
        let path = self.batches_dir().join(LATEST_FILE);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let number = content
            .trim()
            .parse()
            .map_err(|_| Error::Input(format!("invalid latest batch reference {content:?}")))?;
        Ok(Some(number))
    }

    /// Reads back a published signed validity window.
    pub fn read_signed_window(&self, batch_number: u32) -> Result<SignedValidityWindow> {
        let bytes = fs::read(self.batch_dir(batch_number).join(SIGNED_WINDOW_FILE))?;
        debug!(batch_number, len = bytes.len(), "read signed validity window");
        Ok(SignedValidityWindow::parse_exact(&bytes)?)
    }

    /// Reads back a published assertion vector.
    pub fn read_assertions(&self, batch_number: u32) -> Result<Assertions> {
        let bytes = fs::read(self.batch_dir(batch_number).join(ASSERTIONS_FILE))?;
        Ok(Assertions::parse_exact(&bytes)?)
    }
}

/// Writes a certificate to a `.mtc` file.
pub fn save_certificate(path: impl AsRef<Path>, certificate: &BikeshedCertificate) -> Result<()> {
    Ok(fs::write(path, certificate.to_bytes())?)
}

/// Reads a certificate from a `.mtc` file.
pub fn load_certificate(path: impl AsRef<Path>) -> Result<BikeshedCertificate> {
    let bytes = fs::read(path)?;
    Ok(BikeshedCertificate::parse_exact(&bytes)?)
}
