//! Per-request scratch files.
//!
//! Every transformation request owns exactly one scratch file for the source
//! bytes. Files are named `temp_<uuid-v4>.data` inside the configured scratch
//! directory and are created with create-new semantics, so two in-flight
//! requests can never share a path.
//!
//! # Release
//!
//! [`ScratchFile::release`] removes the file and must be awaited on every exit
//! path of the owning request. If the owning task panics or is cancelled
//! before that, `Drop` removes the file synchronously instead. Deletion
//! failures are logged and never surface as request errors.

use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::constants::{SCRATCH_FILE_EXTENSION, SCRATCH_FILE_PREFIX};

/// Allocator for scratch files inside one directory
#[derive(Debug, Clone)]
pub struct ScratchSpace {
    directory: PathBuf,
}

impl ScratchSpace {
    /// Create the scratch space, creating `directory` if it does not exist
    ///
    /// Called once at startup.
    pub fn new(directory: impl Into<PathBuf>) -> io::Result<Self> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Allocate a new, empty scratch file
    pub async fn acquire(&self) -> io::Result<ScratchFile> {
        let name = format!(
            "{}{}.{}",
            SCRATCH_FILE_PREFIX,
            Uuid::new_v4().simple(),
            SCRATCH_FILE_EXTENSION
        );
        let path = self.directory.join(name);

        tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        tracing::debug!(path = %path.display(), "Acquired scratch file");

        Ok(ScratchFile {
            path,
            released: false,
        })
    }
}

/// A scratch file owned by one in-flight request
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
    released: bool,
}

impl ScratchFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the backing file
    ///
    /// Never fails; a deletion error (including the file already being gone)
    /// is logged.
    pub async fn release(mut self) {
        self.released = true;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Released scratch file");
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to remove scratch file"
                );
            }
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove unreleased scratch file"
            );
        } else {
            tracing::debug!(path = %self.path.display(), "Removed unreleased scratch file on drop");
        }
    }
}
