//! One-shot lock marker for protected environments.
//!
//! The marker is an empty file. Only its existence matters: once an install
//! run succeeds against a locked environment the marker is created, and any
//! later lock-checked run against a locked environment refuses to start.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;

/// Outcome of [`LockMarker::create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockCreation {
    /// The marker was created by this call.
    Created,
    /// The marker appeared between the pre-run check and creation.
    AlreadyPresent,
}

/// Existence-only lock marker at a fixed path.
#[derive(Debug, Clone)]
pub struct LockMarker {
    path: PathBuf,
}

impl LockMarker {
    /// Marker at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the marker.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the marker exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Create the marker, creating its parent directory first if needed.
    ///
    /// Creation is exclusive: a concurrent run that created the marker
    /// first is reported as [`LockCreation::AlreadyPresent`] rather than
    /// overwritten.
    pub fn create(&self) -> Result<LockCreation> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                debug!("Creating lock directory {}", parent.display());
                fs::create_dir_all(parent)?;
            }
        }

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(_) => {
                debug!("Created lock marker {}", self.path.display());
                Ok(LockCreation::Created)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                warn!("Lock marker {} already present", self.path.display());
                Ok(LockCreation::AlreadyPresent)
            }
            Err(e) => Err(e.into()),
        }
    }
}
