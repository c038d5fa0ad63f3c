//! Port state file.
//!
//! Holds the most recently selected port as a decimal number followed by a
//! newline, for tooling that inspects the filesystem instead of the process
//! tree. Each write replaces the previous content.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{Error, Result};

/// Default state file location, relative to the working directory.
pub const DEFAULT_STATE_FILE: &str = ".dev_port";

/// Reader/writer for the port state file.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    /// State file at the default path (`.dev_port`).
    pub fn new() -> Self {
        Self::with_path(DEFAULT_STATE_FILE)
    }

    /// State file at a custom path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        Error::StateFile {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from(DEFAULT_STATE_FILE));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Read the recorded port.
    ///
    /// Returns `None` if the file doesn't exist.
    pub async fn read(&self) -> Result<Option<u16>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.error(format!("failed to read: {}", e))),
        };

        content
            .trim()
            .parse::<u16>()
            .map(Some)
            .map_err(|e| self.error(format!("invalid port '{}': {}", content.trim(), e)))
    }

    /// Overwrite the file with `port`.
    ///
    /// Writes to a sibling temp file and renames it into place, so readers
    /// never observe a partially written number.
    pub async fn write(&self, port: u16) -> Result<()> {
        let temp_path = self.temp_path();

        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| self.error(format!("failed to create temp file: {}", e)))?;

        file.write_all(format!("{}\n", port).as_bytes())
            .await
            .map_err(|e| self.error(format!("failed to write: {}", e)))?;

        file.sync_all()
            .await
            .map_err(|e| self.error(format!("failed to sync: {}", e)))?;
        drop(file);

        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(self.error(format!("failed to replace: {}", e)));
        }

        debug!(path = %self.path.display(), port, "state file written");
        Ok(())
    }
}

impl Default for StateFile {
    fn default() -> Self {
        Self::new()
    }
}
