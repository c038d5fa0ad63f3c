//! Error types for the devport-core library.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::ScanWindow;

/// Result type alias for devport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while selecting, publishing and launching.
#[derive(Error, Debug)]
pub enum Error {
    /// Every candidate in the scan window was occupied (or undecidable).
    #[error("No free port found in range {}..{}", .window.start(), .window.end())]
    NoFreePort { window: ScanWindow },

    /// Failed to read or write the port state file.
    #[error("State file {}: {reason}", .path.display())]
    StateFile { path: PathBuf, reason: String },

    /// Failed to start the target program.
    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to execute a system command.
    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    /// A socket-table tool is not installed on this machine.
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Failed to parse command output.
    #[error("Failed to parse output: {0}")]
    ParseError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Platform not supported.
    #[error("Platform not supported: {0}")]
    UnsupportedPlatform(String),
}

impl Error {
    /// Process exit code a launcher should terminate with for this error.
    ///
    /// Launch failures follow the shell convention: 127 when the program
    /// cannot be found, 126 when it cannot be executed.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Launch { source, .. } => match source.kind() {
                std::io::ErrorKind::NotFound => 127,
                std::io::ErrorKind::PermissionDenied => 126,
                _ => 1,
            },
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_free_port_message() {
        let err = Error::NoFreePort {
            window: ScanWindow::new(9000, 50),
        };
        assert_eq!(err.to_string(), "No free port found in range 9000..9050");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_launch_exit_codes() {
        let launch = |kind| Error::Launch {
            program: "python3".to_string(),
            source: std::io::Error::from(kind),
        };
        assert_eq!(launch(std::io::ErrorKind::NotFound).exit_code(), 127);
        assert_eq!(launch(std::io::ErrorKind::PermissionDenied).exit_code(), 126);
        assert_eq!(launch(std::io::ErrorKind::Other).exit_code(), 1);
    }
}
