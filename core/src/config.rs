//! Launcher configuration.
//!
//! Settings come from three layers, highest precedence first:
//! command-line flags and environment (`PORT`), an optional project file
//! (`devport.json` in the working directory), and built-in defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::adapters::{HandoffMode, ProbeStrategy, DEFAULT_STATE_FILE};
use crate::application::default_command;
use crate::domain::{ScanWindow, DEFAULT_SPAN, DEFAULT_START_PORT};
use crate::error::{Error, Result};

/// Default project file name, relative to the working directory.
pub const DEFAULT_PROJECT_FILE: &str = "devport.json";

/// Project file contents. Every key is optional.
///
/// ```json
/// { "startPort": 3000, "window": 20, "stateFile": ".dev_port",
///   "command": ["npm", "run", "dev"], "probe": "auto", "exec": true }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// First candidate port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_port: Option<u16>,

    /// Number of ports scanned past the start port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<u16>,

    /// Where the selected port is recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,

    /// Target program followed by its arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,

    /// Probe strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe: Option<ProbeStrategy>,

    /// Replace the launcher process (true) or spawn and wait (false).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec: Option<bool>,
}

/// Loads the optional project file.
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    /// Store for `devport.json` in the working directory.
    pub fn new() -> Self {
        Self::with_path(DEFAULT_PROJECT_FILE)
    }

    /// Store with a custom path.
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Load the project file.
    ///
    /// Returns the empty config if the file doesn't exist.
    pub async fn load(&self) -> Result<ProjectConfig> {
        let content = match fs::read_to_string(&self.config_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ProjectConfig::default())
            }
            Err(e) => {
                return Err(Error::Config(format!(
                    "Failed to read {}: {}",
                    self.config_path.display(),
                    e
                )))
            }
        };

        serde_json::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse {}: {}",
                self.config_path.display(),
                e
            ))
        })
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub start_port: Option<u16>,
    pub window: Option<u16>,
    pub state_file: Option<PathBuf>,
    pub command: Option<Vec<String>>,
    pub probe: Option<ProbeStrategy>,
    pub handoff: Option<HandoffMode>,
}

/// Fully resolved launcher settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub window: ScanWindow,
    pub state_file: PathBuf,
    pub command: Vec<String>,
    pub probe: ProbeStrategy,
    pub handoff: HandoffMode,
}

impl Settings {
    /// Merge overrides over the project file over defaults.
    pub fn resolve(project: ProjectConfig, overrides: Overrides) -> Result<Self> {
        let start_port = overrides
            .start_port
            .or(project.start_port)
            .unwrap_or(DEFAULT_START_PORT);
        if start_port == 0 {
            return Err(Error::Config("start port must be between 1 and 65535".to_string()));
        }

        let span = overrides.window.or(project.window).unwrap_or(DEFAULT_SPAN);

        let command = overrides
            .command
            .filter(|c| !c.is_empty())
            .or(project.command)
            .unwrap_or_else(default_command);
        if command.is_empty() {
            return Err(Error::Config("target command is empty".to_string()));
        }

        let handoff = overrides
            .handoff
            .or(project.exec.map(|exec| {
                if exec {
                    HandoffMode::Exec
                } else {
                    HandoffMode::SpawnWait
                }
            }))
            .unwrap_or_default();

        Ok(Self {
            window: ScanWindow::new(start_port, span),
            state_file: overrides
                .state_file
                .or(project.state_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE)),
            command,
            probe: overrides.probe.or(project.probe).unwrap_or_default(),
            handoff,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window: ScanWindow::default(),
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            command: default_command(),
            probe: ProbeStrategy::default(),
            handoff: HandoffMode::default(),
        }
    }
}
