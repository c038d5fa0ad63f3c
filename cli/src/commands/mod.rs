//! Subcommand implementations.

pub mod run;
pub mod scan;
pub mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use devport_core::{ConfigStore, Overrides, ProjectConfig, Settings};

use crate::SelectArgs;

/// Load the project file named on the command line, or the default one.
async fn load_project(config: Option<PathBuf>) -> Result<ProjectConfig> {
    let store = config.map(ConfigStore::with_path).unwrap_or_default();
    Ok(store.load().await?)
}

/// Resolve settings from flags, environment and project file.
pub(crate) async fn resolve(select: SelectArgs, mut overrides: Overrides) -> Result<Settings> {
    let project = load_project(select.config.clone()).await?;

    overrides.start_port = select.start_port();
    overrides.window = select.window;
    overrides.probe = select.probe;

    Settings::resolve(project, overrides).context("invalid launcher settings")
}

/// Print an error to stderr and return the exit code for it.
///
/// Core errors are printed bare so their message is the whole line.
pub fn report(err: &anyhow::Error) -> i32 {
    let (line, code) = describe(err);
    eprintln!("{}", line);
    code
}

/// Stderr line and exit code for an error.
fn describe(err: &anyhow::Error) -> (String, i32) {
    match err.downcast_ref::<devport_core::Error>() {
        Some(core) => (core.to_string(), core.exit_code()),
        None => (format!("Error: {:#}", err), 1),
    }
}
