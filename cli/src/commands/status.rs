//! Status command - show the recorded port.

use std::path::PathBuf;

use anyhow::{bail, Result};
use devport_core::{
    Overrides, PortSelector, ProbeOutcome, ProbeStrategy, StateFile, SystemProbe,
};
use serde::Serialize;

use crate::SelectArgs;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport<'a> {
    port: u16,
    state_file: String,
    listening: bool,
    probe: &'a ProbeOutcome,
}

pub async fn run(
    state_file: Option<PathBuf>,
    probe: Option<ProbeStrategy>,
    config: Option<PathBuf>,
    json: bool,
) -> Result<i32> {
    let select = SelectArgs {
        probe,
        config,
        ..Default::default()
    };
    let overrides = Overrides {
        state_file,
        ..Default::default()
    };
    let settings = super::resolve(select, overrides).await?;
    let state = StateFile::with_path(settings.state_file.clone());

    let Some(port) = state.read().await? else {
        bail!("no port recorded in {}", state.path().display());
    };

    let selector = PortSelector::new(SystemProbe::new(settings.probe));
    let outcome = selector.inspect(port).await;
    let listening = !outcome.is_free() && !outcome.is_unknown();

    if json {
        let report = StatusReport {
            port,
            state_file: state.path().display().to_string(),
            listening,
            probe: &outcome,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(0);
    }

    println!("Port {} (from {})", port, state.path().display());
    match &outcome {
        ProbeOutcome::Free => println!("Not listening"),
        ProbeOutcome::Occupied { listeners } if listeners.is_empty() => println!("Listening"),
        ProbeOutcome::Occupied { listeners } => {
            for listener in listeners {
                println!("Listening: {}", listener);
            }
        }
        ProbeOutcome::Unknown { reason } => println!("Unknown: {}", reason),
    }

    Ok(0)
}
