//! Scan command - report the port a launch would pick.

use anyhow::Result;
use devport_core::{Overrides, PortSelector, SystemProbe};
use serde::Serialize;

use crate::SelectArgs;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanReport {
    port: u16,
    start: u16,
    end: u16,
}

pub async fn run(select: SelectArgs, json: bool) -> Result<i32> {
    let settings = super::resolve(select, Overrides::default()).await?;
    let selector = PortSelector::new(SystemProbe::new(settings.probe));

    let port = selector.select(settings.window).await?;

    if json {
        let report = ScanReport {
            port,
            start: settings.window.start(),
            end: settings.window.end(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", port);
    }

    Ok(0)
}
