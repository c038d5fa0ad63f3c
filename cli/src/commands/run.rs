//! Run command - select, record, launch.

use std::io::Write;

use anyhow::Result;
use devport_core::{HandoffMode, LaunchService, Overrides, ProcessHandoff, SystemProbe};

use crate::LaunchArgs;

pub async fn run(launch: LaunchArgs, target: Vec<String>) -> Result<i32> {
    let overrides = Overrides {
        state_file: launch.state_file,
        command: Some(target),
        handoff: launch.no_exec.then_some(HandoffMode::SpawnWait),
        ..Default::default()
    };
    let settings = super::resolve(launch.select, overrides).await?;

    let service = LaunchService::new(
        SystemProbe::new(settings.probe),
        ProcessHandoff::new(settings.handoff),
        settings,
    );

    let plan = service.prepare().await?;

    println!("{}", plan.status_line());
    std::io::stdout().flush()?;

    Ok(service.launch(&plan).await?)
}
