//! Process handoff to the target program.
//!
//! On Unix the launcher replaces its own process image (`exec`), so the
//! target keeps the launcher's PID and its exit code is the one the caller
//! observes. Elsewhere, or when asked to, the target is spawned and waited
//! on and its exit code is propagated.

use std::process::ExitStatus;

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, info};

use crate::application::LaunchPlan;
use crate::error::{Error, Result};
use crate::ports::Handoff;

/// How execution is transferred to the target program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HandoffMode {
    /// Replace the current process image.
    Exec,
    /// Spawn a child, wait for it and propagate its exit code.
    SpawnWait,
}

impl Default for HandoffMode {
    fn default() -> Self {
        if cfg!(unix) {
            HandoffMode::Exec
        } else {
            HandoffMode::SpawnWait
        }
    }
}

/// Handoff that talks to the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessHandoff {
    mode: HandoffMode,
}

impl ProcessHandoff {
    pub fn new(mode: HandoffMode) -> Self {
        Self { mode }
    }

    fn launch_error(plan: &LaunchPlan, source: std::io::Error) -> Error {
        Error::Launch {
            program: plan.program().to_string(),
            source,
        }
    }

    #[cfg(unix)]
    fn exec(plan: &LaunchPlan) -> Error {
        use std::os::unix::process::CommandExt;

        let mut command = std::process::Command::new(plan.program());
        command.args(plan.args()).envs(plan.env());
        debug!(program = plan.program(), "replacing process image");

        // Only returns on failure
        Self::launch_error(plan, command.exec())
    }

    async fn spawn_and_wait(plan: &LaunchPlan) -> Result<i32> {
        let mut child = Command::new(plan.program())
            .args(plan.args())
            .envs(plan.env())
            .spawn()
            .map_err(|e| Self::launch_error(plan, e))?;

        info!(pid = child.id(), program = plan.program(), "target started");

        // The terminal delivers Ctrl-C to the child as well; keep waiting so
        // its exit code is the one reported.
        let status = loop {
            tokio::select! {
                status = child.wait() => break status?,
                signal = tokio::signal::ctrl_c() => match signal {
                    Ok(()) => debug!("interrupt received, waiting for target"),
                    Err(_) => break child.wait().await?,
                },
            }
        };
        let code = exit_code(status);
        debug!(%status, code, "target exited");
        Ok(code)
    }
}

impl Handoff for ProcessHandoff {
    async fn hand_off(&self, plan: &LaunchPlan) -> Result<i32> {
        match self.mode {
            #[cfg(unix)]
            HandoffMode::Exec => Err(Self::exec(plan)),
            #[cfg(not(unix))]
            HandoffMode::Exec => Self::spawn_and_wait(plan).await,
            HandoffMode::SpawnWait => Self::spawn_and_wait(plan).await,
        }
    }
}

/// Exit code a shell would report for `status`.
///
/// A child terminated by a signal maps to `128 + signal`.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
