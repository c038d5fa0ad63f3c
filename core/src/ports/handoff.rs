//! Process handoff port (interface).

use crate::application::LaunchPlan;
use crate::error::Result;

/// Port for transferring execution to the target program.
pub trait Handoff: Send + Sync {
    /// Run the plan and return the exit code the launcher should exit with.
    ///
    /// Image-replacing implementations only return on failure.
    fn hand_off(&self, plan: &LaunchPlan) -> impl std::future::Future<Output = Result<i32>> + Send;
}
