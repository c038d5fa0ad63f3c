//! Select, publish, hand off.

use tracing::info;

use crate::adapters::StateFile;
use crate::config::Settings;
use crate::error::Result;
use crate::ports::{Handoff, PortProbe};

use super::{LaunchPlan, PortSelector};

/// Application service running the launcher flow.
///
/// [`prepare`](Self::prepare) scans and publishes; [`launch`](Self::launch)
/// transfers execution. Callers print the status line in between.
pub struct LaunchService<P: PortProbe, H: Handoff> {
    selector: PortSelector<P>,
    handoff: H,
    state: StateFile,
    settings: Settings,
}

impl<P: PortProbe, H: Handoff> LaunchService<P, H> {
    pub fn new(probe: P, handoff: H, settings: Settings) -> Self {
        Self {
            selector: PortSelector::new(probe),
            handoff,
            state: StateFile::with_path(settings.state_file.clone()),
            settings,
        }
    }

    pub fn state_file(&self) -> &StateFile {
        &self.state
    }

    /// Select a port and publish it.
    ///
    /// On exhaustion the state file is not touched. A state file that
    /// cannot be written is fatal.
    pub async fn prepare(&self) -> Result<LaunchPlan> {
        let port = self.selector.select(self.settings.window).await?;
        let plan = LaunchPlan::new(port, &self.settings.command)?;

        self.state.write(port).await?;
        info!(
            port,
            state_file = %self.state.path().display(),
            "published selected port"
        );

        Ok(plan)
    }

    /// Transfer execution to the target. Returns the exit code to exit with.
    pub async fn launch(&self, plan: &LaunchPlan) -> Result<i32> {
        info!(program = plan.program(), args = ?plan.args(), "handing off");
        self.handoff.hand_off(plan).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProbeOutcome, ScanWindow};
    use crate::error::Error;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use tempfile::tempdir;

    struct FixedProbe {
        occupied: HashSet<u16>,
    }

    impl PortProbe for FixedProbe {
        async fn probe(&self, port: u16) -> ProbeOutcome {
            if self.occupied.contains(&port) {
                ProbeOutcome::occupied()
            } else {
                ProbeOutcome::Free
            }
        }
    }

    #[derive(Default)]
    struct RecordingHandoff {
        plans: Mutex<Vec<LaunchPlan>>,
    }

    impl Handoff for RecordingHandoff {
        async fn hand_off(&self, plan: &LaunchPlan) -> Result<i32> {
            self.plans.lock().unwrap().push(plan.clone());
            Ok(0)
        }
    }

    fn service(
        dir: &tempfile::TempDir,
        start: u16,
        occupied: impl IntoIterator<Item = u16>,
    ) -> LaunchService<FixedProbe, RecordingHandoff> {
        let settings = Settings {
            window: ScanWindow::new(start, 50),
            state_file: dir.path().join(".dev_port"),
            ..Settings::default()
        };
        let probe = FixedProbe {
            occupied: occupied.into_iter().collect(),
        };
        LaunchService::new(probe, RecordingHandoff::default(), settings)
    }

    #[tokio::test]
    async fn test_prepare_publishes_selected_port() {
        let dir = tempdir().unwrap();
        let service = service(&dir, 9000, 9000..9005);

        let plan = service.prepare().await.unwrap();
        assert_eq!(plan.port(), 9005);
        assert_eq!(service.state_file().read().await.unwrap(), Some(9005));

        let code = service.launch(&plan).await.unwrap();
        assert_eq!(code, 0);
        let plans = service.handoff.plans.lock().unwrap();
        assert_eq!(plans[0].env().collect::<Vec<_>>(), vec![("PORT", "9005")]);
    }

    #[tokio::test]
    async fn test_exhaustion_leaves_state_file_untouched() {
        let dir = tempdir().unwrap();
        let service = service(&dir, 9000, 9000..=9050);
        service.state_file().write(8123).await.unwrap();

        let err = service.prepare().await.unwrap_err();
        assert!(matches!(err, Error::NoFreePort { .. }));
        assert_eq!(service.state_file().read().await.unwrap(), Some(8123));
    }

    #[tokio::test]
    async fn test_exhaustion_does_not_create_state_file() {
        let dir = tempdir().unwrap();
        let service = service(&dir, 9000, 9000..=9050);

        assert!(service.prepare().await.is_err());
        assert!(!service.state_file().path().exists());
    }

    #[tokio::test]
    async fn test_unwritable_state_file_is_fatal() {
        let dir = tempdir().unwrap();
        let settings = Settings {
            state_file: dir.path().join("missing").join(".dev_port"),
            ..Settings::default()
        };
        let probe = FixedProbe {
            occupied: HashSet::new(),
        };
        let service = LaunchService::new(probe, RecordingHandoff::default(), settings);

        let err = service.prepare().await.unwrap_err();
        assert!(matches!(err, Error::StateFile { .. }));
    }
}
