//! First-fit free port selection.

use tracing::{debug, info};

use crate::domain::{ProbeOutcome, ScanWindow};
use crate::error::{Error, Result};
use crate::ports::PortProbe;

/// Picks the lowest free port in a window.
///
/// Candidates are probed one at a time in ascending order and the scan
/// stops at the first conclusive `Free`. A port reported free was free at
/// the instant it was probed; nothing reserves it afterwards.
pub struct PortSelector<P: PortProbe> {
    probe: P,
}

impl<P: PortProbe> PortSelector<P> {
    /// Create a new selector with the given probe.
    pub fn new(probe: P) -> Self {
        Self { probe }
    }

    /// Return the lowest free port in `window`.
    pub async fn select(&self, window: ScanWindow) -> Result<u16> {
        for port in window.candidates() {
            let outcome = self.probe.probe(port).await;
            debug!(port, %outcome, "probed");

            if outcome.is_free() {
                info!(port, %window, "selected free port");
                return Ok(port);
            }
        }

        debug!(%window, "scan window exhausted");
        Err(Error::NoFreePort { window })
    }

    /// Probe a single port without selecting anything.
    pub async fn inspect(&self, port: u16) -> ProbeOutcome {
        self.probe.probe(port).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock probe with a fixed port landscape that records every call.
    struct MockProbe {
        landscape: HashMap<u16, ProbeOutcome>,
        calls: Mutex<Vec<u16>>,
    }

    impl MockProbe {
        fn new() -> Self {
            Self {
                landscape: HashMap::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn with(mut self, ports: impl IntoIterator<Item = u16>, outcome: ProbeOutcome) -> Self {
            for port in ports {
                self.landscape.insert(port, outcome.clone());
            }
            self
        }

        fn calls(&self) -> Vec<u16> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl PortProbe for MockProbe {
        async fn probe(&self, port: u16) -> ProbeOutcome {
            self.calls.lock().unwrap().push(port);
            self.landscape.get(&port).cloned().unwrap_or(ProbeOutcome::Free)
        }
    }

    #[tokio::test]
    async fn test_free_start_selected_with_single_probe() {
        let selector = PortSelector::new(MockProbe::new());

        let port = selector.select(ScanWindow::new(8080, 50)).await.unwrap();
        assert_eq!(port, 8080);
        assert_eq!(selector.probe.calls(), vec![8080]);
    }

    #[tokio::test]
    async fn test_skips_occupied_prefix() {
        for k in [1u16, 5, 50] {
            let probe = MockProbe::new().with(9000..9000 + k, ProbeOutcome::occupied());
            let selector = PortSelector::new(probe);

            let port = selector.select(ScanWindow::new(9000, 50)).await.unwrap();
            assert_eq!(port, 9000 + k);
            assert_eq!(selector.probe.calls().len(), usize::from(k) + 1);
        }
    }

    #[tokio::test]
    async fn test_exhausted_window() {
        let probe = MockProbe::new().with(9000..=9050, ProbeOutcome::occupied());
        let selector = PortSelector::new(probe);

        let err = selector.select(ScanWindow::new(9000, 50)).await.unwrap_err();
        assert_eq!(err.to_string(), "No free port found in range 9000..9050");
        assert_eq!(selector.probe.calls().len(), 51);
        // Nothing past the inclusive end is probed
        assert_eq!(selector.probe.calls().last(), Some(&9050));
    }

    #[tokio::test]
    async fn test_unknown_counts_as_occupied() {
        let probe = MockProbe::new()
            .with([3000], ProbeOutcome::unknown("ss exited with 1"))
            .with([3001], ProbeOutcome::occupied());
        let selector = PortSelector::new(probe);

        let port = selector.select(ScanWindow::new(3000, 50)).await.unwrap();
        assert_eq!(port, 3002);
    }

    #[tokio::test]
    async fn test_deterministic_for_unchanged_landscape() {
        let probe = MockProbe::new().with([8080, 8081, 8083], ProbeOutcome::occupied());
        let selector = PortSelector::new(probe);
        let window = ScanWindow::default();

        let first = selector.select(window).await.unwrap();
        let second = selector.select(window).await.unwrap();
        assert_eq!(first, 8082);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_inspect_does_not_scan() {
        let probe = MockProbe::new().with([8080], ProbeOutcome::occupied());
        let selector = PortSelector::new(probe);

        assert!(!selector.inspect(8080).await.is_free());
        assert_eq!(selector.probe.calls(), vec![8080]);
    }
}
