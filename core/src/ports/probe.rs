//! Port probe port (interface).

use crate::domain::ProbeOutcome;

/// Port for checking whether a single TCP port has a listener.
///
/// Implementations never fail: anything that prevents a clean answer is
/// reported as [`ProbeOutcome::Unknown`].
pub trait PortProbe: Send + Sync {
    /// Probe one TCP port for a socket in LISTEN state.
    fn probe(&self, port: u16) -> impl std::future::Future<Output = ProbeOutcome> + Send;
}
