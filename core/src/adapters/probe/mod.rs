//! Port probe adapters.
//!
//! Platform-specific socket table lookups plus a portable bind probe.

#[cfg(target_os = "macos")]
mod darwin;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "windows")]
mod windows;

mod bind;
mod utils;

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{Listener, ProbeOutcome};
use crate::error::{Error, Result};
use crate::ports::PortProbe;

pub use bind::BindProbe;

/// Internal trait for platform-specific socket tables.
trait SocketTable: Send + Sync {
    fn listeners(&self, port: u16) -> impl std::future::Future<Output = Result<Vec<Listener>>> + Send;
}

/// Probe that asks the operating system's socket table for listeners.
pub struct SocketTableProbe {
    #[cfg(target_os = "macos")]
    inner: darwin::DarwinSocketTable,

    #[cfg(target_os = "linux")]
    inner: linux::LinuxSocketTable,

    #[cfg(target_os = "windows")]
    inner: windows::WindowsSocketTable,
}

impl SocketTableProbe {
    /// Create a socket table probe for the current platform.
    pub fn new() -> Self {
        Self {
            #[cfg(target_os = "macos")]
            inner: darwin::DarwinSocketTable::new(),

            #[cfg(target_os = "linux")]
            inner: linux::LinuxSocketTable::new(),

            #[cfg(target_os = "windows")]
            inner: windows::WindowsSocketTable::new(),
        }
    }

    /// List the sockets in LISTEN state on exactly `port`.
    #[cfg(any(target_os = "macos", target_os = "linux", target_os = "windows"))]
    pub async fn listeners(&self, port: u16) -> Result<Vec<Listener>> {
        self.inner.listeners(port).await
    }

    /// List the sockets in LISTEN state on exactly `port`.
    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    pub async fn listeners(&self, _port: u16) -> Result<Vec<Listener>> {
        Err(Error::UnsupportedPlatform(
            "no socket table lookup for this platform".to_string(),
        ))
    }
}

impl Default for SocketTableProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl PortProbe for SocketTableProbe {
    async fn probe(&self, port: u16) -> ProbeOutcome {
        match self.listeners(port).await {
            Ok(listeners) => ProbeOutcome::from_listeners(listeners),
            Err(e) => ProbeOutcome::unknown(e.to_string()),
        }
    }
}

/// How free/occupied is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStrategy {
    /// Socket table, falling back to binding when no table tool is available.
    #[default]
    Auto,
    /// Socket table only.
    Table,
    /// Bind attempt only.
    Bind,
}

impl ProbeStrategy {
    pub const ALL: [ProbeStrategy; 3] = [ProbeStrategy::Auto, ProbeStrategy::Table, ProbeStrategy::Bind];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeStrategy::Auto => "auto",
            ProbeStrategy::Table => "table",
            ProbeStrategy::Bind => "bind",
        }
    }
}

impl std::fmt::Display for ProbeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProbeStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ProbeStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::Config(format!(
                    "unknown probe strategy '{}' (expected auto, table or bind)",
                    s
                ))
            })
    }
}

/// The probe used by the launcher, dispatching on a [`ProbeStrategy`].
pub struct SystemProbe {
    strategy: ProbeStrategy,
    table: SocketTableProbe,
    bind: BindProbe,
    fallback_reported: AtomicBool,
}

impl SystemProbe {
    pub fn new(strategy: ProbeStrategy) -> Self {
        Self {
            strategy,
            table: SocketTableProbe::new(),
            bind: BindProbe::new(),
            fallback_reported: AtomicBool::new(false),
        }
    }

    pub fn strategy(&self) -> ProbeStrategy {
        self.strategy
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new(ProbeStrategy::default())
    }
}

impl PortProbe for SystemProbe {
    async fn probe(&self, port: u16) -> ProbeOutcome {
        let outcome = match self.strategy {
            ProbeStrategy::Table => self.table.probe(port).await,
            ProbeStrategy::Bind => self.bind.probe(port).await,
            ProbeStrategy::Auto => match self.table.listeners(port).await {
                Ok(listeners) => ProbeOutcome::from_listeners(listeners),
                Err(e @ (Error::ToolNotFound(_) | Error::UnsupportedPlatform(_))) => {
                    if !self.fallback_reported.swap(true, Ordering::Relaxed) {
                        info!(error = %e, "socket table unavailable, probing by bind");
                    }
                    self.bind.probe(port).await
                }
                Err(e) => ProbeOutcome::unknown(e.to_string()),
            },
        };

        if let ProbeOutcome::Unknown { reason } = &outcome {
            debug!(port, %reason, "probe inconclusive, treating port as occupied");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("auto".parse::<ProbeStrategy>().unwrap(), ProbeStrategy::Auto);
        assert_eq!("TABLE".parse::<ProbeStrategy>().unwrap(), ProbeStrategy::Table);
        assert_eq!(" bind ".parse::<ProbeStrategy>().unwrap(), ProbeStrategy::Bind);
        assert!("lsof".parse::<ProbeStrategy>().is_err());
    }

    #[test]
    fn test_strategy_display_round_trips() {
        for strategy in ProbeStrategy::ALL {
            assert_eq!(strategy.to_string().parse::<ProbeStrategy>().unwrap(), strategy);
        }
    }

    #[tokio::test]
    async fn test_bind_strategy_sees_listener() {
        let listener = std::net::TcpListener::bind(("127.0.0.1", 0)).unwrap();
        let port = listener.local_addr().unwrap().port();

        let probe = SystemProbe::new(ProbeStrategy::Bind);
        assert!(!probe.probe(port).await.is_free());
    }
}
