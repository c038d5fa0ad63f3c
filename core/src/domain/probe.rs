//! Probe results.

use serde::{Deserialize, Serialize};

/// A listening socket found in the system socket table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Listener {
    /// Local address the socket is bound to (e.g. "*", "127.0.0.1", "[::1]").
    pub address: String,
    /// Local port.
    pub port: u16,
    /// Owning process name, when the socket table exposes it.
    pub process_name: Option<String>,
    /// Owning process ID, when the socket table exposes it.
    pub pid: Option<u32>,
}

impl Listener {
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
            process_name: None,
            pid: None,
        }
    }

    /// Attach owning process details.
    pub fn with_process(mut self, process_name: impl Into<String>, pid: u32) -> Self {
        self.process_name = Some(process_name.into());
        self.pid = Some(pid);
        self
    }
}

impl std::fmt::Display for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.address, self.port)?;
        match (&self.process_name, self.pid) {
            (Some(name), Some(pid)) => write!(f, " (PID: {}, Process: {})", pid, name),
            (Some(name), None) => write!(f, " (Process: {})", name),
            (None, Some(pid)) => write!(f, " (PID: {})", pid),
            (None, None) => Ok(()),
        }
    }
}

/// Result of a single point-in-time probe of one TCP port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ProbeOutcome {
    /// Nothing is listening on the port.
    Free,
    /// At least one socket is listening on the port. The list may be empty
    /// when the probe cannot tell who holds it.
    Occupied { listeners: Vec<Listener> },
    /// The probe could not decide.
    Unknown { reason: String },
}

impl ProbeOutcome {
    pub fn occupied() -> Self {
        ProbeOutcome::Occupied {
            listeners: Vec::new(),
        }
    }

    pub fn unknown(reason: impl Into<String>) -> Self {
        ProbeOutcome::Unknown {
            reason: reason.into(),
        }
    }

    /// Only a conclusive `Free` counts; `Unknown` is treated as occupied.
    pub fn is_free(&self) -> bool {
        matches!(self, ProbeOutcome::Free)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ProbeOutcome::Unknown { .. })
    }

    /// Listeners reported by the probe, if any.
    pub fn listeners(&self) -> &[Listener] {
        match self {
            ProbeOutcome::Occupied { listeners } => listeners,
            _ => &[],
        }
    }

    /// Build an outcome from the listeners matching a candidate port.
    pub fn from_listeners(listeners: Vec<Listener>) -> Self {
        if listeners.is_empty() {
            ProbeOutcome::Free
        } else {
            ProbeOutcome::Occupied { listeners }
        }
    }
}

impl std::fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeOutcome::Free => write!(f, "free"),
            ProbeOutcome::Occupied { .. } => write!(f, "occupied"),
            ProbeOutcome::Unknown { reason } => write!(f, "unknown ({})", reason),
        }
    }
}
