//! Adapters layer - External system implementations.
//!
//! This module contains implementations of the port traits defined in `ports`,
//! plus the state file the launcher publishes.

pub mod handoff;
pub mod probe;
pub mod state_file;

// Re-export main types for convenience
pub use handoff::{HandoffMode, ProcessHandoff};
pub use probe::{BindProbe, ProbeStrategy, SocketTableProbe, SystemProbe};
pub use state_file::{StateFile, DEFAULT_STATE_FILE};
