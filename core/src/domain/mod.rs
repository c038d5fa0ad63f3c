//! Domain layer - Pure data models for port selection.
//!
//! These types have no I/O dependencies and can be tested in isolation.

mod probe;
mod window;

pub use probe::{Listener, ProbeOutcome};
pub use window::{ScanWindow, DEFAULT_SPAN, DEFAULT_START_PORT};
