//! Ports layer - Trait definitions (interfaces).
//!
//! This module defines the interfaces that the application layer uses
//! to interact with the operating system. Implementations live in `adapters`.

mod handoff;
mod probe;

pub use handoff::Handoff;
pub use probe::PortProbe;
