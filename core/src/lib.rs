//! devport Core Library
//!
//! Picks a free TCP port for a development server and hands execution to it.
//! Provides functionality to:
//! - Scan a window of candidate ports for the lowest one with no listener
//! - Record the selected port in a state file
//! - Launch the target program with `PORT` set, replacing the current
//!   process or waiting on it
//!
//! # Architecture
//! This library follows hexagonal architecture (ports & adapters):
//! - `domain`: Pure data models
//! - `ports`: Trait definitions (interfaces)
//! - `adapters`: Operating system implementations
//! - `application`: Use case services
//!
//! # Platform Support
//! - Linux: Uses the `ss` command
//! - macOS: Uses the `lsof` command
//! - Windows: Uses the `netstat` command
//! - Everywhere: bind-based probing

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub mod config;
pub mod error;

// Re-export domain types (primary API)
pub use domain::{Listener, ProbeOutcome, ScanWindow};

// Re-export other commonly used types
pub use adapters::{
    BindProbe, HandoffMode, ProbeStrategy, ProcessHandoff, SocketTableProbe, StateFile,
    SystemProbe,
};
pub use application::{LaunchPlan, LaunchService, PortSelector};
pub use config::{ConfigStore, Overrides, ProjectConfig, Settings};
pub use error::{Error, Result};
pub use ports::{Handoff, PortProbe};
