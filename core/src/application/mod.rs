//! Application layer - Use case services.
//!
//! Services are thin orchestrators that:
//! - Accept domain types as inputs
//! - Use ports (traits) for external dependencies
//! - Return domain types as outputs

mod launch_service;
mod plan;
mod selector;

pub use launch_service::LaunchService;
pub use plan::{default_command, LaunchPlan, DEFAULT_COMMAND, DEFAULT_HOST, PORT_ENV, PORT_PLACEHOLDER};
pub use selector::PortSelector;
