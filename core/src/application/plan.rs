//! Launch plan for the target program.

use serde::Serialize;

use crate::error::{Error, Result};

/// Environment variable carrying the selected port to the target.
pub const PORT_ENV: &str = "PORT";

/// Address reported in the status line.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Target launched when no command is configured.
pub const DEFAULT_COMMAND: [&str; 2] = ["python3", "app.py"];

/// Placeholder replaced by the selected port in target arguments.
pub const PORT_PLACEHOLDER: &str = "{port}";

/// Everything needed to start the target on a selected port.
///
/// The port reaches the target explicitly, through `{port}` in its
/// arguments, and through the `PORT` environment variable for programs
/// that only read the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchPlan {
    port: u16,
    host: String,
    program: String,
    args: Vec<String>,
    env: Vec<(String, String)>,
}

impl LaunchPlan {
    /// Build a plan running `command` (program followed by its arguments).
    pub fn new(port: u16, command: &[String]) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| Error::Config("target command is empty".to_string()))?;

        if program.trim().is_empty() {
            return Err(Error::Config("target program is empty".to_string()));
        }

        let port_str = port.to_string();
        Ok(Self {
            port,
            host: DEFAULT_HOST.to_string(),
            program: program.replace(PORT_PLACEHOLDER, &port_str),
            args: args
                .iter()
                .map(|arg| arg.replace(PORT_PLACEHOLDER, &port_str))
                .collect(),
            env: vec![(PORT_ENV.to_string(), port_str)],
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Variables added on top of the inherited environment.
    pub fn env(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.env.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Operator-facing line printed before the handoff.
    pub fn status_line(&self) -> String {
        format!("Starting server on {}", self.url())
    }
}

/// The default target as owned strings.
pub fn default_command() -> Vec<String> {
    DEFAULT_COMMAND.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_target() {
        let plan = LaunchPlan::new(8080, &default_command()).unwrap();
        assert_eq!(plan.program(), "python3");
        assert_eq!(plan.args(), ["app.py".to_string()]);
        assert_eq!(plan.env().collect::<Vec<_>>(), vec![("PORT", "8080")]);
    }

    #[test]
    fn test_status_line() {
        let plan = LaunchPlan::new(8080, &default_command()).unwrap();
        assert_eq!(plan.status_line(), "Starting server on http://127.0.0.1:8080");
    }

    #[test]
    fn test_port_placeholder() {
        let plan = LaunchPlan::new(9005, &command(&["npx", "vite", "--port", "{port}"])).unwrap();
        assert_eq!(plan.args(), ["vite", "--port", "9005"]);

        let plan = LaunchPlan::new(9005, &command(&["serve", "--bind=0.0.0.0:{port}"])).unwrap();
        assert_eq!(plan.args(), ["--bind=0.0.0.0:9005"]);
    }

    #[test]
    fn test_empty_command_rejected() {
        assert!(matches!(LaunchPlan::new(8080, &[]), Err(Error::Config(_))));
        assert!(matches!(
            LaunchPlan::new(8080, &command(&["  "])),
            Err(Error::Config(_))
        ));
    }
}
