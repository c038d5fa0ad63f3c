//! Linux socket table lookup using ss.

use std::process::Stdio;

use regex::Regex;
use tokio::process::Command;

use crate::domain::Listener;
use crate::error::{Error, Result};

use super::utils::Utils;
use super::SocketTable;

const SS_PATHS: &[&str] = &["/usr/sbin/ss", "/sbin/ss", "/usr/bin/ss", "/bin/ss"];

/// Linux-specific socket table.
pub struct LinuxSocketTable {
    users: Regex,
}

impl LinuxSocketTable {
    pub fn new() -> Self {
        Self {
            users: Regex::new(r#"users:\(\("(.+?)",pid=(\d+),fd=(\d+)\)"#)
                .expect("users pattern is valid"),
        }
    }

    /// Parse ss output into the listeners bound to `port`.
    ///
    /// Expected ss output format (header suppressed, process column optional):
    /// ```text
    /// LISTEN 0 128 127.0.0.1:8080 0.0.0.0:* users:(("python3",pid=4242,fd=3))
    /// ```
    fn parse_ss_output(&self, output: &str, port: u16) -> Vec<Listener> {
        let mut listeners = Vec::new();

        for line in output.lines() {
            let components: Vec<&str> = line.split_whitespace().collect();
            if components.len() < 5 || components[0] != "LISTEN" {
                continue;
            }

            let Some((address, local_port)) = Utils::parse_address(components[3]) else {
                continue;
            };
            if local_port != port {
                continue;
            }

            let mut listener = Listener::new(address, local_port);
            if let Some(caps) = components.get(5).and_then(|c| self.users.captures(c)) {
                if let Ok(pid) = caps[2].parse() {
                    listener = listener.with_process(&caps[1], pid);
                }
            }
            listeners.push(listener);
        }

        listeners
    }
}

impl Default for LinuxSocketTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SocketTable for LinuxSocketTable {
    /// Query listening TCP sockets on one port.
    ///
    /// Executes: `ss -Htlnp sport = :<port>`
    async fn listeners(&self, port: u16) -> Result<Vec<Listener>> {
        let ss = Utils::locate_tool(SS_PATHS, "ss");
        let filter = format!(":{}", port);
        let output = Command::new(ss)
            .args(["-Htlnp", "sport", "=", filter.as_str()])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Utils::spawn_error("ss", e))?;

        if !output.status.success() {
            return Err(Error::CommandFailed(format!(
                "ss exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| Error::ParseError(format!("Invalid UTF-8 in ss output: {}", e)))?;

        Ok(self.parse_ss_output(&stdout, port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ss_output() {
        let table = LinuxSocketTable::new();
        let output = r#"LISTEN 0 4096 [::ffff:127.0.0.1]:8080 *:* users:(("node",pid=53561,fd=187))
LISTEN 0 128 0.0.0.0:8080 0.0.0.0:*"#;

        let listeners = table.parse_ss_output(output, 8080);
        assert_eq!(listeners.len(), 2);
        assert_eq!(listeners[0].address, "[::ffff:127.0.0.1]");
        assert_eq!(listeners[0].process_name.as_deref(), Some("node"));
        assert_eq!(listeners[0].pid, Some(53561));
        assert_eq!(listeners[1].address, "0.0.0.0");
        assert_eq!(listeners[1].pid, None);
    }

    #[test]
    fn test_exact_port_match() {
        let table = LinuxSocketTable::new();
        // 80 must not match 8080 or 18080
        let output = r#"LISTEN 0 128 0.0.0.0:8080 0.0.0.0:*
LISTEN 0 128 0.0.0.0:18080 0.0.0.0:*"#;

        assert!(table.parse_ss_output(output, 80).is_empty());
        assert_eq!(table.parse_ss_output(output, 8080).len(), 1);
    }

    #[test]
    fn test_empty_output_means_no_listener() {
        let table = LinuxSocketTable::new();
        assert!(table.parse_ss_output("", 8080).is_empty());
    }

    #[test]
    fn test_skips_non_listen_rows() {
        let table = LinuxSocketTable::new();
        let output = "ESTAB 0 0 127.0.0.1:8080 127.0.0.1:51234";
        assert!(table.parse_ss_output(output, 8080).is_empty());
    }
}
