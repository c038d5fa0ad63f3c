//! Windows socket table lookup using netstat.

use std::process::Stdio;

use tokio::process::Command;

use crate::domain::Listener;
use crate::error::{Error, Result};

use super::utils::Utils;
use super::SocketTable;

/// Windows-specific socket table.
pub struct WindowsSocketTable;

impl WindowsSocketTable {
    pub fn new() -> Self {
        Self
    }

    /// Parse `netstat -ano` output into the listeners bound to `port`.
    ///
    /// ```text
    ///   Proto  Local Address          Foreign Address        State           PID
    ///   TCP    0.0.0.0:8080           0.0.0.0:0              LISTENING       4242
    /// ```
    fn parse_netstat_output(&self, output: &str, port: u16) -> Vec<Listener> {
        let mut listeners = Vec::new();

        for line in output.lines() {
            let components: Vec<&str> = line.split_whitespace().collect();
            if components.len() < 5 || components[0] != "TCP" || components[3] != "LISTENING" {
                continue;
            }

            let Some((address, local_port)) = Utils::parse_address(components[1]) else {
                continue;
            };
            if local_port != port {
                continue;
            }

            let mut listener = Listener::new(address, local_port);
            listener.pid = components[4].parse().ok();
            listeners.push(listener);
        }

        listeners
    }
}

impl Default for WindowsSocketTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SocketTable for WindowsSocketTable {
    /// Executes: `netstat -ano`
    async fn listeners(&self, port: u16) -> Result<Vec<Listener>> {
        let output = Command::new("netstat")
            .args(["-ano"])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| Utils::spawn_error("netstat", e))?;

        if !output.status.success() {
            return Err(Error::CommandFailed(format!(
                "netstat exited with {}",
                output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(self.parse_netstat_output(&stdout, port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_netstat_output() {
        let table = WindowsSocketTable::new();
        let output = r#"
Active Connections

  Proto  Local Address          Foreign Address        State           PID
  TCP    0.0.0.0:8080           0.0.0.0:0              LISTENING       4242
  TCP    [::]:8080              [::]:0                 LISTENING       4242
  TCP    127.0.0.1:8080         127.0.0.1:50000        ESTABLISHED     4242
  UDP    0.0.0.0:8080           *:*                                    99
"#;

        let listeners = table.parse_netstat_output(output, 8080);
        assert_eq!(listeners.len(), 2);
        assert_eq!(listeners[0].pid, Some(4242));
        assert_eq!(listeners[1].address, "[::]");
    }
}
