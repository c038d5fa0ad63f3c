//! macOS socket table lookup using lsof.

use std::process::Stdio;

use tokio::process::Command;

use crate::domain::Listener;
use crate::error::{Error, Result};

use super::utils::Utils;
use super::SocketTable;

/// macOS-specific socket table using lsof.
pub struct DarwinSocketTable;

impl DarwinSocketTable {
    pub fn new() -> Self {
        Self
    }

    /// Parse lsof output into the listeners bound to `port`.
    fn parse_lsof_output(&self, output: &str, port: u16) -> Vec<Listener> {
        let mut listeners = Vec::new();

        for line in output.lines().skip(1) {
            let components: Vec<&str> = line.split_whitespace().collect();
            if components.len() < 9 {
                continue;
            }

            let process_name = components[0].replace("\\x20", " ").replace("\\x2f", "/");
            let pid: u32 = match components[1].parse() {
                Ok(p) => p,
                Err(_) => continue,
            };

            let Some(address_part) = components[8..]
                .iter()
                .rev()
                .find(|c| c.contains(':') && !c.starts_with("0x") && !c.starts_with("0t"))
            else {
                continue;
            };

            let Some((address, local_port)) = Utils::parse_address(address_part) else {
                continue;
            };
            if local_port != port {
                continue;
            }

            listeners.push(Listener::new(address, local_port).with_process(process_name, pid));
        }

        listeners
    }
}

impl Default for DarwinSocketTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SocketTable for DarwinSocketTable {
    /// Query listening TCP sockets on one port.
    ///
    /// Executes: `lsof -nP -iTCP:<port> -sTCP:LISTEN`
    ///
    /// lsof exits with 1 both when nothing matched and on real errors; only
    /// an empty stderr makes the former conclusive.
    async fn listeners(&self, port: u16) -> Result<Vec<Listener>> {
        let selector = format!("-iTCP:{}", port);
        let output = Command::new("/usr/sbin/lsof")
            .args(["-nP", selector.as_str(), "-sTCP:LISTEN"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Utils::spawn_error("lsof", e))?;

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| Error::ParseError(format!("Invalid UTF-8 in lsof output: {}", e)))?;
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() && (!stdout.trim().is_empty() || !stderr.trim().is_empty()) {
            return Err(Error::CommandFailed(format!(
                "lsof exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(self.parse_lsof_output(&stdout, port))
    }
}
