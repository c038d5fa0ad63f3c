use std::io;
use std::path::Path;

use crate::error::Error;

pub struct Utils;

impl Utils {
    /// Parse an address:port string.
    ///
    /// Handles multiple address formats:
    /// - IPv4: "127.0.0.1:3000" or "*:8080"
    /// - IPv6: "\[::1]:3000" or "\[fe80::1]%eth0:8080"
    /// - Scoped IPv4: "127.0.0.53%lo:53"
    pub fn parse_address(address: &str) -> Option<(String, u16)> {
        let (addr, port_str) = address.rsplit_once(':')?;
        let port: u16 = port_str.parse().ok()?;
        if addr.starts_with('[') && !addr.contains(']') {
            return None;
        }
        let addr = if addr.is_empty() { "*" } else { addr };
        Some((addr.to_string(), port))
    }

    /// Pick the first existing path from a list of well-known tool locations,
    /// falling back to a bare name resolved through `PATH`.
    pub fn locate_tool<'a>(candidates: &[&'a str], fallback: &'a str) -> &'a str {
        candidates
            .iter()
            .copied()
            .find(|path| Path::new(path).exists())
            .unwrap_or(fallback)
    }

    /// Map a spawn failure, keeping "not installed" distinguishable.
    pub fn spawn_error(tool: &str, err: io::Error) -> Error {
        if err.kind() == io::ErrorKind::NotFound {
            Error::ToolNotFound(tool.to_string())
        } else {
            Error::CommandFailed(format!("Failed to run {}: {}", tool, err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ipv4_address() {
        let (addr, port) = Utils::parse_address("127.0.0.1:3000").unwrap();
        assert_eq!(addr, "127.0.0.1");
        assert_eq!(port, 3000);

        let (addr, port) = Utils::parse_address("*:8080").unwrap();
        assert_eq!(addr, "*");
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_ipv6_address() {
        let (addr, port) = Utils::parse_address("[::1]:3000").unwrap();
        assert_eq!(addr, "[::1]");
        assert_eq!(port, 3000);

        let (addr, port) = Utils::parse_address("[fe80::1]%eth0:8080").unwrap();
        assert_eq!(addr, "[fe80::1]%eth0");
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_scoped_and_bare_addresses() {
        let (addr, port) = Utils::parse_address("127.0.0.53%lo:53").unwrap();
        assert_eq!(addr, "127.0.0.53%lo");
        assert_eq!(port, 53);

        let (addr, port) = Utils::parse_address(":9000").unwrap();
        assert_eq!(addr, "*");
        assert_eq!(port, 9000);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Utils::parse_address("0.0.0.0:*").is_none());
        assert!(Utils::parse_address("no-port-here").is_none());
        assert!(Utils::parse_address("[::1:3000").is_none());
        assert!(Utils::parse_address("*:70000").is_none());
    }

    #[test]
    fn test_spawn_error_not_found() {
        let err = Utils::spawn_error("ss", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, Error::ToolNotFound(ref tool) if tool == "ss"));

        let err = Utils::spawn_error("ss", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, Error::CommandFailed(_)));
    }

    #[test]
    fn test_locate_tool_fallback() {
        assert_eq!(Utils::locate_tool(&["/definitely/not/here/ss"], "ss"), "ss");
    }
}
