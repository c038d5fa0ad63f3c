//! Portable probe that tries to bind the candidate port.

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, TcpListener};

use tracing::trace;

use crate::domain::ProbeOutcome;
use crate::ports::PortProbe;

const BIND_ADDRESSES: [IpAddr; 3] = [
    IpAddr::V4(Ipv4Addr::UNSPECIFIED),
    IpAddr::V4(Ipv4Addr::LOCALHOST),
    IpAddr::V6(Ipv6Addr::LOCALHOST),
];

/// Probe that binds the IPv4 wildcard, IPv4 loopback and IPv6 loopback
/// addresses in turn and releases each socket immediately.
///
/// Listeners on other specific addresses (a LAN IPv4 address, a global
/// IPv6 address) are not detected. On hosts without IPv6 the `[::1]`
/// attempt is skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct BindProbe;

impl BindProbe {
    pub fn new() -> Self {
        Self
    }

    fn try_bind(port: u16) -> ProbeOutcome {
        for address in BIND_ADDRESSES {
            match TcpListener::bind((address, port)) {
                Ok(socket) => drop(socket),
                Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
                    trace!(port, %address, "bind refused: address in use");
                    return ProbeOutcome::occupied();
                }
                Err(e) if address.is_ipv6() => {
                    trace!(port, %address, error = %e, "IPv6 loopback unavailable, skipped");
                }
                Err(e) => {
                    return ProbeOutcome::unknown(format!("bind {}:{} failed: {}", address, port, e));
                }
            }
        }
        ProbeOutcome::Free
    }
}

impl PortProbe for BindProbe {
    async fn probe(&self, port: u16) -> ProbeOutcome {
        Self::try_bind(port)
    }
}
