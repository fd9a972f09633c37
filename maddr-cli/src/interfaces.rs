//! Local interface enumeration: one multiaddr per bound address.

use maddr_core::{Multiaddr, Registry};
use tracing::debug;

/// Platform could not list interfaces at all. Individual addresses that
/// cannot be expressed are skipped instead.
#[derive(Debug, thiserror::Error)]
#[error("cannot enumerate network interfaces: {0}")]
pub struct EnumerateError(#[from] std::io::Error);

/// List every bound address on every local interface as a multiaddr.
/// No transport component is added; no port is known at this layer.
/// Best effort: an address the registry cannot express is skipped and
/// logged, not fatal.
pub fn list_local_addrs(registry: &Registry) -> Result<Vec<Multiaddr>, EnumerateError> {
    let ifaces = if_addrs::get_if_addrs()?;
    let mut out = Vec::new();
    let mut skipped = 0usize;
    for iface in ifaces {
        match Multiaddr::from_ip(iface.ip(), registry) {
            Ok(addr) => out.push(addr),
            Err(e) => {
                skipped += 1;
                debug!(iface = %iface.name, ip = %iface.ip(), error = %e, "skipping address");
            }
        }
    }
    if skipped > 0 {
        debug!(skipped, "some interface addresses were not representable");
    }
    Ok(out)
}
