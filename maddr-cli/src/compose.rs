//! Composition: turn the run mode and discovered pieces into the final
//! address list. Pure assembly; callers do the I/O.

use maddr_core::{is_loopback, Multiaddr};

/// Discovery mode: local addresses plus the outbound address (when one was
/// resolved), minus loopbacks when hiding is requested. A failed outbound
/// lookup is simply absent from the candidate set.
pub fn assemble(
    local: Vec<Multiaddr>,
    outbound: Option<Multiaddr>,
    hide_loopback: bool,
) -> Vec<Multiaddr> {
    let mut addrs = local;
    addrs.extend(outbound);
    if hide_loopback {
        addrs.retain(|a| !is_loopback(a));
    }
    addrs
}
