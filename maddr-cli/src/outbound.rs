//! Externally observed address: ask a lookup service which IP we appear as.

use std::net::IpAddr;
use std::time::Duration;

use maddr_core::{Multiaddr, Registry};
use tracing::debug;

use crate::config::Config;

/// Best-effort outbound address lookup: one GET, bounded by the configured
/// timeout, body parsed as a bare IP literal. Any failure means "nothing to
/// report" and is logged at debug, never propagated.
pub fn resolve_outbound_addr(cfg: &Config, registry: &Registry) -> Option<Multiaddr> {
    match fetch_ip(cfg) {
        Ok(ip) => match Multiaddr::from_ip(ip, registry) {
            Ok(addr) => Some(addr),
            Err(e) => {
                debug!(%ip, error = %e, "outbound address not representable");
                None
            }
        },
        Err(e) => {
            debug!(url = %cfg.lookup_url, error = %e, "outbound lookup failed");
            None
        }
    }
}

fn fetch_ip(cfg: &Config) -> anyhow::Result<IpAddr> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(cfg.lookup_timeout_secs))
        .build()?;
    let body = client
        .get(&cfg.lookup_url)
        .send()?
        .error_for_status()?
        .text()?;
    let ip = body.trim().parse::<IpAddr>()?;
    Ok(ip)
}
