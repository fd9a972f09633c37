//! Address classification. Pure functions over the decoded component stack.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::addr::Multiaddr;
use crate::registry::{IP4, IP6};

/// True iff the first component is an IPv4 address in 127.0.0.0/8 or the
/// IPv6 address ::1.
pub fn is_loopback(addr: &Multiaddr) -> bool {
    let Some(first) = addr.components().first() else {
        return false;
    };
    match first.protocol.code {
        IP4 => {
            let Ok(octets) = <[u8; 4]>::try_from(first.value.as_slice()) else {
                return false;
            };
            Ipv4Addr::from(octets).is_loopback()
        }
        IP6 => {
            let Ok(octets) = <[u8; 16]>::try_from(first.value.as_slice()) else {
                return false;
            };
            Ipv6Addr::from(octets) == Ipv6Addr::LOCALHOST
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    fn parsed(s: &str) -> Multiaddr {
        Multiaddr::parse(s, &Registry::new()).unwrap()
    }

    #[test]
    fn ip4_loopback_block() {
        assert!(is_loopback(&parsed("/ip4/127.0.0.1")));
        assert!(is_loopback(&parsed("/ip4/127.255.0.3/tcp/80")));
        assert!(!is_loopback(&parsed("/ip4/10.0.0.1")));
        assert!(!is_loopback(&parsed("/ip4/126.255.255.255")));
    }

    #[test]
    fn ip6_loopback_is_exact() {
        assert!(is_loopback(&parsed("/ip6/::1")));
        assert!(!is_loopback(&parsed("/ip6/::2")));
        assert!(!is_loopback(&parsed("/ip6/fe80::1")));
    }

    #[test]
    fn non_ip_first_component() {
        assert!(!is_loopback(&parsed("/dns/localhost/tcp/80")));
    }
}
