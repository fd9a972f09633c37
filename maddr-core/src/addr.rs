//! Multiaddr codec: slash-delimited text form and canonical binary form.
//!
//! Binary layout per component: varint protocol code, then the value bytes
//! (fixed-size values raw, variable-size values behind a varint length).
//! Equality is component-wise on (code, value bytes), which matches equality
//! of the canonical binary form.

use std::fmt;
use std::net::IpAddr;

use crate::registry::{Protocol, Registry, RegistryError, ValueKind};
use crate::varint::{decode_uvarint, encode_uvarint, VarintError};

/// One protocol/value pair. Value bytes are already decoded from the text or
/// binary form (e.g. 4 raw bytes for ip4, UTF-8 bytes for dns).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub protocol: Protocol,
    pub value: Vec<u8>,
}

/// An ordered, non-empty stack of components, outermost protocol first.
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multiaddr {
    components: Vec<Component>,
}

impl Multiaddr {
    /// Parse the slash-delimited text form, e.g. `/ip4/1.2.3.4/tcp/80`.
    /// Protocol names resolve through `registry`; a trailing `/` is tolerated.
    pub fn parse(s: &str, registry: &Registry) -> Result<Self, ParseError> {
        if s.is_empty() {
            return Err(ParseError::Empty);
        }
        let Some(rest) = s.strip_prefix('/') else {
            return Err(ParseError::MissingLeadingSlash);
        };
        let rest = rest.trim_end_matches('/');
        if rest.is_empty() {
            return Err(ParseError::Empty);
        }
        let mut tokens = rest.split('/');
        let mut components = Vec::new();
        while let Some(name) = tokens.next() {
            let proto = *registry
                .by_name(name)
                .map_err(|_| ParseError::UnknownProtocol(name.to_string()))?;
            let value = match proto.transcoder {
                None => Vec::new(),
                Some(tc) => {
                    let token = tokens
                        .next()
                        .ok_or_else(|| ParseError::MissingValue(name.to_string()))?;
                    tc.text_to_bytes(token)
                        .map_err(|reason| ParseError::InvalidValue {
                            proto: name.to_string(),
                            token: token.to_string(),
                            reason,
                        })?
                }
            };
            components.push(Component {
                protocol: proto,
                value,
            });
        }
        Ok(Self { components })
    }

    /// Decode the canonical binary form. The whole input must be consumed;
    /// a component that runs past the end of the buffer is an error.
    pub fn from_bytes(bytes: &[u8], registry: &Registry) -> Result<Self, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::Empty);
        }
        let mut components = Vec::new();
        let mut offset = 0;
        while offset < bytes.len() {
            let (code, n) = decode_uvarint(&bytes[offset..])?;
            offset += n;
            let code = u32::try_from(code).map_err(|_| DecodeError::UnknownCode(code))?;
            let proto = *registry
                .by_code(code)
                .map_err(|_| DecodeError::UnknownCode(code.into()))?;
            let len = match proto.kind {
                ValueKind::None => 0,
                ValueKind::Fixed(len) => len,
                ValueKind::LengthPrefixed => {
                    let (len, n) = decode_uvarint(&bytes[offset..])?;
                    offset += n;
                    usize::try_from(len).map_err(|_| DecodeError::Truncated)?
                }
            };
            let end = offset.checked_add(len).ok_or(DecodeError::Truncated)?;
            let value = bytes
                .get(offset..end)
                .ok_or(DecodeError::Truncated)?
                .to_vec();
            offset = end;
            if let Some(tc) = proto.transcoder {
                // Value bytes must render back to text, otherwise the text
                // round trip is lossy.
                tc.bytes_to_text(&value)
                    .map_err(|reason| DecodeError::InvalidValue {
                        proto: proto.name,
                        reason,
                    })?;
            }
            components.push(Component {
                protocol: proto,
                value,
            });
        }
        Ok(Self { components })
    }

    /// Wrap a bare IP address as a one-component multiaddr. Fails only when
    /// the registry does not carry the address family.
    pub fn from_ip(ip: IpAddr, registry: &Registry) -> Result<Self, RegistryError> {
        let (name, value) = match ip {
            IpAddr::V4(v4) => ("ip4", v4.octets().to_vec()),
            IpAddr::V6(v6) => ("ip6", v6.octets().to_vec()),
        };
        let proto = *registry.by_name(name)?;
        Ok(Self {
            components: vec![Component {
                protocol: proto,
                value,
            }],
        })
    }

    /// Canonical binary form: varint code, then raw or length-prefixed value
    /// per component. Two multiaddrs are equal iff these bytes are equal.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for c in &self.components {
            encode_uvarint(c.protocol.code.into(), &mut out);
            match c.protocol.kind {
                ValueKind::None | ValueKind::Fixed(_) => out.extend_from_slice(&c.value),
                ValueKind::LengthPrefixed => {
                    encode_uvarint(c.value.len() as u64, &mut out);
                    out.extend_from_slice(&c.value);
                }
            }
        }
        out
    }

    /// Lowercase hex of the canonical binary form, `0x`-prefixed.
    pub fn to_hex(&self) -> String {
        let bytes = self.to_bytes();
        let mut out = String::with_capacity(2 + bytes.len() * 2);
        out.push_str("0x");
        for b in bytes {
            out.push_str(&format!("{:02x}", b));
        }
        out
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }
}

impl fmt::Display for Multiaddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.components {
            write!(f, "/{}", c.protocol.name)?;
            if let Some(tc) = c.protocol.transcoder {
                // from_bytes and parse both validated the value, so
                // rendering cannot fail on a constructed Multiaddr.
                let text = tc.bytes_to_text(&c.value).map_err(|_| fmt::Error)?;
                write!(f, "/{}", text)?;
            }
        }
        Ok(())
    }
}

/// Error parsing the text form. Carries the offending token.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty multiaddr")]
    Empty,
    #[error("multiaddr must begin with /")]
    MissingLeadingSlash,
    #[error("unknown protocol {0:?}")]
    UnknownProtocol(String),
    #[error("protocol {0:?} requires a value")]
    MissingValue(String),
    #[error("invalid {proto} value {token:?}: {reason}")]
    InvalidValue {
        proto: String,
        token: String,
        reason: String,
    },
}

/// Error decoding the binary form. Never silently drops data.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("empty multiaddr")]
    Empty,
    #[error("bad varint: {0}")]
    BadVarint(#[from] VarintError),
    #[error("unknown protocol code {0}")]
    UnknownCode(u64),
    #[error("truncated value")]
    Truncated,
    #[error("invalid {proto} value: {reason}")]
    InvalidValue {
        proto: &'static str,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    fn reg() -> Registry {
        Registry::new()
    }

    #[test]
    fn parse_ip4_tcp() {
        let m = Multiaddr::parse("/ip4/127.0.0.1/tcp/80", &reg()).unwrap();
        assert_eq!(m.components().len(), 2);
        assert_eq!(m.components()[0].value, vec![127, 0, 0, 1]);
        assert_eq!(m.components()[1].value, vec![0, 80]);
        assert_eq!(m.to_string(), "/ip4/127.0.0.1/tcp/80");
    }

    #[test]
    fn parse_tolerates_trailing_slash() {
        let reg = reg();
        let a = Multiaddr::parse("/ip4/1.2.3.4/", &reg).unwrap();
        let b = Multiaddr::parse("/ip4/1.2.3.4", &reg).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parse_valueless_protocol() {
        let m = Multiaddr::parse("/ip4/1.2.3.4/tcp/443/https", &reg()).unwrap();
        assert_eq!(m.components()[2].value, Vec::<u8>::new());
        assert_eq!(m.to_string(), "/ip4/1.2.3.4/tcp/443/https");
    }

    #[test]
    fn parse_rejects_unknown_protocol() {
        assert_eq!(
            Multiaddr::parse("/ip9/1.2.3.4", &reg()),
            Err(ParseError::UnknownProtocol("ip9".to_string()))
        );
    }

    #[test]
    fn parse_rejects_bad_octet() {
        assert!(matches!(
            Multiaddr::parse("/ip4/999.1.1.1", &reg()),
            Err(ParseError::InvalidValue { .. })
        ));
    }

    #[test]
    fn parse_rejects_missing_value() {
        assert_eq!(
            Multiaddr::parse("/ip4", &reg()),
            Err(ParseError::MissingValue("ip4".to_string()))
        );
    }

    #[test]
    fn parse_rejects_empty_and_relative() {
        assert_eq!(Multiaddr::parse("", &reg()), Err(ParseError::Empty));
        assert_eq!(
            Multiaddr::parse("ip4/1.2.3.4", &reg()),
            Err(ParseError::MissingLeadingSlash)
        );
        assert_eq!(Multiaddr::parse("/", &reg()), Err(ParseError::Empty));
    }

    #[test]
    fn binary_layout_ip4_tcp() {
        let m = Multiaddr::parse("/ip4/1.2.3.4/tcp/80", &reg()).unwrap();
        assert_eq!(m.to_bytes(), vec![0x04, 1, 2, 3, 4, 0x06, 0, 80]);
    }

    #[test]
    fn binary_layout_length_prefixed() {
        let m = Multiaddr::parse("/dns/example.com/tcp/443", &reg()).unwrap();
        let mut expected = vec![53, 11];
        expected.extend_from_slice(b"example.com");
        expected.extend_from_slice(&[0x06, 1, 187]);
        assert_eq!(m.to_bytes(), expected);
    }

    #[test]
    fn bytes_roundtrip() {
        let reg = reg();
        for s in [
            "/ip4/1.2.3.4/tcp/80",
            "/ip6/::1",
            "/dns/example.com/tcp/443/https",
            "/ip4/10.0.0.1/udp/4001/quic",
            "/p2p/QmYyQSo1c1Ym7orWxLYvCrM2EmxFTANf8wXmmE7DWjhx5N",
        ] {
            let m = Multiaddr::parse(s, &reg).unwrap();
            let back = Multiaddr::from_bytes(&m.to_bytes(), &reg).unwrap();
            assert_eq!(back, m);
            assert_eq!(Multiaddr::parse(&m.to_string(), &reg).unwrap(), m);
        }
    }

    #[test]
    fn to_bytes_deterministic() {
        let reg = reg();
        let a = Multiaddr::parse("/ip4/1.2.3.4/tcp/80", &reg).unwrap();
        let b = Multiaddr::parse("/ip4/1.2.3.4/tcp/80", &reg).unwrap();
        assert_eq!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn from_bytes_rejects_truncated() {
        let reg = reg();
        let m = Multiaddr::parse("/ip4/1.2.3.4", &reg).unwrap();
        let bytes = m.to_bytes();
        assert_eq!(
            Multiaddr::from_bytes(&bytes[..bytes.len() - 1], &reg),
            Err(DecodeError::Truncated)
        );
    }

    #[test]
    fn from_bytes_rejects_trailing_garbage() {
        let reg = reg();
        let mut bytes = Multiaddr::parse("/ip4/1.2.3.4", &reg).unwrap().to_bytes();
        // A lone continuation byte after a valid component.
        bytes.push(0x80);
        assert!(Multiaddr::from_bytes(&bytes, &reg).is_err());
    }

    #[test]
    fn from_bytes_rejects_unknown_code() {
        let reg = reg();
        assert_eq!(
            Multiaddr::from_bytes(&[0x7b], &reg),
            Err(DecodeError::UnknownCode(123))
        );
    }

    #[test]
    fn from_bytes_rejects_empty() {
        assert_eq!(
            Multiaddr::from_bytes(&[], &reg()),
            Err(DecodeError::Empty)
        );
    }

    #[test]
    fn hex_form() {
        let reg = reg();
        let m = Multiaddr::parse("/ip4/1.2.3.4/tcp/80", &reg).unwrap();
        let hex = m.to_hex();
        assert_eq!(hex, "0x0401020304060050");
        let raw: Vec<u8> = (1..hex.len() / 2)
            .map(|i| u8::from_str_radix(&hex[2 * i..2 * i + 2], 16).unwrap())
            .collect();
        assert_eq!(Multiaddr::from_bytes(&raw, &reg).unwrap(), m);
    }

    #[test]
    fn from_ip_both_families() {
        let reg = reg();
        let v4 = Multiaddr::from_ip("192.168.1.10".parse().unwrap(), &reg).unwrap();
        assert_eq!(v4.to_string(), "/ip4/192.168.1.10");
        let v6 = Multiaddr::from_ip("::1".parse().unwrap(), &reg).unwrap();
        assert_eq!(v6.to_string(), "/ip6/::1");
    }

    #[test]
    fn ip6_text_roundtrip() {
        let reg = reg();
        let m = Multiaddr::parse("/ip6/2001:db8::1/tcp/8080", &reg).unwrap();
        assert_eq!(m.to_string(), "/ip6/2001:db8::1/tcp/8080");
        assert_eq!(Multiaddr::from_bytes(&m.to_bytes(), &reg).unwrap(), m);
    }
}
