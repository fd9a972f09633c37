//! Protocol registry: the table of known address protocols, looked up by
//! numeric code or by name. Immutable once handed to the codec.

use std::net::{Ipv4Addr, Ipv6Addr};

/// How a protocol's value is laid out in the binary form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// No value follows the protocol code (e.g. https, quic).
    None,
    /// Exactly this many value bytes follow the code.
    Fixed(usize),
    /// A varint length prefix, then that many value bytes.
    LengthPrefixed,
}

/// How a protocol's value converts between text and bytes. New protocols
/// pick one of these; the codec never has to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transcoder {
    /// Dotted-quad IPv4 <-> 4 bytes.
    Ip4,
    /// RFC 4291 IPv6 text <-> 16 bytes.
    Ip6,
    /// Decimal port <-> 2 bytes big-endian.
    Port,
    /// Non-empty UTF-8 text, stored as-is (dns names, peer IDs).
    Text,
}

impl Transcoder {
    /// Decode a text token into value bytes. Returns an error message
    /// describing why the token does not fit.
    pub fn text_to_bytes(&self, token: &str) -> Result<Vec<u8>, String> {
        match self {
            Transcoder::Ip4 => token
                .parse::<Ipv4Addr>()
                .map(|ip| ip.octets().to_vec())
                .map_err(|_| "invalid IPv4 address".to_string()),
            Transcoder::Ip6 => token
                .parse::<Ipv6Addr>()
                .map(|ip| ip.octets().to_vec())
                .map_err(|_| "invalid IPv6 address".to_string()),
            Transcoder::Port => token
                .parse::<u16>()
                .map(|port| port.to_be_bytes().to_vec())
                .map_err(|_| "invalid port number".to_string()),
            Transcoder::Text => {
                if token.is_empty() {
                    Err("empty value".to_string())
                } else {
                    Ok(token.as_bytes().to_vec())
                }
            }
        }
    }

    /// Render value bytes back to their text token. Fails on bytes that the
    /// transcoder could never have produced (wrong length, bad UTF-8).
    pub fn bytes_to_text(&self, bytes: &[u8]) -> Result<String, String> {
        match self {
            Transcoder::Ip4 => {
                let octets: [u8; 4] = bytes
                    .try_into()
                    .map_err(|_| "expected 4 bytes".to_string())?;
                Ok(Ipv4Addr::from(octets).to_string())
            }
            Transcoder::Ip6 => {
                let octets: [u8; 16] = bytes
                    .try_into()
                    .map_err(|_| "expected 16 bytes".to_string())?;
                Ok(Ipv6Addr::from(octets).to_string())
            }
            Transcoder::Port => {
                let raw: [u8; 2] = bytes
                    .try_into()
                    .map_err(|_| "expected 2 bytes".to_string())?;
                Ok(u16::from_be_bytes(raw).to_string())
            }
            Transcoder::Text => std::str::from_utf8(bytes)
                .map(str::to_string)
                .map_err(|_| "invalid UTF-8".to_string()),
        }
    }
}

/// One protocol entry: stable numeric code, canonical name, value layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Protocol {
    pub code: u32,
    pub name: &'static str,
    pub kind: ValueKind,
    /// Present iff `kind` is not `None`.
    pub transcoder: Option<Transcoder>,
}

/// Protocol codes from the multiformats table.
pub const IP4: u32 = 4;
pub const TCP: u32 = 6;
pub const IP6: u32 = 41;
pub const DNS: u32 = 53;
pub const DNS4: u32 = 54;
pub const DNS6: u32 = 55;
pub const UDP: u32 = 273;
pub const P2P: u32 = 421;
pub const HTTPS: u32 = 443;
pub const QUIC: u32 = 460;
pub const HTTP: u32 = 480;

const BUILTIN: &[Protocol] = &[
    Protocol {
        code: IP4,
        name: "ip4",
        kind: ValueKind::Fixed(4),
        transcoder: Some(Transcoder::Ip4),
    },
    Protocol {
        code: TCP,
        name: "tcp",
        kind: ValueKind::Fixed(2),
        transcoder: Some(Transcoder::Port),
    },
    Protocol {
        code: IP6,
        name: "ip6",
        kind: ValueKind::Fixed(16),
        transcoder: Some(Transcoder::Ip6),
    },
    Protocol {
        code: DNS,
        name: "dns",
        kind: ValueKind::LengthPrefixed,
        transcoder: Some(Transcoder::Text),
    },
    Protocol {
        code: DNS4,
        name: "dns4",
        kind: ValueKind::LengthPrefixed,
        transcoder: Some(Transcoder::Text),
    },
    Protocol {
        code: DNS6,
        name: "dns6",
        kind: ValueKind::LengthPrefixed,
        transcoder: Some(Transcoder::Text),
    },
    Protocol {
        code: UDP,
        name: "udp",
        kind: ValueKind::Fixed(2),
        transcoder: Some(Transcoder::Port),
    },
    Protocol {
        code: P2P,
        name: "p2p",
        kind: ValueKind::LengthPrefixed,
        transcoder: Some(Transcoder::Text),
    },
    Protocol {
        code: HTTPS,
        name: "https",
        kind: ValueKind::None,
        transcoder: None,
    },
    Protocol {
        code: QUIC,
        name: "quic",
        kind: ValueKind::None,
        transcoder: None,
    },
    Protocol {
        code: HTTP,
        name: "http",
        kind: ValueKind::None,
        transcoder: None,
    },
];

/// Lookup table for known protocols. Built once, then read-only; the codec
/// takes it by reference so tests can inject a custom table.
#[derive(Debug, Clone)]
pub struct Registry {
    protocols: Vec<Protocol>,
}

impl Registry {
    /// Registry with the built-in protocol table.
    pub fn new() -> Self {
        Self {
            protocols: BUILTIN.to_vec(),
        }
    }

    /// Add a protocol. Rejects duplicate codes or names.
    pub fn register(&mut self, proto: Protocol) -> Result<(), RegistryError> {
        if self.by_code(proto.code).is_ok() {
            return Err(RegistryError::DuplicateCode(proto.code));
        }
        if self.by_name(proto.name).is_ok() {
            return Err(RegistryError::DuplicateName(proto.name.to_string()));
        }
        self.protocols.push(proto);
        Ok(())
    }

    pub fn by_code(&self, code: u32) -> Result<&Protocol, RegistryError> {
        self.protocols
            .iter()
            .find(|p| p.code == code)
            .ok_or(RegistryError::UnknownCode(code))
    }

    pub fn by_name(&self, name: &str) -> Result<&Protocol, RegistryError> {
        self.protocols
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| RegistryError::UnknownName(name.to_string()))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown protocol code {0}")]
    UnknownCode(u32),
    #[error("unknown protocol name {0:?}")]
    UnknownName(String),
    #[error("protocol code {0} already registered")]
    DuplicateCode(u32),
    #[error("protocol name {0:?} already registered")]
    DuplicateName(String),
}
