//! Multiaddr reference implementation.
//! No I/O; hosts construct addresses from strings, bytes, or platform data.

pub mod classify;
pub mod registry;
pub mod varint;

pub mod addr;

pub use addr::{Component, DecodeError, Multiaddr, ParseError};
pub use classify::is_loopback;
pub use registry::{Protocol, Registry, RegistryError, Transcoder, ValueKind};
pub use varint::{decode_uvarint, encode_uvarint, VarintError};
