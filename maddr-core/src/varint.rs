//! Unsigned varint: 7 bits per byte, LSB first, high bit marks continuation.

/// Largest encoded length accepted (10 bytes cover u64; the tenth byte may
/// only contribute the top bit).
const MAX_VARINT_LEN: usize = 10;

/// Append the minimal varint encoding of `value` to `buf`.
pub fn encode_uvarint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            return;
        }
        buf.push(byte | 0x80);
    }
}

/// Decode one varint from the front of `bytes`. Returns the value and the
/// number of bytes consumed.
pub fn decode_uvarint(bytes: &[u8]) -> Result<(u64, usize), VarintError> {
    let mut value: u64 = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        if i >= MAX_VARINT_LEN || (i == MAX_VARINT_LEN - 1 && byte > 1) {
            return Err(VarintError::Overflow);
        }
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(VarintError::Truncated)
}

/// Error decoding a varint (input ends mid-varint, or value too wide for u64).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VarintError {
    #[error("varint truncated")]
    Truncated,
    #[error("varint overflows u64")]
    Overflow,
}
