//! Render one multiaddr per line in the selected format.

use std::io::Write;

use maddr_core::Multiaddr;

use crate::config::OutputFormat;

/// Write `addr` to `w` followed by a newline. The `bytes` format writes the
/// raw canonical bytes, which may not be valid UTF-8.
pub fn write_addr(
    w: &mut impl Write,
    addr: &Multiaddr,
    format: OutputFormat,
) -> std::io::Result<()> {
    match format {
        OutputFormat::String => writeln!(w, "{addr}"),
        OutputFormat::Bytes => {
            w.write_all(&addr.to_bytes())?;
            writeln!(w)
        }
        OutputFormat::Hex => writeln!(w, "{}", addr.to_hex()),
        OutputFormat::Slice => writeln!(w, "{:?}", addr.to_bytes()),
    }
}
