//! Header line: `DOVECOT-CONFIG\t<version>\n`.

use crate::codec::primitives::Writer;
use crate::error::{DecodeError, EncodeError};
use crate::limits::{is_supported_version, HEADER_MAGIC};

/// Parses the header line, returning the version and the offset just past
/// the newline.
pub fn decode_header(input: &[u8]) -> Result<(&str, usize), DecodeError> {
    let newline = input
        .iter()
        .position(|&b| b == b'\n')
        .ok_or(DecodeError::InvalidHeader)?;
    let line = &input[..newline];

    let version = line
        .strip_prefix(HEADER_MAGIC)
        .and_then(|rest| rest.strip_prefix(b"\t"))
        .ok_or(DecodeError::InvalidHeader)?;

    match std::str::from_utf8(version) {
        Ok(version) if is_supported_version(version) => Ok((version, newline + 1)),
        _ => Err(DecodeError::UnsupportedVersion {
            version: String::from_utf8_lossy(version).into_owned(),
        }),
    }
}

/// Writes the header line for `version`.
pub fn encode_header(writer: &mut Writer, version: &str) -> Result<(), EncodeError> {
    if !is_supported_version(version) {
        return Err(EncodeError::UnsupportedVersion {
            version: version.to_string(),
        });
    }
    writer.write_bytes(HEADER_MAGIC);
    writer.write_bytes(b"\t");
    writer.write_bytes(version.as_bytes());
    writer.write_bytes(b"\n");
    Ok(())
}
