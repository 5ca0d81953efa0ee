//! Whole-blob encoding/decoding.
//!
//! ```text
//! DOVECOT-CONFIG\t<version>\n
//! <full size: u64>
//! <block>*
//! ```
//!
//! `full size` must equal the number of bytes following it. Decoding is
//! bounded by that verified length, so no size field can make the decoder
//! read, or allocate for, bytes that are not there.

use std::borrow::Cow;

use tracing::debug;

use crate::codec::area::Area;
use crate::codec::block::{decode_block, encode_block, BlockNames};
use crate::codec::header::{decode_header, encode_header};
use crate::codec::primitives::Writer;
use crate::error::{DecodeError, EncodeError};
use crate::filter::{EventFilterSyntax, FilterValidator};
use crate::limits::{DecodeOptions, HEADER_MAGIC, SIZE_FIELD_LEN};
use crate::model::ConfigBlob;

// =============================================================================
// DECODING
// =============================================================================

/// Decodes a blob with default options and the built-in event filter syntax.
///
/// The result borrows strings and payloads from `input`.
pub fn decode_blob(input: &[u8]) -> Result<ConfigBlob<'_>, DecodeError> {
    decode_blob_with(input, &DecodeOptions::default(), &EventFilterSyntax)
}

/// Decodes a blob with explicit options and filter validator.
pub fn decode_blob_with<'a>(
    input: &'a [u8],
    options: &DecodeOptions,
    validator: &dyn FilterValidator,
) -> Result<ConfigBlob<'a>, DecodeError> {
    let (version, body_offset) = decode_header(input)?;

    let mut file = Area::starting_at(input, body_offset, "config file");
    let full_size = file.read_size("full size")?;
    if full_size != file.remaining_len() as u64 {
        return Err(DecodeError::FullSizeMismatch {
            declared: full_size,
            actual: file.remaining_len(),
        });
    }

    let mut names = BlockNames::new();
    let mut blocks = Vec::new();
    while !file.is_empty() {
        blocks.push(decode_block(&mut file, &mut names, options, validator)?);
    }

    debug!(version, blocks = blocks.len(), bytes = input.len(), "decoded config blob");

    Ok(ConfigBlob {
        version: Cow::Borrowed(version),
        blocks,
    })
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes a blob, validating filters with the built-in event filter syntax.
pub fn encode_blob(blob: &ConfigBlob) -> Result<Vec<u8>, EncodeError> {
    encode_blob_with(blob, &EventFilterSyntax)
}

/// Encodes a blob with an explicit filter validator.
///
/// Fails on anything the decoder would reject: unsupported version, empty
/// or duplicate block names, embedded NULs and invalid filters.
pub fn encode_blob_with(
    blob: &ConfigBlob,
    validator: &dyn FilterValidator,
) -> Result<Vec<u8>, EncodeError> {
    let mut seen = rustc_hash::FxHashSet::default();
    for name in blob.names() {
        if !seen.insert(name) {
            return Err(EncodeError::DuplicateBlock {
                name: name.to_string(),
            });
        }
    }

    let full_size = blob.full_size();
    let capacity = HEADER_MAGIC.len() + blob.version.len() + 2 + SIZE_FIELD_LEN + full_size as usize;
    let mut writer = Writer::with_capacity(capacity);

    encode_header(&mut writer, &blob.version)?;
    writer.write_size(full_size);
    for block in &blob.blocks {
        encode_block(&mut writer, block, validator)?;
    }

    debug!(blocks = blob.len(), bytes = writer.len(), "encoded config blob");

    Ok(writer.into_bytes())
}
