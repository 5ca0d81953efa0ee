//! Settings block encoding/decoding.
//!
//! ```text
//! <block size: u64>
//!   <block name>\0
//!   <base settings size: u64> <base settings>
//!   <filter settings size: u64> <filter settings>
//! ```

use std::borrow::Cow;

use rustc_hash::FxHashSet;
use tracing::trace;

use crate::codec::area::Area;
use crate::codec::primitives::Writer;
use crate::codec::section::{
    decode_base_settings, decode_filter_settings, encode_base_settings, encode_filter_settings,
};
use crate::error::{DecodeError, EncodeError};
use crate::filter::FilterValidator;
use crate::limits::DecodeOptions;
use crate::model::Block;

/// Tracks block names already seen in one blob.
#[derive(Debug, Default)]
pub struct BlockNames<'a> {
    seen: FxHashSet<&'a str>,
}

impl<'a> BlockNames<'a> {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `name`, failing if it was recorded before.
    pub fn insert(&mut self, name: &'a str) -> Result<(), DecodeError> {
        if self.seen.insert(name) {
            Ok(())
        } else {
            Err(DecodeError::DuplicateBlock {
                name: name.to_string(),
            })
        }
    }

    /// Number of distinct names recorded.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns true if no name was recorded.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes the next block from the blob area.
///
/// The name must be non-empty, and is checked against `names` as soon as it
/// is read, before the rest of the block is looked at.
pub fn decode_block<'a>(
    blob: &mut Area<'a>,
    names: &mut BlockNames<'a>,
    options: &DecodeOptions,
    validator: &dyn FilterValidator,
) -> Result<Block<'a>, DecodeError> {
    let size = blob.read_size("block size")?;
    let mut block = blob.carve(size, "block size", "settings block")?;

    // A non-empty block always ends with the NUL of its last string.
    if block.last_byte().is_some_and(|b| b != 0) {
        return Err(DecodeError::BlockNotNulTerminated {
            offset: block.end_offset() - 1,
        });
    }

    let name_offset = block.offset();
    let name = block.read_str("block name")?;
    if name.is_empty() {
        return Err(DecodeError::EmptyBlockName {
            offset: name_offset,
        });
    }
    names.insert(name)?;

    let base = decode_base_settings(&mut block)?;
    let validator = options.validate_filters.then_some(validator);
    let filter = decode_filter_settings(&mut block, validator)?;

    if options.allow_trailing_block_data {
        let skipped = block.take_rest();
        if !skipped.is_empty() {
            trace!(block = name, bytes = skipped.len(), "skipping trailing block data");
        }
    } else {
        block.finish()?;
    }

    trace!(
        block = name,
        base_settings_len = base.data.len(),
        filter = %filter.filter,
        "decoded settings block"
    );

    Ok(Block {
        name: Cow::Borrowed(name),
        base,
        filter,
    })
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writes one block, size field included.
pub fn encode_block(
    writer: &mut Writer,
    block: &Block,
    validator: &dyn FilterValidator,
) -> Result<(), EncodeError> {
    if block.name.is_empty() {
        return Err(EncodeError::EmptyBlockName);
    }
    writer.write_len(block.encoded_len());
    writer.write_cstr(block.name.as_bytes(), "block name")?;
    encode_base_settings(writer, &block.base)?;
    encode_filter_settings(writer, &block.filter, validator)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::EventFilterSyntax;
    use crate::model::{BaseSettings, FilterSettings};

    fn encoded(block: &Block) -> Vec<u8> {
        let mut writer = Writer::new();
        encode_block(&mut writer, block, &EventFilterSyntax).unwrap();
        writer.into_bytes()
    }

    fn decode_one(data: &[u8], options: DecodeOptions) -> Result<Block<'_>, DecodeError> {
        let mut area = Area::new(data, "config blob");
        let mut names = BlockNames::new();
        decode_block(&mut area, &mut names, &options, &EventFilterSyntax)
    }

    #[test]
    fn test_block_roundtrip() {
        let block = Block {
            name: Cow::Borrowed("imap"),
            base: BaseSettings { data: Cow::Borrowed(b"a=1\0b=2"), error: Cow::Borrowed(b"") },
            filter: FilterSettings { filter: Cow::Borrowed("protocol=imap"), error: Cow::Borrowed(b"x") },
        };
        let data = encoded(&block);
        assert_eq!(data.len(), 8 + block.encoded_len());
        assert_eq!(decode_one(&data, DecodeOptions::default()).unwrap(), block);
    }

    #[test]
    fn test_block_not_nul_terminated() {
        let mut data = Vec::new();
        data.extend_from_slice(&1u64.to_be_bytes());
        data.extend_from_slice(b"N\0");
        let err = decode_one(&data, DecodeOptions::default()).unwrap_err();
        assert_eq!(err, DecodeError::BlockNotNulTerminated { offset: 8 });
        assert!(err.to_string().contains("Settings block doesn't end with NUL at offset"));
    }

    #[test]
    fn test_empty_block_reports_name() {
        let data = 0u64.to_be_bytes();
        let err = decode_one(&data, DecodeOptions::default()).unwrap_err();
        assert!(err.to_string().contains("'block name' points outside area"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut data = encoded(&Block::new("N"));
        // Drop the name byte but keep its NUL, shrinking the block by one.
        data.remove(8);
        let size = u64::from_be_bytes(data[..8].try_into().unwrap()) - 1;
        data[..8].copy_from_slice(&size.to_be_bytes());

        let err = decode_one(&data, DecodeOptions::default()).unwrap_err();
        assert_eq!(err, DecodeError::EmptyBlockName { offset: 8 });
        assert_eq!(err.kind(), crate::error::ErrorKind::Malformed);
    }

    #[test]
    fn test_name_must_be_utf8() {
        let mut data = encoded(&Block::new("N"));
        data[8] = 0xff;
        let err = decode_one(&data, DecodeOptions::default()).unwrap_err();
        assert_eq!(err, DecodeError::InvalidUtf8 { field: "block name" });
    }

    #[test]
    fn test_trailing_block_data() {
        let block = Block::new("N");
        let mut data = encoded(&block);
        let size = block.encoded_len() as u64 + 1;
        data[..8].copy_from_slice(&size.to_be_bytes());
        data.push(0);

        let err = decode_one(&data, DecodeOptions::default()).unwrap_err();
        assert!(matches!(err, DecodeError::TrailingBytes { area: "settings block", count: 1, .. }));

        let decoded = decode_one(&data, DecodeOptions::forward_compatible()).unwrap();
        assert_eq!(decoded, block);
    }

    #[test]
    fn test_duplicate_detected_before_body() {
        let mut data = encoded(&Block::new("N"));
        // Second block carries only its name.
        data.extend_from_slice(&2u64.to_be_bytes());
        data.extend_from_slice(b"N\0");

        let mut area = Area::new(&data, "config blob");
        let mut names = BlockNames::new();
        let options = DecodeOptions::default();
        decode_block(&mut area, &mut names, &options, &EventFilterSyntax).unwrap();
        let err = decode_block(&mut area, &mut names, &options, &EventFilterSyntax).unwrap_err();
        assert_eq!(err, DecodeError::DuplicateBlock { name: "N".to_string() });
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_filter_validation_can_be_disabled() {
        let mut data = Vec::new();
        data.extend_from_slice(&22u64.to_be_bytes());
        data.extend_from_slice(b"N\0");
        data.extend_from_slice(&1u64.to_be_bytes());
        data.push(0);
        data.extend_from_slice(&3u64.to_be_bytes());
        data.extend_from_slice(b"F\0\0");

        assert!(matches!(
            decode_one(&data, DecodeOptions::default()),
            Err(DecodeError::InvalidFilter { .. })
        ));
        let block = decode_one(&data, DecodeOptions::new().without_filter_validation()).unwrap();
        assert_eq!(block.filter.filter, "F");
    }

    #[test]
    fn test_encode_rejects_bad_names() {
        let mut writer = Writer::new();
        assert_eq!(
            encode_block(&mut writer, &Block::new(""), &EventFilterSyntax),
            Err(EncodeError::EmptyBlockName)
        );
        assert_eq!(
            encode_block(&mut writer, &Block::new("a\0b"), &EventFilterSyntax),
            Err(EncodeError::EmbeddedNul { field: "block name" })
        );
    }
}
