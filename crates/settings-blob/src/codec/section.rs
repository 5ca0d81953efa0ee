//! Base settings and filter settings sections of a block.
//!
//! Both start with a size field that bounds a child area, but their contents
//! differ:
//!
//! - base settings: `<diagnostic>\0<opaque payload>`
//! - filter settings: `<filter>\0<diagnostic>\0`, exactly filling the area

use std::borrow::Cow;

use crate::codec::area::Area;
use crate::codec::primitives::Writer;
use crate::error::{DecodeError, EncodeError};
use crate::filter::FilterValidator;
use crate::model::{BaseSettings, FilterSettings};

// =============================================================================
// DECODING
// =============================================================================

/// Decodes the base settings section from a block area.
pub fn decode_base_settings<'a>(block: &mut Area<'a>) -> Result<BaseSettings<'a>, DecodeError> {
    let size = block.read_size("base settings size")?;
    let mut area = block.carve(size, "base settings size", "base settings")?;

    let error = area.read_cstr("base settings error")?;
    let data = area.take_rest();

    Ok(BaseSettings {
        data: Cow::Borrowed(data),
        error: Cow::Borrowed(error),
    })
}

/// Decodes the filter settings section from a block area.
///
/// With a validator, a non-empty filter string must compile.
pub fn decode_filter_settings<'a>(
    block: &mut Area<'a>,
    validator: Option<&dyn FilterValidator>,
) -> Result<FilterSettings<'a>, DecodeError> {
    let size = block.read_size("filter settings size")?;
    let mut area = block.carve(size, "filter settings size", "filter settings")?;

    let filter = area.read_str("filter string")?;
    let error = area.read_cstr("filter settings error")?;
    area.finish()?;

    if let Some(validator) = validator {
        check_filter(filter, validator).map_err(|source| DecodeError::InvalidFilter {
            filter: filter.to_string(),
            source,
        })?;
    }

    Ok(FilterSettings {
        filter: Cow::Borrowed(filter),
        error: Cow::Borrowed(error),
    })
}

fn check_filter(
    filter: &str,
    validator: &dyn FilterValidator,
) -> Result<(), crate::error::FilterSyntaxError> {
    if filter.is_empty() {
        return Ok(());
    }
    validator.validate(filter)
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writes the base settings section, size field included.
pub fn encode_base_settings(writer: &mut Writer, base: &BaseSettings) -> Result<(), EncodeError> {
    writer.write_len(base.encoded_len());
    writer.write_cstr(&base.error, "base settings error")?;
    writer.write_bytes(&base.data);
    Ok(())
}

/// Writes the filter settings section, size field included.
pub fn encode_filter_settings(
    writer: &mut Writer,
    settings: &FilterSettings,
    validator: &dyn FilterValidator,
) -> Result<(), EncodeError> {
    check_filter(&settings.filter, validator).map_err(|source| EncodeError::InvalidFilter {
        filter: settings.filter.to_string(),
        source,
    })?;
    writer.write_len(settings.encoded_len());
    writer.write_cstr(settings.filter.as_bytes(), "filter string")?;
    writer.write_cstr(&settings.error, "filter settings error")?;
    Ok(())
}
