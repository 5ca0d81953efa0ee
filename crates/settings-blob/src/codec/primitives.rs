//! Primitive field encoding/decoding for the settings blob format.
//!
//! Two kinds of fields exist on the wire: 8-byte big-endian sizes and
//! NUL-terminated strings.

use crate::codec::area::Area;
use crate::error::{DecodeError, EncodeError};
use crate::limits::SIZE_FIELD_LEN;

// =============================================================================
// DECODING
// =============================================================================

impl<'a> Area<'a> {
    /// Reads a big-endian `u64` size field.
    ///
    /// Fails with [`DecodeError::AreaTooSmall`] when fewer than eight bytes
    /// are left.
    #[inline]
    pub fn read_size(&mut self, field: &'static str) -> Result<u64, DecodeError> {
        if self.remaining_len() < SIZE_FIELD_LEN {
            return Err(DecodeError::AreaTooSmall {
                field,
                area: self.name(),
                available: self.remaining_len(),
            });
        }
        let bytes = self.take(SIZE_FIELD_LEN, field)?;
        let mut raw = [0u8; SIZE_FIELD_LEN];
        raw.copy_from_slice(bytes);
        Ok(u64::from_be_bytes(raw))
    }

    /// Reads a NUL-terminated field, returning it without the terminator.
    ///
    /// A field with no NUL before the end of the area extends past the area,
    /// and is reported as [`DecodeError::OutsideArea`].
    #[inline]
    pub fn read_cstr(&mut self, field: &'static str) -> Result<&'a [u8], DecodeError> {
        let len = self
            .remaining()
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| self.outside(field))?;
        let bytes = self.take(len + 1, field)?;
        Ok(&bytes[..len])
    }

    /// Reads a NUL-terminated UTF-8 string (block names, filter strings).
    pub fn read_str(&mut self, field: &'static str) -> Result<&'a str, DecodeError> {
        let bytes = self.read_cstr(field)?;
        std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8 { field })
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writer for encoding binary data.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Creates a new writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates a new writer with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Writes raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a big-endian `u64` size field.
    #[inline]
    pub fn write_size(&mut self, size: u64) {
        self.buf.extend_from_slice(&size.to_be_bytes());
    }

    /// Writes a size field holding `len`.
    pub fn write_len(&mut self, len: usize) {
        self.write_size(len as u64);
    }

    /// Writes a field followed by its NUL terminator.
    pub fn write_cstr(&mut self, bytes: &[u8], field: &'static str) -> Result<(), EncodeError> {
        if bytes.contains(&0) {
            return Err(EncodeError::EmbeddedNul { field });
        }
        self.buf.extend_from_slice(bytes);
        self.buf.push(0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_is_big_endian() {
        let mut writer = Writer::new();
        writer.write_size(0x0102);
        let bytes = writer.into_bytes();
        assert_eq!(bytes, [0, 0, 0, 0, 0, 0, 1, 2]);

        let mut area = Area::new(&bytes, "test");
        assert_eq!(area.read_size("size").unwrap(), 0x0102);
        assert!(area.is_empty());
    }

    #[test]
    fn test_size_truncated() {
        let data = [0u8; 7];
        let mut area = Area::new(&data, "test");
        let err = area.read_size("block size").unwrap_err();
        assert_eq!(
            err,
            DecodeError::AreaTooSmall { field: "block size", area: "test", available: 7 }
        );
        assert!(err.to_string().contains("Area too small when reading size of 'block size'"));
    }

    #[test]
    fn test_cstr_stops_at_first_nul() {
        let data = b"ab\0cd\0";
        let mut area = Area::new(data, "test");
        assert_eq!(area.read_cstr("first").unwrap(), b"ab");
        assert_eq!(area.read_str("second").unwrap(), "cd");
        assert!(area.is_empty());
    }

    #[test]
    fn test_cstr_empty_string() {
        let mut area = Area::new(b"\0", "test");
        assert_eq!(area.read_str("field").unwrap(), "");
    }

    #[test]
    fn test_cstr_missing_terminator() {
        let data = b"abc\0";
        let mut parent = Area::new(data, "parent");
        // The NUL sits just outside the carved area and must not be found.
        let mut child = parent.carve(3, "child size", "child").unwrap();
        let err = child.read_cstr("name").unwrap_err();
        assert!(matches!(err, DecodeError::OutsideArea { field: "name", area: "child", .. }));
    }

    #[test]
    fn test_cstr_on_empty_area() {
        let mut area = Area::new(b"", "test");
        let err = area.read_str("block name").unwrap_err();
        assert!(err.to_string().contains("'block name' points outside area"));
    }

    #[test]
    fn test_str_invalid_utf8() {
        let mut area = Area::new(b"\xff\0", "test");
        assert_eq!(
            area.read_str("field"),
            Err(DecodeError::InvalidUtf8 { field: "field" })
        );
    }

    #[test]
    fn test_cstr_keeps_non_utf8_bytes() {
        let mut area = Area::new(b"caf\xe9\0", "test");
        assert_eq!(area.read_cstr("base settings error").unwrap(), b"caf\xe9");
    }

    #[test]
    fn test_write_cstr_rejects_nul() {
        let mut writer = Writer::new();
        writer.write_cstr(b"ok", "field").unwrap();
        assert_eq!(
            writer.write_cstr(b"a\0b", "field"),
            Err(EncodeError::EmbeddedNul { field: "field" })
        );
        assert_eq!(writer.len(), 3);
        assert_eq!(writer.into_bytes(), b"ok\0");
    }
}
