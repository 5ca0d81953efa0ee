//! Bounds-checked areas over the input buffer.
//!
//! An [`Area`] is a named window `[offset, end_offset)` into the full input.
//! Every read consumes from the front of the window and fails, naming the
//! field and the area, when the window is too short. Nothing ever reads past
//! `end_offset`, whatever lies beyond it in the buffer.
//!
//! Sub-areas are carved with an explicit length; they borrow the same buffer,
//! so a declared length never drives an allocation.

use crate::error::DecodeError;

/// A named, bounds-checked byte range used while decoding.
#[derive(Debug, Clone)]
pub struct Area<'a> {
    buf: &'a [u8],
    name: &'static str,
    pos: usize,
    end: usize,
}

impl<'a> Area<'a> {
    /// Creates an area covering the whole buffer.
    pub fn new(buf: &'a [u8], name: &'static str) -> Self {
        Self {
            buf,
            name,
            pos: 0,
            end: buf.len(),
        }
    }

    /// Creates an area covering `buf[offset..]`.
    ///
    /// An offset past the end yields an empty area at the end of the buffer.
    pub fn starting_at(buf: &'a [u8], offset: usize, name: &'static str) -> Self {
        Self {
            buf,
            name,
            pos: offset.min(buf.len()),
            end: buf.len(),
        }
    }

    /// The area's name, used in diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Absolute offset of the next unread byte.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Absolute offset one past the area's last byte.
    pub fn end_offset(&self) -> usize {
        self.end
    }

    /// Number of unread bytes.
    pub fn remaining_len(&self) -> usize {
        self.end - self.pos
    }

    /// Returns true if all bytes have been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.end
    }

    /// The unread bytes.
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..self.end]
    }

    /// The area's final byte, if it has any unread bytes.
    pub fn last_byte(&self) -> Option<u8> {
        self.remaining().last().copied()
    }

    /// Builds the error for `field` extending past this area.
    pub fn outside(&self, field: &'static str) -> DecodeError {
        DecodeError::OutsideArea {
            field,
            area: self.name,
            offset: self.pos,
            end_offset: self.end,
        }
    }

    /// Reads exactly `n` bytes.
    #[inline]
    pub fn take(&mut self, n: usize, field: &'static str) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining_len() {
            return Err(self.outside(field));
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Consumes and returns all unread bytes.
    pub fn take_rest(&mut self) -> &'a [u8] {
        let bytes = self.remaining();
        self.pos = self.end;
        bytes
    }

    /// Splits off the next `len` bytes as a child area called `name`.
    ///
    /// `field` names the size field that declared `len`; it is reported if
    /// `len` exceeds what this area has left.
    pub fn carve(
        &mut self,
        len: u64,
        field: &'static str,
        name: &'static str,
    ) -> Result<Area<'a>, DecodeError> {
        let len = usize::try_from(len)
            .ok()
            .filter(|&len| len <= self.remaining_len())
            .ok_or_else(|| self.outside(field))?;
        let child = Area {
            buf: self.buf,
            name,
            pos: self.pos,
            end: self.pos + len,
        };
        self.pos += len;
        Ok(child)
    }

    /// Checks that every byte of the area was consumed.
    pub fn finish(self) -> Result<(), DecodeError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::TrailingBytes {
                area: self.name,
                count: self.remaining_len(),
                offset: self.pos,
            })
        }
    }
}
