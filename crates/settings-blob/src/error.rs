//! Error types for settings blob encoding/decoding and filter validation.

use thiserror::Error;

/// Broad failure classes of a decode.
///
/// Every [`DecodeError`] maps to exactly one kind, so callers can branch on
/// the class without matching individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing/malformed header line or unsupported version.
    Header,
    /// Declared full size differs from the bytes actually present.
    SizeMismatch,
    /// A field or sub-area extends past its enclosing area, or an area has
    /// bytes that no field accounts for.
    AreaBounds,
    /// A field is within bounds but its content is not allowed: an empty
    /// block name, or a name or filter that is not UTF-8.
    Malformed,
    /// Two blocks share a name.
    DuplicateBlock,
    /// A filter string was rejected by the filter engine.
    FilterSyntax,
}

impl ErrorKind {
    /// Short stable name, suitable for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Header => "header",
            ErrorKind::SizeMismatch => "size-mismatch",
            ErrorKind::AreaBounds => "area-bounds",
            ErrorKind::Malformed => "malformed",
            ErrorKind::DuplicateBlock => "duplicate-block",
            ErrorKind::FilterSyntax => "filter-syntax",
        }
    }
}

/// Syntax error reported by the filter expression engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("event filter: {message}")]
pub struct FilterSyntaxError {
    message: String,
}

impl FilterSyntaxError {
    /// Creates an error carrying the engine's message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The engine's message without the `event filter:` prefix.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Error during binary decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    // === Header ===
    #[error("File header doesn't begin with DOVECOT-CONFIG line")]
    InvalidHeader,

    #[error("Unsupported config file version '{version}'")]
    UnsupportedVersion { version: String },

    // === Size mismatch ===
    #[error("Full size mismatch: declared {declared} bytes, but {actual} bytes follow")]
    FullSizeMismatch { declared: u64, actual: usize },

    // === Area bounds ===
    #[error("Area too small when reading size of '{field}' ({available} bytes left in {area})")]
    AreaTooSmall {
        field: &'static str,
        area: &'static str,
        available: usize,
    },

    #[error(
        "'{field}' points outside area (area={area}, offset={offset}, end_offset={end_offset})"
    )]
    OutsideArea {
        field: &'static str,
        area: &'static str,
        offset: usize,
        end_offset: usize,
    },

    #[error("Settings block doesn't end with NUL at offset {offset}")]
    BlockNotNulTerminated { offset: usize },

    #[error("{area} has {count} unused trailing bytes at offset {offset}")]
    TrailingBytes {
        area: &'static str,
        count: usize,
        offset: usize,
    },

    // === Malformed ===
    #[error("'{field}' is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },

    #[error("Settings block name is empty at offset {offset}")]
    EmptyBlockName { offset: usize },

    // === Duplicate block ===
    #[error("Duplicate block name '{name}'")]
    DuplicateBlock { name: String },

    // === Filter syntax ===
    #[error("Received invalid filter '{filter}': {source}")]
    InvalidFilter {
        filter: String,
        source: FilterSyntaxError,
    },
}

impl DecodeError {
    /// Returns the failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::InvalidHeader | DecodeError::UnsupportedVersion { .. } => {
                ErrorKind::Header
            }
            DecodeError::FullSizeMismatch { .. } => ErrorKind::SizeMismatch,
            DecodeError::DuplicateBlock { .. } => ErrorKind::DuplicateBlock,
            DecodeError::InvalidFilter { .. } => ErrorKind::FilterSyntax,
            DecodeError::AreaTooSmall { .. }
            | DecodeError::OutsideArea { .. }
            | DecodeError::BlockNotNulTerminated { .. }
            | DecodeError::TrailingBytes { .. } => ErrorKind::AreaBounds,
            DecodeError::InvalidUtf8 { .. } | DecodeError::EmptyBlockName { .. } => {
                ErrorKind::Malformed
            }
        }
    }
}

/// Error during binary encoding.
///
/// The encoder refuses anything the decoder would reject, so a successful
/// encode always decodes again.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("Unsupported config file version '{version}'")]
    UnsupportedVersion { version: String },

    #[error("'{field}' contains an embedded NUL byte")]
    EmbeddedNul { field: &'static str },

    #[error("block name is empty")]
    EmptyBlockName,

    #[error("Duplicate block name '{name}'")]
    DuplicateBlock { name: String },

    #[error("Received invalid filter '{filter}': {source}")]
    InvalidFilter {
        filter: String,
        source: FilterSyntaxError,
    },
}
