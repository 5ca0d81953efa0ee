//! Wire constants and decode options.

/// Marker that starts the header line, followed by a tab and the version.
pub const HEADER_MAGIC: &[u8] = b"DOVECOT-CONFIG";

/// Versions this crate can decode.
pub const SUPPORTED_VERSIONS: &[&str] = &["1.0"];

/// Version written by the encoder when none is set explicitly.
pub const CURRENT_VERSION: &str = "1.0";

/// Width of every size field (big-endian `u64`).
pub const SIZE_FIELD_LEN: usize = 8;

/// Maximum nesting of parentheses and `NOT` in an event filter.
pub const MAX_FILTER_DEPTH: usize = 64;

/// Returns true if `version` is one of [`SUPPORTED_VERSIONS`].
pub fn is_supported_version(version: &str) -> bool {
    SUPPORTED_VERSIONS.contains(&version)
}

/// Options for decoding blobs.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Accept unused bytes at the end of a settings block.
    ///
    /// Off by default: every byte of a block must belong to the name, base
    /// settings or filter settings. Readers that want to tolerate blobs from
    /// newer writers, which may append fields to a block, can turn it on.
    pub allow_trailing_block_data: bool,

    /// Hand non-empty filter strings to the filter validator.
    pub validate_filters: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            allow_trailing_block_data: false,
            validate_filters: true,
        }
    }
}

impl DecodeOptions {
    /// Creates default (strict) decode options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that skip unknown data appended to blocks.
    pub fn forward_compatible() -> Self {
        Self {
            allow_trailing_block_data: true,
            ..Self::default()
        }
    }

    /// Disables filter validation (structural decode only).
    pub fn without_filter_validation(mut self) -> Self {
        self.validate_filters = false;
        self
    }
}
