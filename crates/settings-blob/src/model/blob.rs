//! Config blob structure: named settings blocks.
//!
//! Decoded blobs borrow their strings and payloads from the input buffer;
//! call [`ConfigBlob::into_owned`] to detach them.
//!
//! Diagnostic strings are kept as raw bytes: they echo configuration values
//! and need not be UTF-8.

use std::borrow::Cow;

use crate::limits::{CURRENT_VERSION, SIZE_FIELD_LEN};

/// A decoded (or to-be-encoded) settings blob.
///
/// Block names are unique within a blob. Block order is preserved by the
/// codec but carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConfigBlob<'a> {
    /// Format version from the header line.
    pub version: Cow<'a, str>,
    /// Settings blocks.
    pub blocks: Vec<Block<'a>>,
}

impl<'a> ConfigBlob<'a> {
    /// Creates an empty blob with the current format version.
    pub fn new() -> Self {
        Self {
            version: Cow::Borrowed(CURRENT_VERSION),
            blocks: Vec::new(),
        }
    }

    /// Looks up a block by name.
    pub fn get(&self, name: &str) -> Option<&Block<'a>> {
        self.blocks.iter().find(|b| b.name == name)
    }

    /// Returns true if a block with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns true if the blob has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterates over block names in wire order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|b| b.name.as_ref())
    }

    /// Value of the `full size` field: the number of bytes following it.
    pub fn full_size(&self) -> u64 {
        self.blocks
            .iter()
            .map(|b| (SIZE_FIELD_LEN + b.encoded_len()) as u64)
            .sum()
    }

    /// Converts borrowed data to owned data.
    pub fn into_owned(self) -> ConfigBlob<'static> {
        ConfigBlob {
            version: Cow::Owned(self.version.into_owned()),
            blocks: self.blocks.into_iter().map(Block::into_owned).collect(),
        }
    }
}

impl Default for ConfigBlob<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// One named settings unit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Block<'a> {
    /// Unique, non-empty block name.
    pub name: Cow<'a, str>,
    /// Base settings.
    pub base: BaseSettings<'a>,
    /// Filter settings.
    pub filter: FilterSettings<'a>,
}

impl<'a> Block<'a> {
    /// Creates a block with empty base and filter settings.
    pub fn new(name: impl Into<Cow<'a, str>>) -> Self {
        Self {
            name: name.into(),
            base: BaseSettings::default(),
            filter: FilterSettings::default(),
        }
    }

    /// Length of the block area on the wire (excluding its size field).
    pub fn encoded_len(&self) -> usize {
        self.name.len()
            + 1
            + SIZE_FIELD_LEN
            + self.base.encoded_len()
            + SIZE_FIELD_LEN
            + self.filter.encoded_len()
    }

    /// Converts borrowed data to owned data.
    pub fn into_owned(self) -> Block<'static> {
        Block {
            name: Cow::Owned(self.name.into_owned()),
            base: self.base.into_owned(),
            filter: self.filter.into_owned(),
        }
    }
}

/// Opaque base settings payload plus its diagnostic string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BaseSettings<'a> {
    /// Settings payload; not interpreted by the codec.
    pub data: Cow<'a, [u8]>,
    /// Previously known error for these settings, empty if none.
    #[cfg_attr(feature = "serde", serde(serialize_with = "lossy_text"))]
    pub error: Cow<'a, [u8]>,
}

impl<'a> BaseSettings<'a> {
    /// Creates base settings with the given payload and no error.
    pub fn new(data: impl Into<Cow<'a, [u8]>>) -> Self {
        Self {
            data: data.into(),
            error: Cow::Borrowed(&[]),
        }
    }

    /// Returns true if a diagnostic error is recorded.
    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }

    /// The diagnostic as text, with invalid UTF-8 replaced.
    pub fn error_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.error)
    }

    /// Length of the base settings area on the wire.
    pub fn encoded_len(&self) -> usize {
        self.error.len() + 1 + self.data.len()
    }

    /// Converts borrowed data to owned data.
    pub fn into_owned(self) -> BaseSettings<'static> {
        BaseSettings {
            data: Cow::Owned(self.data.into_owned()),
            error: Cow::Owned(self.error.into_owned()),
        }
    }
}

/// Filter expression scoping a block, plus its diagnostic string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FilterSettings<'a> {
    /// Event filter expression; empty means the block is unfiltered.
    pub filter: Cow<'a, str>,
    /// Previously known error for this filter, empty if none.
    #[cfg_attr(feature = "serde", serde(serialize_with = "lossy_text"))]
    pub error: Cow<'a, [u8]>,
}

impl<'a> FilterSettings<'a> {
    /// Creates filter settings with the given expression and no error.
    pub fn new(filter: impl Into<Cow<'a, str>>) -> Self {
        Self {
            filter: filter.into(),
            error: Cow::Borrowed(&[]),
        }
    }

    /// Returns true if the block applies unconditionally.
    pub fn is_unfiltered(&self) -> bool {
        self.filter.is_empty()
    }

    /// Returns true if a diagnostic error is recorded.
    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }

    /// The diagnostic as text, with invalid UTF-8 replaced.
    pub fn error_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.error)
    }

    /// Length of the filter settings area on the wire.
    pub fn encoded_len(&self) -> usize {
        self.filter.len() + 1 + self.error.len() + 1
    }

    /// Converts borrowed data to owned data.
    pub fn into_owned(self) -> FilterSettings<'static> {
        FilterSettings {
            filter: Cow::Owned(self.filter.into_owned()),
            error: Cow::Owned(self.error.into_owned()),
        }
    }
}

#[cfg(feature = "serde")]
fn lossy_text<S: serde::Serializer>(bytes: &Cow<'_, [u8]>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(bytes))
}
