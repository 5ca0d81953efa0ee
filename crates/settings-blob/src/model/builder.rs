//! Builder API for ergonomic ConfigBlob construction.
//!
//! # Example
//!
//! ```rust
//! use settings_blob::model::builder::ConfigBlobBuilder;
//!
//! let blob = ConfigBlobBuilder::new()
//!     .block("global", |b| b.data(b"log_path=syslog".as_slice()))
//!     .block("imap", |b| b
//!         .data(b"mail_max_userip_connections=20".as_slice())
//!         .filter("protocol=imap")
//!     )
//!     .build();
//!
//! assert_eq!(blob.len(), 2);
//! ```

use std::borrow::Cow;

use crate::model::{BaseSettings, Block, ConfigBlob, FilterSettings};

/// Builder for constructing a ConfigBlob.
#[derive(Debug, Clone)]
pub struct ConfigBlobBuilder<'a> {
    version: Cow<'a, str>,
    blocks: Vec<Block<'a>>,
}

impl<'a> ConfigBlobBuilder<'a> {
    /// Creates a builder for the current format version.
    pub fn new() -> Self {
        let ConfigBlob { version, blocks } = ConfigBlob::new();
        Self { version, blocks }
    }

    /// Overrides the format version.
    pub fn version(mut self, version: impl Into<Cow<'a, str>>) -> Self {
        self.version = version.into();
        self
    }

    /// Adds a block configured by a builder function.
    pub fn block<F>(mut self, name: impl Into<Cow<'a, str>>, f: F) -> Self
    where
        F: FnOnce(BlockBuilder<'a>) -> BlockBuilder<'a>,
    {
        let builder = f(BlockBuilder::new(name));
        self.blocks.push(builder.build());
        self
    }

    /// Adds a block with empty settings.
    pub fn empty_block(mut self, name: impl Into<Cow<'a, str>>) -> Self {
        self.blocks.push(Block::new(name));
        self
    }

    /// Adds an already assembled block.
    pub fn push(mut self, block: Block<'a>) -> Self {
        self.blocks.push(block);
        self
    }

    /// Builds the blob. Names are checked for uniqueness at encode time.
    pub fn build(self) -> ConfigBlob<'a> {
        ConfigBlob {
            version: self.version,
            blocks: self.blocks,
        }
    }
}

impl Default for ConfigBlobBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a single block.
#[derive(Debug, Clone)]
pub struct BlockBuilder<'a> {
    name: Cow<'a, str>,
    base: BaseSettings<'a>,
    filter: FilterSettings<'a>,
}

impl<'a> BlockBuilder<'a> {
    /// Creates a builder for a block with empty settings.
    pub fn new(name: impl Into<Cow<'a, str>>) -> Self {
        Self {
            name: name.into(),
            base: BaseSettings::default(),
            filter: FilterSettings::default(),
        }
    }

    /// Sets the base settings payload.
    pub fn data(mut self, data: impl Into<Cow<'a, [u8]>>) -> Self {
        self.base.data = data.into();
        self
    }

    /// Sets the base settings diagnostic.
    pub fn base_error(mut self, error: impl Into<Cow<'a, [u8]>>) -> Self {
        self.base.error = error.into();
        self
    }

    /// Sets the filter expression.
    pub fn filter(mut self, filter: impl Into<Cow<'a, str>>) -> Self {
        self.filter.filter = filter.into();
        self
    }

    /// Sets the filter settings diagnostic.
    pub fn filter_error(mut self, error: impl Into<Cow<'a, [u8]>>) -> Self {
        self.filter.error = error.into();
        self
    }

    /// Builds the block.
    pub fn build(self) -> Block<'a> {
        Block {
            name: self.name,
            base: self.base,
            filter: self.filter,
        }
    }
}
