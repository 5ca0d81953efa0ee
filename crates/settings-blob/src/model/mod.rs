//! Data model types for settings blobs.
//!
//! - Blobs (versioned collections of named blocks)
//! - Blocks (base settings + filter settings)
//! - Builders (ergonomic construction)

pub mod blob;
pub mod builder;

pub use blob::{BaseSettings, Block, ConfigBlob, FilterSettings};
pub use builder::{BlockBuilder, ConfigBlobBuilder};
