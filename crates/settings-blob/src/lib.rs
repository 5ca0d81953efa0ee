//! Binary container for compiled mail-server settings.
//!
//! A settings blob bundles named blocks. Each block carries an opaque base
//! settings payload and a filter expression scoping where the block applies,
//! each with a diagnostic error string recorded by the config compiler.
//! Every server process decodes the blob at startup, so decoding is strict:
//! the first malformed field aborts it with an error naming that field.
//!
//! # Quick Start
//!
//! ```rust
//! use settings_blob::{decode_blob, encode_blob, ConfigBlobBuilder};
//!
//! let blob = ConfigBlobBuilder::new()
//!     .block("global", |b| b.data(b"log_path=syslog".as_slice()))
//!     .block("imap", |b| b.filter("protocol=imap"))
//!     .build();
//!
//! let bytes = encode_blob(&blob).unwrap();
//! let decoded = decode_blob(&bytes).unwrap();
//! assert_eq!(decoded, blob);
//! assert_eq!(decoded.get("imap").unwrap().filter.filter, "protocol=imap");
//! ```
//!
//! # Modules
//!
//! - [`model`]: Blob, block and section types
//! - [`codec`]: Binary encoding/decoding
//! - [`filter`]: Filter validation and the event filter syntax
//! - [`error`]: Error types
//! - [`limits`]: Wire constants and decode options
//!
//! # Wire Format
//!
//! ```text
//! DOVECOT-CONFIG\t1.0\n
//! <full size: u64 BE>
//! repeated:
//!   <block size: u64 BE>
//!   <block name>\0
//!   <base settings size: u64 BE> <base settings error>\0 <payload>
//!   <filter settings size: u64 BE> <filter string>\0 <filter settings error>\0
//! ```
//!
//! # Security
//!
//! The decoder is designed to safely handle untrusted input:
//! - Every read is bounded by the area enclosing it
//! - Declared sizes are checked against bytes actually present and never
//!   used to pre-allocate
//! - Decoding borrows from the input instead of copying it

pub mod codec;
pub mod error;
pub mod filter;
pub mod limits;
pub mod model;

// Re-export commonly used types at crate root
pub use codec::{decode_blob, decode_blob_with, encode_blob, encode_blob_with};
pub use error::{DecodeError, EncodeError, ErrorKind, FilterSyntaxError};
pub use filter::{EventFilter, EventFilterSyntax, FilterValidator};
pub use limits::DecodeOptions;
pub use model::{BaseSettings, Block, BlockBuilder, ConfigBlob, ConfigBlobBuilder, FilterSettings};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
