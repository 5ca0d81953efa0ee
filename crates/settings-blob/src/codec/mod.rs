//! Binary encoding/decoding for settings blobs.
//!
//! Decoding flows header -> blob -> blocks -> sections -> primitives -> area;
//! encoding runs the same layers in reverse.

pub mod area;
pub mod blob;
pub mod block;
pub mod header;
pub mod primitives;
pub mod section;

pub use area::Area;
pub use blob::{decode_blob, decode_blob_with, encode_blob, encode_blob_with};
pub use block::BlockNames;
pub use primitives::Writer;
