//! The Parquet footer model: a typed-enough view of `FileMetaData` that
//! keeps every sub-record this crate doesn't need to interpret as an
//! opaque, independently re-emittable byte slice.

pub mod decode;
pub mod ids;
pub mod locate;
pub mod model;

pub use decode::decode_footer;
pub use locate::locate_footer;
pub use model::{DecodedFooter, DecodedRowGroup, RawField, SchemaLeaf};
