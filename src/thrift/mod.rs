//! A minimal Thrift Compact Protocol codec covering exactly the subset
//! Parquet footers use, with a slice-mode API: callers can ask for the raw
//! byte range a struct occupies instead of paying to decode it, and can
//! splice such raw ranges back into a fresh encode without re-serializing.

pub mod decode;
pub mod encode;
pub mod ttype;

pub use decode::{Decoder, FieldHeader};
pub use encode::Encoder;
pub use ttype::TType;
