//! The `.index` sidecar: its on-disk layout and the builder/reader that
//! produce and consume it.

pub mod format;
pub mod name_table;
pub mod reader;
pub mod schema_block;
pub mod writer;

pub use reader::read_projected;
pub use writer::build_index;
