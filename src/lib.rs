//! # PalletJack: Parquet Metadata Sidecar & Projection Engine
//!
//! PalletJack extracts the `FileMetaData` footer out of a Parquet file into
//! a standalone `.index` sidecar, then answers projected metadata requests
//! (a subset of row groups and columns) by splicing the already-encoded
//! Thrift bytes for the requested `ColumnChunk`s back together — never
//! decoding values it doesn't need to touch.
//!
//! ## Example
//!
//! ```rust,no_run
//! use palletjack::{generate_metadata_index, read_metadata, MetadataSource, ProjectionRequest};
//! use std::path::Path;
//!
//! # fn main() -> palletjack::Result<()> {
//! generate_metadata_index(Path::new("sample.parquet"), Some(Path::new("sample.parquet.index")))?;
//!
//! let request = ProjectionRequest::all()
//!     .with_column_names(vec!["timestamp".to_string()]);
//! let metadata_bytes = read_metadata(
//!     MetadataSource::Path(Path::new("sample.parquet.index")),
//!     request,
//! )?;
//! # let _ = metadata_bytes;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod footer;
pub mod request;
pub mod sidecar;
pub mod thrift;

pub use error::{Error, Result};
pub use request::ProjectionRequest;

use std::fs;
use std::path::Path;
use tracing::debug;

/// Where `read_metadata` reads a sidecar from.
#[derive(Debug, Clone, Copy)]
pub enum MetadataSource<'a> {
    /// A sidecar on disk, opened (memory-mapped when the `mmap` feature is
    /// on) and read from.
    Path(&'a Path),
    /// Sidecar bytes already in memory.
    Bytes(&'a [u8]),
}

/// Builds a sidecar index for the Parquet file at `parquet_path`.
///
/// Always returns the sidecar bytes. When `index_path` is given, also
/// writes them there.
pub fn generate_metadata_index(
    parquet_path: &Path,
    index_path: Option<&Path>,
) -> Result<Vec<u8>> {
    let parquet_bytes =
        fs::read(parquet_path).map_err(|e| Error::io(parquet_path.display().to_string(), e))?;
    let sidecar = generate_metadata_index_from_bytes(&parquet_bytes)?;
    if let Some(path) = index_path {
        fs::write(path, &sidecar).map_err(|e| Error::io(path.display().to_string(), e))?;
    }
    Ok(sidecar)
}

/// Builds a sidecar index from Parquet bytes already in memory.
pub fn generate_metadata_index_from_bytes(parquet_bytes: &[u8]) -> Result<Vec<u8>> {
    debug!(bytes = parquet_bytes.len(), "generating metadata index");
    sidecar::build_index(parquet_bytes)
}

/// Reads a projected `FileMetaData` buffer out of a sidecar.
pub fn read_metadata(source: MetadataSource<'_>, request: ProjectionRequest) -> Result<Vec<u8>> {
    match source {
        MetadataSource::Bytes(bytes) => sidecar::read_projected(bytes, "<memory>", &request),
        MetadataSource::Path(path) => {
            let path_str = path.display().to_string();
            #[cfg(feature = "mmap")]
            {
                let file = fs::File::open(path).map_err(|e| Error::io(path_str.clone(), e))?;
                // SAFETY: the file is opened read-only and not reopened for
                // writing elsewhere in this process for the lifetime of the
                // mapping below.
                let mmap = unsafe { memmap2::Mmap::map(&file) }
                    .map_err(|e| Error::io(path_str.clone(), e))?;
                sidecar::read_projected(&mmap, &path_str, &request)
            }
            #[cfg(not(feature = "mmap"))]
            {
                let bytes = fs::read(path).map_err(|e| Error::io(path_str.clone(), e))?;
                sidecar::read_projected(&bytes, &path_str, &request)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    //! Synthetic Parquet-footer byte builders used by this crate's own unit
    //! tests. No real `sample.parquet` fixture ships with the crate; every
    //! test here builds its own minimal footer with the `thrift` encoder.

    use crate::footer::ids::{file_metadata as fm, row_group as rg, schema_element as se};
    use crate::thrift::{Encoder, TType};

    fn encode_leaf(name: &str, id_in_schema: i16) -> Vec<u8> {
        let mut enc = Encoder::new();
        enc.write_field_header(se::NAME, TType::Binary);
        enc.write_binary(name.as_bytes());
        enc.write_field_header(se::NUM_CHILDREN, TType::I32);
        enc.write_zigzag_i32(0);
        enc.write_field_stop();
        let _ = id_in_schema;
        enc.into_bytes()
    }

    fn encode_root(num_children: i32) -> Vec<u8> {
        let mut enc = Encoder::new();
        enc.write_field_header(se::NAME, TType::Binary);
        enc.write_binary(b"root");
        enc.write_field_header(se::NUM_CHILDREN, TType::I32);
        enc.write_zigzag_i32(num_children);
        enc.write_field_stop();
        enc.into_bytes()
    }

    fn encode_column_chunk(col_index: usize, row_group: usize) -> Vec<u8> {
        // A tiny but well-formed ColumnChunk: just file_offset (field 2).
        let mut enc = Encoder::new();
        enc.write_field_header(2, TType::I64);
        enc.write_zigzag_i64((row_group * 1000 + col_index) as i64);
        enc.write_field_stop();
        enc.into_bytes()
    }

    fn encode_row_group(num_columns: usize, row_group: usize, num_rows: i64) -> Vec<u8> {
        let mut enc = Encoder::new();
        enc.write_field_header(rg::COLUMNS, TType::List);
        enc.write_list_header(num_columns, TType::Struct);
        for c in 0..num_columns {
            enc.write_bytes(&encode_column_chunk(c, row_group));
        }
        enc.write_field_header(rg::NUM_ROWS, TType::I64);
        enc.write_zigzag_i64(num_rows);
        enc.write_field_stop();
        enc.into_bytes()
    }

    /// Builds a minimal, well-formed synthetic Parquet file (data pages are
    /// not real page bytes, just filler) with `num_row_groups` row groups
    /// of `num_columns` leaf columns each.
    pub fn synthetic_parquet_bytes(num_row_groups: usize, num_columns: usize) -> Vec<u8> {
        let mut footer = Encoder::new();
        footer.write_field_header(fm::VERSION, TType::I32);
        footer.write_zigzag_i32(1);

        footer.write_field_header(fm::SCHEMA, TType::List);
        footer.write_list_header(1 + num_columns, TType::Struct);
        footer.write_bytes(&encode_root(num_columns as i32));
        for c in 0..num_columns {
            footer.write_bytes(&encode_leaf(&format!("col{c}"), 0));
        }

        footer.write_field_header(fm::NUM_ROWS, TType::I64);
        footer.write_zigzag_i64((num_row_groups * 100) as i64);

        footer.write_field_header(fm::ROW_GROUPS, TType::List);
        footer.write_list_header(num_row_groups, TType::Struct);
        for r in 0..num_row_groups {
            footer.write_bytes(&encode_row_group(num_columns, r, 100));
        }

        footer.write_field_header(fm::CREATED_BY, TType::Binary);
        footer.write_binary(b"palletjack-test");
        footer.write_field_stop();

        let footer_bytes = footer.into_bytes();
        let mut file = vec![0xABu8; 32]; // stand-in data pages
        file.extend_from_slice(&footer_bytes);
        file.extend_from_slice(&(footer_bytes.len() as u32).to_le_bytes());
        file.extend_from_slice(b"PAR1");
        file
    }

    /// A footer whose row groups disagree on column count, for invariant
    /// tests.
    pub fn synthetic_parquet_bytes_ragged() -> Vec<u8> {
        let mut footer = Encoder::new();
        footer.write_field_header(fm::SCHEMA, TType::List);
        footer.write_list_header(3, TType::Struct);
        footer.write_bytes(&encode_root(2));
        footer.write_bytes(&encode_leaf("a", 0));
        footer.write_bytes(&encode_leaf("b", 0));

        footer.write_field_header(fm::ROW_GROUPS, TType::List);
        footer.write_list_header(2, TType::Struct);
        footer.write_bytes(&encode_row_group(2, 0, 10));
        footer.write_bytes(&encode_row_group(1, 1, 10)); // ragged: only 1 column
        footer.write_field_stop();

        let footer_bytes = footer.into_bytes();
        let mut file = vec![0xABu8; 16];
        file.extend_from_slice(&footer_bytes);
        file.extend_from_slice(&(footer_bytes.len() as u32).to_le_bytes());
        file.extend_from_slice(b"PAR1");
        file
    }
}
