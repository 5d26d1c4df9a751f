//! Error types for PalletJack.

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// PalletJack error types.
///
/// Message text is part of the public contract: callers (and this
/// crate's own tests) match on exact substrings, so format strings here
/// must not be reworded without checking spec.md §7/§8.
#[derive(Error, Debug)]
pub enum Error {
    /// The underlying file could not be opened or read.
    #[error("I/O error when opening '{path}': {source}")]
    Io {
        /// Path that failed to open.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Sidecar magic or format version did not match what this reader expects.
    #[error("File '{path}' has unexpected format!")]
    UnexpectedFormat {
        /// Path (or `"<memory>"`) of the offending source.
        path: String,
    },

    /// The Parquet footer could not be parsed, or violated an invariant
    /// this crate relies on (e.g. ragged column counts across row groups).
    #[error("Malformed Parquet metadata: {0}")]
    MalformedParquet(String),

    /// A requested row group or column index exceeded the bounds available.
    #[error("{0}")]
    OutOfRange(String),

    /// A requested column name was not present in the sidecar's name table.
    #[error("Couldn't find a column with a name '{0}'!")]
    UnknownColumn(String),

    /// Both `column_indices` and `column_names` were given on one request.
    #[error("Cannot specify both column indices and column names at the same time!")]
    InvalidArgument,

    /// The Thrift Compact Protocol decoder ran past the end of its buffer.
    #[error("truncated Thrift payload: expected {needed} more byte(s) at offset {offset}")]
    Truncated {
        /// Offset at which the read was attempted.
        offset: usize,
        /// Number of additional bytes the read needed.
        needed: usize,
    },

    /// A varint exceeded the maximum number of continuation bytes for its width.
    #[error("invalid varint at offset {0}")]
    InvalidVarint(usize),

    /// A feature of the Parquet schema this crate does not (yet) support.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn out_of_range_row_group(requested: usize, available: usize) -> Self {
        Self::OutOfRange(format!(
            "Requested row_group={requested}, but only 0-{} are available!",
            available.saturating_sub(1)
        ))
    }

    pub(crate) fn out_of_range_column(requested: usize, available: usize) -> Self {
        Self::OutOfRange(format!(
            "Requested column={requested}, but only 0-{} are available!",
            available.saturating_sub(1)
        ))
    }
}
