//! Locates the Thrift-encoded `FileMetaData` footer within a Parquet file.

use crate::error::{Error, Result};

const PARQUET_MAGIC: &[u8; 4] = b"PAR1";
/// Trailing 8 bytes: a little-endian `u32` footer length, then `"PAR1"`.
const TRAILER_LEN: usize = 8;

/// Returns the byte range of the footer (the `FileMetaData` Thrift blob)
/// within `file_bytes`.
pub fn locate_footer(file_bytes: &[u8]) -> Result<&[u8]> {
    if file_bytes.len() < TRAILER_LEN + PARQUET_MAGIC.len() {
        return Err(Error::MalformedParquet(
            "file is too short to contain a Parquet footer".into(),
        ));
    }
    let len = file_bytes.len();
    if &file_bytes[len - 4..] != PARQUET_MAGIC {
        return Err(Error::MalformedParquet(
            "missing trailing PAR1 magic".into(),
        ));
    }
    let footer_len_bytes = &file_bytes[len - TRAILER_LEN..len - 4];
    let footer_len = u32::from_le_bytes(footer_len_bytes.try_into().unwrap()) as usize;

    let footer_start = len
        .checked_sub(TRAILER_LEN)
        .and_then(|n| n.checked_sub(footer_len))
        .ok_or_else(|| {
            Error::MalformedParquet("footer length exceeds file size".into())
        })?;

    Ok(&file_bytes[footer_start..len - TRAILER_LEN])
}
