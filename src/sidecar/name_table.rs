//! The sidecar's `NameTable`: `num_columns × (varint length, utf-8 name)`,
//! in leaf order. Column-name lookups are a linear scan — the table is
//! bounded by the number of leaf columns, which is small enough that an
//! index would be pure overhead.

use crate::error::{Error, Result};
use crate::thrift::{Decoder, Encoder};

pub fn encode(names: &[String]) -> Vec<u8> {
    let mut out = Encoder::new();
    for name in names {
        out.write_varint_u64(name.len() as u64);
        out.write_bytes(name.as_bytes());
    }
    out.into_bytes()
}

pub fn find_index(bytes: &[u8], num_columns: u32, target: &str) -> Result<Option<usize>> {
    let mut dec = Decoder::new(bytes, 0);
    for i in 0..num_columns as usize {
        let len = dec.read_varint_u64()? as usize;
        let name = std::str::from_utf8(dec.read_slice(len)?)
            .map_err(|e| Error::MalformedParquet(format!("invalid column name: {e}")))?;
        if name == target {
            return Ok(Some(i));
        }
    }
    Ok(None)
}
