//! The index builder: reads a Parquet footer once and emits the sidecar.

use crate::error::Result;
use crate::footer::{decode_footer, locate_footer, DecodedFooter};
use crate::sidecar::format::{
    write_directory_entry, SidecarHeader, DIRECTORY_ENTRY_LEN, FORMAT_VERSION, HEADER_LEN,
    TRAILER_MAGIC,
};
use crate::sidecar::{name_table, schema_block};
use tracing::debug;

/// Parses `parquet_bytes`' footer and builds the sidecar bytes for it.
pub fn build_index(parquet_bytes: &[u8]) -> Result<Vec<u8>> {
    let footer_bytes = locate_footer(parquet_bytes)?;
    let footer = decode_footer(footer_bytes)?;
    debug!(
        row_groups = footer.row_groups.len(),
        columns = footer.num_leaf_columns(),
        "building sidecar index"
    );
    encode_sidecar(&footer)
}

fn encode_sidecar(footer: &DecodedFooter) -> Result<Vec<u8>> {
    let num_row_groups = footer.row_groups.len() as u32;
    let num_columns = footer.num_leaf_columns() as u32;

    let schema_bytes = schema_block::encode(&footer.root_name, &footer.leaves);

    let names: Vec<String> = footer.leaves.iter().map(|l| l.name.clone()).collect();
    let name_table_bytes = name_table::encode(&names);

    // `version_raw`'s header was encoded assuming it is the struct's first
    // field; the trailing fields' headers were encoded assuming they
    // immediately follow `row_groups` (field 4). A reader re-emitting a
    // full `FileMetaData` needs to splice each back in at its own point,
    // so the block keeps them apart behind a length prefix rather than
    // losing the boundary in one concatenated blob.
    let version_bytes: &[u8] = footer
        .version_raw
        .as_ref()
        .map(|v| v.bytes.as_slice())
        .unwrap_or(&[]);
    let mut toplevel_bytes = Vec::with_capacity(4 + version_bytes.len());
    toplevel_bytes.extend_from_slice(&(version_bytes.len() as u32).to_le_bytes());
    toplevel_bytes.extend_from_slice(version_bytes);
    for f in &footer.trailing_raw {
        toplevel_bytes.extend_from_slice(&f.bytes);
    }

    // Every RgPrefix entry occupies the same stride so the array is
    // directly indexable; entries shorter than the stride are padded with
    // zero bytes after their own STOP, which a struct decode never reads
    // past.
    let stride = footer
        .row_groups
        .iter()
        .map(|rg| rg.prefix_raw.len() + 1)
        .max()
        .unwrap_or(1) as u32;
    let mut rg_prefix_bytes = Vec::with_capacity(stride as usize * footer.row_groups.len());
    for rg in &footer.row_groups {
        let start = rg_prefix_bytes.len();
        rg_prefix_bytes.extend_from_slice(&rg.prefix_raw);
        rg_prefix_bytes.push(0x00); // STOP
        rg_prefix_bytes.resize(start + stride as usize, 0);
    }

    let mut blobs = Vec::new();
    let mut directory_entries: Vec<(u64, u64)> =
        Vec::with_capacity(footer.row_groups.len() * footer.num_leaf_columns());
    for rg in &footer.row_groups {
        for col in &rg.columns_raw {
            directory_entries.push((blobs.len() as u64, col.len() as u64));
            blobs.extend_from_slice(col);
        }
    }

    let mut offset = HEADER_LEN as u64;
    let schema_offset = offset;
    offset += schema_bytes.len() as u64;
    let name_table_offset = offset;
    offset += name_table_bytes.len() as u64;
    let toplevel_offset = offset;
    offset += toplevel_bytes.len() as u64;
    let rg_prefix_offset = offset;
    offset += rg_prefix_bytes.len() as u64;
    let directory_offset = offset;
    offset += (directory_entries.len() * DIRECTORY_ENTRY_LEN) as u64;
    let blobs_offset = offset;

    let header = SidecarHeader {
        format_version: FORMAT_VERSION,
        num_row_groups,
        num_columns,
        schema_offset,
        schema_length: schema_bytes.len() as u64,
        toplevel_offset,
        toplevel_length: toplevel_bytes.len() as u64,
        rg_prefix_offset,
        rg_prefix_stride: stride,
        directory_offset,
        name_table_offset,
    };

    let mut out = Vec::with_capacity(blobs_offset as usize + blobs.len() + TRAILER_MAGIC.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(&schema_bytes);
    out.extend_from_slice(&name_table_bytes);
    out.extend_from_slice(&toplevel_bytes);
    out.extend_from_slice(&rg_prefix_bytes);
    for (rel_offset, length) in &directory_entries {
        write_directory_entry(&mut out, blobs_offset + rel_offset, *length);
    }
    out.extend_from_slice(&blobs);
    out.extend_from_slice(TRAILER_MAGIC);
    Ok(out)
}
