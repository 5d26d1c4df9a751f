//! The projected reader: reconstructs a `FileMetaData` buffer covering only
//! the requested row groups and columns, splicing pre-encoded `ColumnChunk`
//! bytes in from the sidecar without ever decoding them.

use crate::error::{Error, Result};
use crate::footer::ids::{file_metadata as fm, row_group as rg};
use crate::request::ProjectionRequest;
use crate::sidecar::format::{read_directory_entry, SidecarHeader, DIRECTORY_ENTRY_LEN};
use crate::sidecar::{name_table, schema_block};
use crate::thrift::{Decoder, Encoder, TType};
use tracing::debug;

pub fn read_projected(
    sidecar_bytes: &[u8],
    source_path: &str,
    request: &ProjectionRequest,
) -> Result<Vec<u8>> {
    let header = SidecarHeader::parse(sidecar_bytes, source_path)?;

    let selected_columns = resolve_columns(sidecar_bytes, &header, request)?;
    let selected_row_groups = resolve_row_groups(&header, request)?;

    debug!(
        row_groups = selected_row_groups.len(),
        columns = selected_columns.len(),
        "reading projected metadata"
    );

    let schema_bytes = &sidecar_bytes
        [header.schema_offset as usize..(header.schema_offset + header.schema_length) as usize];
    let schema_view = schema_block::SchemaBlockView::parse(schema_bytes)?;

    let toplevel_bytes = &sidecar_bytes[header.toplevel_offset as usize
        ..(header.toplevel_offset + header.toplevel_length) as usize];
    let version_len = u32::from_le_bytes(toplevel_bytes[0..4].try_into().unwrap()) as usize;
    let version_bytes = &toplevel_bytes[4..4 + version_len];
    let trailing_bytes = &toplevel_bytes[4 + version_len..];

    let mut num_rows_total: i64 = 0;
    let mut row_group_bytes = Vec::with_capacity(selected_row_groups.len());
    for &rg_index in &selected_row_groups {
        let prefix = rg_prefix_raw(sidecar_bytes, &header, rg_index)?;
        num_rows_total += decode_prefix_num_rows(prefix)?;
        row_group_bytes.push(encode_row_group(
            sidecar_bytes,
            &header,
            rg_index,
            &selected_columns,
            prefix,
        ));
    }

    let mut enc = Encoder::new();
    if version_len > 0 {
        enc.append_raw(version_bytes, fm::VERSION);
    }

    enc.write_field_header(fm::SCHEMA, TType::List);
    enc.write_list_header(1 + selected_columns.len(), TType::Struct);
    enc.write_bytes(&schema_block::encode_root(
        &schema_view.root_name,
        selected_columns.len(),
    ));
    for &col in &selected_columns {
        enc.write_bytes(schema_view.leaf_raw(col)?);
    }

    enc.write_field_header(fm::NUM_ROWS, TType::I64);
    enc.write_zigzag_i64(num_rows_total);

    enc.write_field_header(fm::ROW_GROUPS, TType::List);
    enc.write_list_header(selected_row_groups.len(), TType::Struct);
    for bytes in &row_group_bytes {
        enc.write_bytes(bytes);
    }

    enc.append_raw(trailing_bytes, fm::ROW_GROUPS);
    enc.write_field_stop();

    Ok(enc.into_bytes())
}

fn resolve_columns(
    sidecar_bytes: &[u8],
    header: &SidecarHeader,
    request: &ProjectionRequest,
) -> Result<Vec<usize>> {
    if !request.column_indices.is_empty() && !request.column_names.is_empty() {
        return Err(Error::InvalidArgument);
    }
    let num_columns = header.num_columns as usize;

    if !request.column_names.is_empty() {
        let name_table_len = header.toplevel_offset - header.name_table_offset;
        let name_table_bytes = &sidecar_bytes[header.name_table_offset as usize
            ..(header.name_table_offset + name_table_len) as usize];
        return request
            .column_names
            .iter()
            .map(|name| {
                name_table::find_index(name_table_bytes, header.num_columns, name)?
                    .ok_or_else(|| Error::UnknownColumn(name.clone()))
            })
            .collect();
    }

    if !request.column_indices.is_empty() {
        for &idx in &request.column_indices {
            if idx >= num_columns {
                return Err(Error::out_of_range_column(idx, num_columns));
            }
        }
        return Ok(request.column_indices.clone());
    }

    Ok((0..num_columns).collect())
}

fn resolve_row_groups(header: &SidecarHeader, request: &ProjectionRequest) -> Result<Vec<usize>> {
    let num_row_groups = header.num_row_groups as usize;
    if request.row_groups.is_empty() {
        return Ok((0..num_row_groups).collect());
    }
    for &idx in &request.row_groups {
        if idx >= num_row_groups {
            return Err(Error::out_of_range_row_group(idx, num_row_groups));
        }
    }
    Ok(request.row_groups.clone())
}

/// The raw `RowGroup` field bytes other than `columns`, excluding the
/// trailing STOP byte (the caller writes its own STOP after re-inserting
/// `columns`).
fn rg_prefix_raw<'a>(
    sidecar_bytes: &'a [u8],
    header: &SidecarHeader,
    rg_index: usize,
) -> Result<&'a [u8]> {
    let start = header.rg_prefix_offset as usize + rg_index * header.rg_prefix_stride as usize;
    let mut dec = Decoder::new(sidecar_bytes, start);
    let end = dec.struct_range(start)?;
    Ok(&sidecar_bytes[start..end - 1])
}

/// `prefix`'s fields were encoded assuming `columns` (field 1) precedes
/// them, so decoding starts with `last_field_id` already at 1.
fn decode_prefix_num_rows(prefix: &[u8]) -> Result<i64> {
    let mut dec = Decoder::new(prefix, 0);
    let mut last_field_id = rg::COLUMNS;
    let mut num_rows = None;
    while dec.remaining() > 0 {
        let field = match dec.read_field_header(&mut last_field_id)? {
            None => break,
            Some(f) => f,
        };
        if field.id == rg::NUM_ROWS {
            num_rows = Some(dec.read_zigzag_i64()?);
        } else {
            dec.skip(field.ttype)?;
        }
    }
    num_rows.ok_or_else(|| Error::MalformedParquet("row group missing num_rows".into()))
}

fn encode_row_group(
    sidecar_bytes: &[u8],
    header: &SidecarHeader,
    rg_index: usize,
    selected_columns: &[usize],
    prefix: &[u8],
) -> Vec<u8> {
    let mut enc = Encoder::new();
    enc.write_field_header(rg::COLUMNS, TType::List);
    enc.write_list_header(selected_columns.len(), TType::Struct);
    for &col in selected_columns {
        let cell = header.directory_offset as usize
            + (rg_index * header.num_columns as usize + col) * DIRECTORY_ENTRY_LEN;
        let (offset, length) = read_directory_entry(sidecar_bytes, cell);
        enc.write_bytes(&sidecar_bytes[offset as usize..(offset + length) as usize]);
    }
    enc.append_raw(prefix, rg::COLUMNS);
    enc.write_field_stop();
    enc.into_bytes()
}
