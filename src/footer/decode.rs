//! Decodes a Parquet `FileMetaData` footer into the partially-typed shape
//! the sidecar builder needs, keeping every nested record this crate
//! doesn't have to interpret as a raw, independently re-emittable slice.

use crate::error::{Error, Result};
use crate::footer::ids::{file_metadata as fm, row_group as rg, schema_element as se};
use crate::footer::model::{DecodedFooter, DecodedRowGroup, RawField, SchemaLeaf};
use crate::thrift::{Decoder, TType};

pub fn decode_footer(buf: &[u8]) -> Result<DecodedFooter> {
    let mut dec = Decoder::new(buf, 0);
    let mut last_field_id = 0i16;

    let mut version_raw = None;
    let mut trailing_raw = Vec::new();
    let mut root_name = None;
    let mut leaves = Vec::new();
    let mut row_groups = Vec::new();
    let mut schema_seen = false;
    let mut row_groups_seen = false;

    loop {
        let start = dec.position();
        let field = match dec.read_field_header(&mut last_field_id)? {
            None => break,
            Some(f) => f,
        };
        match field.id {
            fm::VERSION => {
                dec.skip(field.ttype)?;
                let end = dec.position();
                version_raw = Some(RawField {
                    id: field.id,
                    bytes: buf[start..end].to_vec(),
                });
            }
            fm::SCHEMA => {
                decode_schema(&mut dec, buf, field.ttype, &mut root_name, &mut leaves)?;
                schema_seen = true;
            }
            fm::NUM_ROWS => {
                // Recomputed fresh from the selected row groups at read
                // time, so the full-file value is discarded here.
                dec.skip(field.ttype)?;
            }
            fm::ROW_GROUPS => {
                if field.ttype != TType::List {
                    return Err(Error::MalformedParquet(
                        "row_groups field is not a list".into(),
                    ));
                }
                let (count, elem_type) = dec.read_list_header()?;
                if elem_type != TType::Struct {
                    return Err(Error::MalformedParquet(
                        "row_groups list elements are not structs".into(),
                    ));
                }
                for _ in 0..count {
                    row_groups.push(decode_row_group(&mut dec, buf)?);
                }
                row_groups_seen = true;
            }
            fm::KEY_VALUE_METADATA
            | fm::CREATED_BY
            | fm::COLUMN_ORDERS
            | fm::ENCRYPTION_ALGORITHM
            | fm::FOOTER_SIGNING_KEY_METADATA => {
                dec.skip(field.ttype)?;
                let end = dec.position();
                trailing_raw.push(RawField {
                    id: field.id,
                    bytes: buf[start..end].to_vec(),
                });
            }
            _ => dec.skip(field.ttype)?,
        }
    }

    if !schema_seen {
        return Err(Error::MalformedParquet("missing schema field".into()));
    }
    if !row_groups_seen {
        return Err(Error::MalformedParquet("missing row_groups field".into()));
    }

    let expected_cols = leaves.len();
    for group in &row_groups {
        if group.columns_raw.len() != expected_cols {
            return Err(Error::MalformedParquet(format!(
                "ragged row group: expected {expected_cols} columns, found {}",
                group.columns_raw.len()
            )));
        }
    }

    Ok(DecodedFooter {
        version_raw,
        trailing_raw,
        root_name: root_name.unwrap_or_default(),
        leaves,
        row_groups,
    })
}

fn decode_schema<'a>(
    dec: &mut Decoder<'a>,
    buf: &'a [u8],
    ttype: TType,
    root_name: &mut Option<String>,
    leaves: &mut Vec<SchemaLeaf>,
) -> Result<()> {
    if ttype != TType::List {
        return Err(Error::MalformedParquet("schema field is not a list".into()));
    }
    let (count, elem_type) = dec.read_list_header()?;
    if elem_type != TType::Struct {
        return Err(Error::MalformedParquet(
            "schema list elements are not structs".into(),
        ));
    }
    if count == 0 {
        return Err(Error::MalformedParquet("empty schema".into()));
    }

    let (name, num_children) = decode_schema_root(dec)?;
    *root_name = Some(name);
    if num_children as usize != count - 1 {
        return Err(Error::Unsupported("nested schemas are not supported".into()));
    }

    for _ in 0..count - 1 {
        let leaf_start = dec.position();
        let (name, has_children) = decode_schema_leaf(dec)?;
        if has_children {
            return Err(Error::Unsupported("nested schemas are not supported".into()));
        }
        let leaf_end = dec.position();
        leaves.push(SchemaLeaf {
            name,
            raw: buf[leaf_start..leaf_end].to_vec(),
        });
    }
    Ok(())
}

fn decode_schema_root(dec: &mut Decoder<'_>) -> Result<(String, i32)> {
    let mut last_field_id = 0i16;
    let mut name = None;
    let mut num_children = None;
    while let Some(field) = dec.read_field_header(&mut last_field_id)? {
        match field.id {
            se::NAME => name = Some(dec.read_string()?.to_string()),
            se::NUM_CHILDREN => num_children = Some(dec.read_zigzag_i32()?),
            _ => dec.skip(field.ttype)?,
        }
    }
    let name = name.ok_or_else(|| Error::MalformedParquet("schema root missing name".into()))?;
    let num_children = num_children
        .ok_or_else(|| Error::Unsupported("schema root missing num_children".into()))?;
    Ok((name, num_children))
}

fn decode_schema_leaf(dec: &mut Decoder<'_>) -> Result<(String, bool)> {
    let mut last_field_id = 0i16;
    let mut name = None;
    let mut has_children = false;
    while let Some(field) = dec.read_field_header(&mut last_field_id)? {
        match field.id {
            se::NAME => name = Some(dec.read_string()?.to_string()),
            se::NUM_CHILDREN => {
                if dec.read_zigzag_i32()? != 0 {
                    has_children = true;
                }
            }
            _ => dec.skip(field.ttype)?,
        }
    }
    let name = name.ok_or_else(|| Error::MalformedParquet("schema leaf missing name".into()))?;
    Ok((name, has_children))
}

fn decode_row_group<'a>(dec: &mut Decoder<'a>, buf: &'a [u8]) -> Result<DecodedRowGroup> {
    let mut last_field_id = 0i16;
    let mut prefix_raw = Vec::new();
    let mut num_rows = None;
    let mut columns_raw = Vec::new();

    loop {
        let start = dec.position();
        let field = match dec.read_field_header(&mut last_field_id)? {
            None => break,
            Some(f) => f,
        };
        match field.id {
            rg::COLUMNS => {
                if field.ttype != TType::List {
                    return Err(Error::MalformedParquet("columns field is not a list".into()));
                }
                let (count, elem_type) = dec.read_list_header()?;
                if elem_type != TType::Struct {
                    return Err(Error::MalformedParquet(
                        "columns list elements are not structs".into(),
                    ));
                }
                for _ in 0..count {
                    let col_start = dec.position();
                    let col_end = dec.struct_range(col_start)?;
                    columns_raw.push(buf[col_start..col_end].to_vec());
                }
            }
            rg::NUM_ROWS => {
                if field.ttype != TType::I64 {
                    return Err(Error::MalformedParquet("num_rows is not an i64".into()));
                }
                let value = dec.read_zigzag_i64()?;
                let end = dec.position();
                prefix_raw.extend_from_slice(&buf[start..end]);
                num_rows = Some(value);
            }
            _ => {
                dec.skip(field.ttype)?;
                let end = dec.position();
                prefix_raw.extend_from_slice(&buf[start..end]);
            }
        }
    }

    let num_rows =
        num_rows.ok_or_else(|| Error::MalformedParquet("row group missing num_rows".into()))?;

    Ok(DecodedRowGroup {
        prefix_raw,
        num_rows,
        columns_raw,
    })
}
