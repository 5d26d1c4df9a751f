//! The sidecar's `SchemaBlock`: the projected-root's name plus each leaf
//! `SchemaElement`'s raw Thrift bytes, addressable by index.
//!
//! The root element itself is never stored pre-encoded: its `num_children`
//! depends on how many leaves a given request selects, so it is always
//! rebuilt fresh at read time from the stored name and the request's leaf
//! count.

use crate::error::{Error, Result};
use crate::footer::ids::schema_element as se;
use crate::footer::model::SchemaLeaf;
use crate::thrift::{Decoder, Encoder, TType};

pub fn encode(root_name: &str, leaves: &[SchemaLeaf]) -> Vec<u8> {
    let mut out = Encoder::new();
    out.write_varint_u64(root_name.len() as u64);
    out.write_bytes(root_name.as_bytes());
    out.write_varint_u64(leaves.len() as u64);

    // Table offsets are absolute from the SchemaBlock's own start, so the
    // table itself (fixed-size, length known up front) must be accounted
    // for before the first leaf's offset.
    let leaves_start = out.len() + leaves.len() * 8;
    let mut offset = leaves_start;
    for leaf in leaves {
        out.write_bytes(&(offset as u32).to_le_bytes());
        out.write_bytes(&(leaf.raw.len() as u32).to_le_bytes());
        offset += leaf.raw.len();
    }
    for leaf in leaves {
        out.write_bytes(&leaf.raw);
    }
    out.into_bytes()
}

/// A parsed view over an encoded `SchemaBlock`.
pub struct SchemaBlockView<'a> {
    bytes: &'a [u8],
    pub root_name: String,
    leaf_table: Vec<(u32, u32)>,
}

impl<'a> SchemaBlockView<'a> {
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        let mut dec = Decoder::new(bytes, 0);
        let name_len = dec.read_varint_u64()? as usize;
        let root_name = std::str::from_utf8(dec.read_slice(name_len)?)
            .map_err(|e| Error::MalformedParquet(format!("invalid schema root name: {e}")))?
            .to_string();
        let leaf_count = dec.read_varint_u64()? as usize;
        let mut leaf_table = Vec::with_capacity(leaf_count);
        for _ in 0..leaf_count {
            let off = u32::from_le_bytes(dec.read_slice(4)?.try_into().unwrap());
            let len = u32::from_le_bytes(dec.read_slice(4)?.try_into().unwrap());
            leaf_table.push((off, len));
        }
        Ok(Self {
            bytes,
            root_name,
            leaf_table,
        })
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_table.len()
    }

    pub fn leaf_raw(&self, index: usize) -> Result<&'a [u8]> {
        let (off, len) = *self
            .leaf_table
            .get(index)
            .ok_or_else(|| Error::OutOfRange(format!("schema leaf index {index} out of range")))?;
        Ok(&self.bytes[off as usize..(off + len) as usize])
    }
}

/// Builds a fresh root `SchemaElement` with `num_children` set to
/// `selected_leaf_count`.
pub fn encode_root(root_name: &str, selected_leaf_count: usize) -> Vec<u8> {
    let mut enc = Encoder::new();
    enc.write_field_header(se::NAME, TType::Binary);
    enc.write_binary(root_name.as_bytes());
    enc.write_field_header(se::NUM_CHILDREN, TType::I32);
    enc.write_zigzag_i32(selected_leaf_count as i32);
    enc.write_field_stop();
    enc.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_block_roundtrips_leaves() {
        let leaves = vec![
            SchemaLeaf {
                name: "a".into(),
                raw: vec![1, 2, 3],
            },
            SchemaLeaf {
                name: "b".into(),
                raw: vec![4, 5],
            },
            SchemaLeaf {
                name: "c".into(),
                raw: vec![6, 7, 8, 9],
            },
        ];
        let bytes = encode("root", &leaves);
        let view = SchemaBlockView::parse(&bytes).unwrap();
        assert_eq!(view.root_name, "root");
        assert_eq!(view.leaf_count(), 3);
        assert_eq!(view.leaf_raw(0).unwrap(), &[1, 2, 3]);
        assert_eq!(view.leaf_raw(1).unwrap(), &[4, 5]);
        assert_eq!(view.leaf_raw(2).unwrap(), &[6, 7, 8, 9]);
    }

    #[test]
    fn encoded_root_has_requested_child_count() {
        let bytes = encode_root("schema", 3);
        let mut dec = Decoder::new(&bytes, 0);
        let mut last = 0i16;
        let f1 = dec.read_field_header(&mut last).unwrap().unwrap();
        assert_eq!(f1.id, se::NAME);
        assert_eq!(dec.read_string().unwrap(), "schema");
        let f2 = dec.read_field_header(&mut last).unwrap().unwrap();
        assert_eq!(f2.id, se::NUM_CHILDREN);
        assert_eq!(dec.read_zigzag_i32().unwrap(), 3);
        assert!(dec.read_field_header(&mut last).unwrap().is_none());
    }
}
