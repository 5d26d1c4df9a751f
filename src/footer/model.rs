//! Typed (partially) representation of a Parquet `FileMetaData` footer.
//!
//! Every field that this crate never needs to interpret — `ColumnChunk`,
//! the bulk of `FileMetaData`'s own scalar fields, most of `RowGroup` — is
//! kept as the exact bytes it was decoded from, per spec: the builder
//! decodes just enough to validate invariants and build lookup tables, and
//! leaves everything else as an opaque, independently re-emittable slice.

/// One leaf `SchemaElement`: its decoded name (for the sidecar's name
/// table) plus the verbatim Thrift bytes of the whole element.
#[derive(Debug, Clone)]
pub struct SchemaLeaf {
    pub name: String,
    pub raw: Vec<u8>,
}

/// One field captured as raw, already-encoded Thrift bytes (header +
/// value), tagged with the field id so it can be spliced back in with
/// `Encoder::append_raw`.
#[derive(Debug, Clone)]
pub struct RawField {
    pub id: i16,
    pub bytes: Vec<u8>,
}

/// A decoded `RowGroup`: the scalar/administrative fields kept raw, the
/// `num_rows` scalar pulled out for aggregate recomputation, and each
/// column chunk kept as a raw, independently addressable Thrift struct.
#[derive(Debug, Clone)]
pub struct DecodedRowGroup {
    /// Raw bytes of every `RowGroup` field other than `columns` (field 1),
    /// concatenated in their original order.
    pub prefix_raw: Vec<u8>,
    /// Decoded `num_rows` (field 3), needed to recompute the projected
    /// `FileMetaData.num_rows` without re-parsing `prefix_raw`.
    pub num_rows: i64,
    /// Raw bytes of each `ColumnChunk`, in schema-leaf order.
    pub columns_raw: Vec<Vec<u8>>,
}

/// The fully decoded shape of a Parquet footer that this crate needs:
/// enough to build a sidecar, nothing more.
#[derive(Debug, Clone)]
pub struct DecodedFooter {
    /// Raw bytes of field 1 (`version`), if present.
    pub version_raw: Option<RawField>,
    /// Raw bytes of every top-level field after `row_groups` (ids 5-9),
    /// in original order.
    pub trailing_raw: Vec<RawField>,
    /// The root `SchemaElement`'s decoded name.
    pub root_name: String,
    /// Leaf schema elements, in their original (and column-chunk) order.
    pub leaves: Vec<SchemaLeaf>,
    /// Row groups, in original order.
    pub row_groups: Vec<DecodedRowGroup>,
}

impl DecodedFooter {
    pub fn num_leaf_columns(&self) -> usize {
        self.leaves.len()
    }
}
