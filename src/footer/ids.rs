//! Field ids pinned from the Parquet Thrift IDL (`parquet.thrift`). Stable
//! across format versions — do not renumber.

pub mod file_metadata {
    pub const VERSION: i16 = 1;
    pub const SCHEMA: i16 = 2;
    pub const NUM_ROWS: i16 = 3;
    pub const ROW_GROUPS: i16 = 4;
    pub const KEY_VALUE_METADATA: i16 = 5;
    pub const CREATED_BY: i16 = 6;
    pub const COLUMN_ORDERS: i16 = 7;
    pub const ENCRYPTION_ALGORITHM: i16 = 8;
    pub const FOOTER_SIGNING_KEY_METADATA: i16 = 9;
}

pub mod schema_element {
    pub const NAME: i16 = 4;
    pub const NUM_CHILDREN: i16 = 5;
}

pub mod row_group {
    pub const COLUMNS: i16 = 1;
    pub const NUM_ROWS: i16 = 3;
}
