//! The request shape accepted by [`crate::read_metadata`].

/// Selects which row groups and columns a `read_metadata` call projects.
///
/// Empty `row_groups` means "all row groups"; empty column selection means
/// "all columns". `column_indices` and `column_names` are mutually
/// exclusive. Duplicates in either list are preserved in the order given
/// — no deduplication.
#[derive(Debug, Clone, Default)]
pub struct ProjectionRequest {
    pub row_groups: Vec<usize>,
    pub column_indices: Vec<usize>,
    pub column_names: Vec<String>,
}

impl ProjectionRequest {
    /// The full metadata: no row-group or column filtering.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_row_groups(mut self, row_groups: impl Into<Vec<usize>>) -> Self {
        self.row_groups = row_groups.into();
        self
    }

    pub fn with_column_indices(mut self, indices: impl Into<Vec<usize>>) -> Self {
        self.column_indices = indices.into();
        self
    }

    pub fn with_column_names(mut self, names: Vec<String>) -> Self {
        self.column_names = names;
        self
    }
}
