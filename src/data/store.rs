use std::collections::BTreeMap;

use super::model::Table;

/// Row and column counts shown after a successful upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSummary {
    pub rows: usize,
    pub columns: usize,
}

impl From<&Table> for TableSummary {
    fn from(table: &Table) -> Self {
        Self {
            rows: table.num_rows(),
            columns: table.num_columns(),
        }
    }
}

/// Loaded tables keyed by logical dataset name (`ventas`, `productos`, ...).
///
/// Owned by whoever drives the loader and passed by reference to the parts
/// that need it; the loader itself never sees it.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    tables: BTreeMap<String, Table>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `table` under `name`, returning the table it replaces.
    pub fn insert(&mut self, name: impl Into<String>, table: Table) -> Option<Table> {
        self.tables.insert(name.into(), table)
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Table> {
        self.tables.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Dataset names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.tables.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn summary(&self, name: &str) -> Option<TableSummary> {
        self.get(name).map(TableSummary::from)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
