use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed view of one cell, mirroring common Pandas dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnData – homogeneous typed storage for one column
// ---------------------------------------------------------------------------

/// Typed values of a single column. Every cell is nullable.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int64(Vec<Option<i64>>),
    Float64(Vec<Option<f64>>),
    Boolean(Vec<Option<bool>>),
    Utf8(Vec<Option<String>>),
}

/// Logical column type, used by the preview header and by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int64,
    Float64,
    Boolean,
    Utf8,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Int64 => "int64",
            ColumnType::Float64 => "float64",
            ColumnType::Boolean => "bool",
            ColumnType::Utf8 => "str",
        };
        f.write_str(name)
    }
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int64(v) => v.len(),
            ColumnData::Float64(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
            ColumnData::Utf8(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Int64(_) => ColumnType::Int64,
            ColumnData::Float64(_) => ColumnType::Float64,
            ColumnData::Boolean(_) => ColumnType::Boolean,
            ColumnData::Utf8(_) => ColumnType::Utf8,
        }
    }

    /// Cell at `row`, or `None` when out of range.
    pub fn get(&self, row: usize) -> Option<CellValue> {
        let cell = match self {
            ColumnData::Int64(v) => v.get(row)?.map(CellValue::Integer),
            ColumnData::Float64(v) => v.get(row)?.map(CellValue::Float),
            ColumnData::Boolean(v) => v.get(row)?.map(CellValue::Bool),
            ColumnData::Utf8(v) => v.get(row)?.clone().map(CellValue::String),
        };
        Some(cell.unwrap_or(CellValue::Null))
    }

    /// First `n` values (or all of them when shorter).
    fn head(&self, n: usize) -> ColumnData {
        fn take<T: Clone>(v: &[T], n: usize) -> Vec<T> {
            v[..n.min(v.len())].to_vec()
        }
        match self {
            ColumnData::Int64(v) => ColumnData::Int64(take(v, n)),
            ColumnData::Float64(v) => ColumnData::Float64(take(v, n)),
            ColumnData::Boolean(v) => ColumnData::Boolean(take(v, n)),
            ColumnData::Utf8(v) => ColumnData::Utf8(take(v, n)),
        }
    }

    /// Count of null cells.
    pub fn null_count(&self) -> usize {
        match self {
            ColumnData::Int64(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Float64(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Boolean(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Utf8(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }
}

// ---------------------------------------------------------------------------
// Column / Table
// ---------------------------------------------------------------------------

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Violations of the table invariants, reported by [`Table::new`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),
    #[error("column '{name}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// An in-memory, column-oriented decoded file.
///
/// Column names are unique and every column has the same length. Row order is
/// the order in which rows were decoded. A table is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    num_rows: usize,
}

impl Table {
    /// Build a table, checking the unique-name and equal-length invariants.
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let num_rows = columns.first().map(|c| c.data.len()).unwrap_or(0);

        let mut seen = HashSet::with_capacity(columns.len());
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(TableError::DuplicateColumn(col.name.clone()));
            }
            if col.data.len() != num_rows {
                return Err(TableError::LengthMismatch {
                    name: col.name.clone(),
                    expected: num_rows,
                    actual: col.data.len(),
                });
            }
        }

        Ok(Table { columns, num_rows })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in source order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Cell at (`row`, `col`) by position.
    pub fn cell(&self, row: usize, col: usize) -> Option<CellValue> {
        self.columns.get(col)?.data.get(row)
    }

    /// All cells of one row, in column order.
    pub fn row(&self, row: usize) -> Option<Vec<CellValue>> {
        if row >= self.num_rows {
            return None;
        }
        self.columns.iter().map(|c| c.data.get(row)).collect()
    }

    /// A new table holding the first `n` rows.
    pub fn head(&self, n: usize) -> Table {
        let columns: Vec<Column> = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), c.data.head(n)))
            .collect();
        Table {
            columns,
            num_rows: n.min(self.num_rows),
        }
    }
}
