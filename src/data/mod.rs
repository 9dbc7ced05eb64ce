/// Data layer: upload handles, loading, and the table model.
///
/// Architecture:
/// ```text
///  .csv / .xlsx / .xls / .parquet
///        │
///        ▼
///   ┌──────────────┐
///   │ UploadedFile │  name + bytes from the host
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  dispatch on extension → Table | LoadError
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ DatasetStore │  caller-owned, keyed by dataset name
///   └──────────────┘
/// ```

pub mod error;
pub mod loader;
pub mod model;
pub mod source;
pub mod store;

pub use error::LoadError;
pub use loader::{FileFormat, HeaderMode, LoadOptions, load, load_batch, load_file, load_path};
pub use model::{CellValue, Column, ColumnData, ColumnType, Table, TableError};
pub use source::{MemoryFile, PathFile, UploadedFile};
pub use store::{DatasetStore, TableSummary};
