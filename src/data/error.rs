use std::io;

use thiserror::Error;

use super::loader::FileFormat;

/// Why an uploaded file could not be turned into a [`Table`](super::model::Table).
#[derive(Debug, Error)]
pub enum LoadError {
    /// The filename has no extension, or one outside `.csv/.xlsx/.xls/.parquet`.
    #[error("unsupported file format: '{filename}' (expected .csv, .xlsx, .xls or .parquet)")]
    UnsupportedFormat { filename: String },

    /// The selected decoder could not parse the bytes into a table.
    #[error("malformed {format} content in '{filename}': {cause}")]
    MalformedContent {
        filename: String,
        format: FileFormat,
        cause: String,
    },

    /// The byte stream could not be fully read.
    #[error("failed to read '{filename}': {source}")]
    IoFailure {
        filename: String,
        #[source]
        source: io::Error,
    },
}

impl LoadError {
    pub(crate) fn malformed(filename: &str, format: FileFormat, cause: impl ToString) -> Self {
        LoadError::MalformedContent {
            filename: filename.to_string(),
            format,
            cause: cause.to_string(),
        }
    }

    /// Name of the file that failed to load.
    pub fn filename(&self) -> &str {
        match self {
            LoadError::UnsupportedFormat { filename }
            | LoadError::MalformedContent { filename, .. }
            | LoadError::IoFailure { filename, .. } => filename,
        }
    }
}
