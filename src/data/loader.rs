use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float64Type, Int64Type, UInt64Type};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use bytes::Bytes;
use calamine::{Data, ExcelDateTime, Range, Reader, Xls, Xlsx};
use chrono::NaiveTime;
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::{Deserialize, Serialize};

use super::error::LoadError;
use super::model::{Column, ColumnData, Table};
use super::source::{PathFile, UploadedFile};

// ---------------------------------------------------------------------------
// Format dispatch and options
// ---------------------------------------------------------------------------

/// Decoder selected from the filename suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xls,
    Parquet,
}

impl FileFormat {
    /// Case-insensitive suffix match. `None` means the file is unsupported.
    pub fn from_filename(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".csv") {
            Some(FileFormat::Csv)
        } else if lower.ends_with(".xlsx") {
            Some(FileFormat::Xlsx)
        } else if lower.ends_with(".xls") {
            Some(FileFormat::Xls)
        } else if lower.ends_with(".parquet") {
            Some(FileFormat::Parquet)
        } else {
            None
        }
    }

    /// Extensions accepted by the loader, for file dialogs.
    pub const EXTENSIONS: [&'static str; 4] = ["csv", "xlsx", "xls", "parquet"];
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileFormat::Csv => "CSV",
            FileFormat::Xlsx => "XLSX",
            FileFormat::Xls => "XLS",
            FileFormat::Parquet => "Parquet",
        };
        f.write_str(name)
    }
}

/// Whether the first row of a CSV/spreadsheet holds the column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMode {
    #[default]
    FirstRow,
    /// Every row is data; columns are named `column_0`, `column_1`, ...
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    pub header: HeaderMode,
    /// CSV field separator. Must be ASCII.
    pub delimiter: char,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            header: HeaderMode::FirstRow,
            delimiter: ',',
        }
    }
}

impl LoadOptions {
    fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .with_context(|| format!("delimiter {:?} is not an ASCII character", self.delimiter))
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load an uploaded file into a [`Table`] with default options.
pub fn load_file(file: &mut dyn UploadedFile) -> Result<Table, LoadError> {
    load(file, &LoadOptions::default())
}

/// Load an uploaded file into a [`Table`].  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – UTF-8 text, first row is the header unless [`HeaderMode::None`]
/// * `.xlsx` / `.xls` – first worksheet only
/// * `.parquet` – all row groups, schema column order
///
/// The format is chosen before anything is read, so an unsupported file is
/// rejected without touching its stream.
pub fn load(file: &mut dyn UploadedFile, options: &LoadOptions) -> Result<Table, LoadError> {
    let filename = file.name().to_string();
    let format = FileFormat::from_filename(&filename).ok_or_else(|| {
        LoadError::UnsupportedFormat {
            filename: filename.clone(),
        }
    })?;
    debug!("Loading '{filename}' as {format}");

    let bytes = file.read().map_err(|source| LoadError::IoFailure {
        filename: filename.clone(),
        source,
    })?;

    let decoded = match format {
        FileFormat::Csv => load_csv(&bytes, options),
        FileFormat::Xlsx => load_spreadsheet::<Xlsx<Cursor<Vec<u8>>>>(bytes, options),
        FileFormat::Xls => load_spreadsheet::<Xls<Cursor<Vec<u8>>>>(bytes, options),
        FileFormat::Parquet => load_parquet(bytes),
    };
    let table =
        decoded.map_err(|e| LoadError::malformed(&filename, format, format!("{e:#}")))?;

    info!(
        "Loaded '{filename}': {} rows, {} columns",
        table.num_rows(),
        table.num_columns()
    );
    Ok(table)
}

/// Load a file from disk.
pub fn load_path(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Table, LoadError> {
    load(&mut PathFile::new(path.as_ref()), options)
}

/// Load several independent uploads in parallel, one scoped thread each.
///
/// Results come back in input order, keyed as given; one failure never
/// affects the other files.
pub fn load_batch(
    files: Vec<(String, Box<dyn UploadedFile + Send>)>,
    options: &LoadOptions,
) -> Vec<(String, Result<Table, LoadError>)> {
    std::thread::scope(|scope| {
        let handles: Vec<_> = files
            .into_iter()
            .map(|(key, mut file)| {
                scope.spawn(move || {
                    let result = load(file.as_mut(), options);
                    (key, result)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    })
}

// ---------------------------------------------------------------------------
// Header handling
// ---------------------------------------------------------------------------

/// Blank names become `Unnamed: {i}`, repeats get `.1`, `.2`, ... suffixes.
fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut suffixes: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(raw.len());

    for (i, name) in raw.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            name
        };
        let mut candidate = base.clone();
        while seen.contains(&candidate) {
            let n = suffixes.entry(base.clone()).or_insert(0);
            *n += 1;
            candidate = format!("{base}.{n}");
        }
        seen.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

fn positional_headers(width: usize) -> Vec<String> {
    (0..width).map(|i| format!("column_{i}")).collect()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Tokens read as missing values, as Pandas does by default.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#NA", "N/A", "NA", "n/a", "NULL", "null", "NaN", "nan", "-NaN", "-nan", "None",
    "<NA>",
];

/// CSV layout: one record per line, every record with the header's width.
/// Column types are inferred after the whole file is read (no row cap).
fn load_csv(bytes: &[u8], options: &LoadOptions) -> Result<Table> {
    let text = std::str::from_utf8(bytes).context("content is not valid UTF-8")?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(options.delimiter_byte()?)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let mut raw_columns: Vec<Vec<Option<String>>> = Vec::new();

    let headers = match options.header {
        HeaderMode::FirstRow => {
            let first = records
                .next()
                .context("no columns to parse: file is empty")?
                .context("reading CSV header")?;
            raw_columns.resize(first.len(), Vec::new());
            first.iter().map(str::to_string).collect()
        }
        HeaderMode::None => Vec::new(),
    };

    for (row_no, result) in records.enumerate() {
        let record = result.with_context(|| format!("CSV row {}", row_no + 1))?;
        if raw_columns.is_empty() {
            raw_columns.resize(record.len(), Vec::new());
        }
        for (col, field) in record.iter().enumerate() {
            let value = (!NA_TOKENS.contains(&field)).then(|| field.to_string());
            raw_columns[col].push(value);
        }
    }

    let names = match options.header {
        HeaderMode::FirstRow => normalize_headers(headers),
        HeaderMode::None => {
            if raw_columns.is_empty() {
                bail!("no columns to parse: file is empty");
            }
            positional_headers(raw_columns.len())
        }
    };

    let columns = names
        .into_iter()
        .zip(raw_columns)
        .map(|(name, values)| Column::new(name, infer_text_column(values)))
        .collect();
    Table::new(columns).context("assembling table")
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Narrowest type every non-null field parses as: integer, float, bool, text.
/// A column with no values at all is float (all nulls), like Pandas.
fn infer_text_column(values: Vec<Option<String>>) -> ColumnData {
    let mut present = values.iter().flatten().map(|s| s.trim()).peekable();
    if present.peek().is_none() {
        return all_null_column(values.len());
    }

    if values.iter().flatten().all(|s| s.trim().parse::<i64>().is_ok()) {
        return ColumnData::Int64(
            values
                .iter()
                .map(|v| v.as_deref().and_then(|s| s.trim().parse().ok()))
                .collect(),
        );
    }
    if values.iter().flatten().all(|s| s.trim().parse::<f64>().is_ok()) {
        return ColumnData::Float64(
            values
                .iter()
                .map(|v| v.as_deref().and_then(|s| s.trim().parse().ok()))
                .collect(),
        );
    }
    if values.iter().flatten().all(|s| parse_bool(s.trim()).is_some()) {
        return ColumnData::Boolean(
            values
                .iter()
                .map(|v| v.as_deref().and_then(|s| parse_bool(s.trim())))
                .collect(),
        );
    }
    ColumnData::Utf8(values)
}

fn all_null_column(len: usize) -> ColumnData {
    if len == 0 {
        ColumnData::Utf8(Vec::new())
    } else {
        ColumnData::Float64(vec![None; len])
    }
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

/// A decoded worksheet cell before its column type is settled.
#[derive(Debug, Clone, PartialEq)]
enum SheetCell {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl fmt::Display for SheetCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetCell::Null => Ok(()),
            SheetCell::Int(i) => write!(f, "{i}"),
            SheetCell::Float(v) => write!(f, "{v}"),
            SheetCell::Bool(b) => write!(f, "{b}"),
            SheetCell::Text(s) => f.write_str(s),
        }
    }
}

/// Excel stores every number as a float; whole values are read as integers.
/// Strings use the same missing-value tokens as CSV; error cells are missing.
fn sheet_cell(cell: &Data) -> SheetCell {
    match cell {
        Data::Empty | Data::Error(_) => SheetCell::Null,
        Data::Int(i) => SheetCell::Int(*i),
        Data::Float(f) => {
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                SheetCell::Int(*f as i64)
            } else {
                SheetCell::Float(*f)
            }
        }
        Data::Bool(b) => SheetCell::Bool(*b),
        Data::String(s) if NA_TOKENS.contains(&s.as_str()) => SheetCell::Null,
        Data::String(s) => SheetCell::Text(s.clone()),
        Data::DateTime(dt) => SheetCell::Text(excel_datetime_text(dt)),
        Data::DateTimeIso(s) | Data::DurationIso(s) => SheetCell::Text(s.clone()),
    }
}

/// Dates as `%Y-%m-%d`, with `%H:%M:%S` appended when the time is not
/// midnight; durations as `H:MM:SS`.
fn excel_datetime_text(dt: &ExcelDateTime) -> String {
    if dt.is_duration() {
        if let Some(duration) = dt.as_duration() {
            let secs = duration.num_seconds();
            let sign = if secs < 0 { "-" } else { "" };
            let secs = secs.abs();
            return format!("{sign}{}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60);
        }
    } else if let Some(naive) = dt.as_datetime() {
        let pattern = if naive.time() == NaiveTime::MIN {
            "%Y-%m-%d"
        } else {
            "%Y-%m-%d %H:%M:%S"
        };
        return naive.format(pattern).to_string();
    }
    dt.as_f64().to_string()
}

/// Header cells keep their text even when it reads as a missing value.
fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        other => sheet_cell(other).to_string(),
    }
}

fn is_blank_cell(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Read the first worksheet of an `.xlsx` or `.xls` workbook.
fn load_spreadsheet<R>(bytes: Vec<u8>, options: &LoadOptions) -> Result<Table>
where
    R: Reader<Cursor<Vec<u8>>>,
    R::Error: fmt::Display,
{
    let mut workbook =
        R::new(Cursor::new(bytes)).map_err(|e| anyhow!("opening workbook: {e}"))?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .map_err(|e| anyhow!("reading first worksheet: {e}"))?;
    table_from_range(&range, options)
}

/// The used range is rectangular, so short rows are already padded with
/// empty cells. Trailing all-empty rows are dropped.
fn table_from_range(range: &Range<Data>, options: &LoadOptions) -> Result<Table> {
    let width = range.width();
    if range.is_empty() || width == 0 {
        bail!("first worksheet is empty");
    }

    let mut rows = range.rows();
    let names = match options.header {
        HeaderMode::FirstRow => {
            let header = rows.next().context("first worksheet has no header row")?;
            normalize_headers(header.iter().map(header_text).collect())
        }
        HeaderMode::None => positional_headers(width),
    };

    let mut body: Vec<&[Data]> = rows.collect();
    while body
        .last()
        .is_some_and(|row| row.iter().all(is_blank_cell))
    {
        body.pop();
    }

    let mut cells: Vec<Vec<SheetCell>> = vec![Vec::with_capacity(body.len()); width];
    for row in body {
        for (col, cell) in row.iter().enumerate().take(width) {
            cells[col].push(sheet_cell(cell));
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name, infer_sheet_column(values)))
        .collect();
    Table::new(columns).context("assembling table")
}

fn infer_sheet_column(values: Vec<SheetCell>) -> ColumnData {
    let present: Vec<&SheetCell> = values.iter().filter(|c| **c != SheetCell::Null).collect();
    if present.is_empty() {
        return all_null_column(values.len());
    }

    if present.iter().all(|c| matches!(c, SheetCell::Int(_))) {
        return ColumnData::Int64(
            values
                .iter()
                .map(|c| match c {
                    SheetCell::Int(i) => Some(*i),
                    _ => None,
                })
                .collect(),
        );
    }
    if present
        .iter()
        .all(|c| matches!(c, SheetCell::Int(_) | SheetCell::Float(_)))
    {
        return ColumnData::Float64(
            values
                .iter()
                .map(|c| match c {
                    SheetCell::Int(i) => Some(*i as f64),
                    SheetCell::Float(f) => Some(*f),
                    _ => None,
                })
                .collect(),
        );
    }
    if present.iter().all(|c| matches!(c, SheetCell::Bool(_))) {
        return ColumnData::Boolean(
            values
                .iter()
                .map(|c| match c {
                    SheetCell::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect(),
        );
    }
    ColumnData::Utf8(
        values
            .iter()
            .map(|c| match c {
                SheetCell::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Index columns Pandas writes alongside the data; they are not data columns.
const PANDAS_INDEX_PREFIX: &str = "__index_level_";

/// Load a Parquet file, concatenating every record batch in file order.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(bytes: Vec<u8>) -> Result<Table> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(Bytes::from(bytes))
        .context("reading parquet metadata")?;
    let schema = builder.schema().clone();
    let reader = builder.build().context("building parquet reader")?;

    let mut batches = Vec::new();
    for batch_result in reader {
        batches.push(batch_result.context("reading parquet record batch")?);
    }

    let mut columns = Vec::with_capacity(schema.fields().len());
    for (idx, field) in schema.fields().iter().enumerate() {
        if field.name().starts_with(PANDAS_INDEX_PREFIX) {
            continue;
        }
        let parts: Vec<&dyn Array> = batches.iter().map(|b| b.column(idx).as_ref()).collect();
        let merged = if parts.is_empty() {
            arrow::array::new_empty_array(field.data_type())
        } else {
            arrow::compute::concat(&parts)
                .with_context(|| format!("concatenating column '{}'", field.name()))?
        };
        let data = arrow_column(&merged)
            .with_context(|| format!("converting column '{}'", field.name()))?;
        columns.push(Column::new(field.name().clone(), data));
    }

    Table::new(columns).context("assembling table")
}

// -- Arrow helpers --

/// Map an Arrow array onto one of the four table column types.
/// Types with no direct counterpart are rendered as text.
fn arrow_column(array: &ArrayRef) -> Result<ColumnData> {
    let data = match array.data_type() {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => {
            let cast = arrow::compute::cast(array.as_ref(), &DataType::Int64)?;
            ColumnData::Int64(cast.as_primitive::<Int64Type>().iter().collect())
        }
        DataType::UInt64 => {
            let values = array.as_primitive::<UInt64Type>();
            let converted: Option<Vec<Option<i64>>> = values
                .iter()
                .map(|v| match v {
                    Some(x) => i64::try_from(x).ok().map(Some),
                    None => Some(None),
                })
                .collect();
            match converted {
                Some(ints) => ColumnData::Int64(ints),
                None => render_as_text(array)?,
            }
        }
        DataType::Float16 | DataType::Float32 | DataType::Float64 => {
            let cast = arrow::compute::cast(array.as_ref(), &DataType::Float64)?;
            ColumnData::Float64(cast.as_primitive::<Float64Type>().iter().collect())
        }
        DataType::Boolean => ColumnData::Boolean(array.as_boolean().iter().collect()),
        DataType::Utf8 => ColumnData::Utf8(
            array
                .as_string::<i32>()
                .iter()
                .map(|s| s.map(str::to_owned))
                .collect(),
        ),
        DataType::LargeUtf8 => ColumnData::Utf8(
            array
                .as_string::<i64>()
                .iter()
                .map(|s| s.map(str::to_owned))
                .collect(),
        ),
        _ => render_as_text(array)?,
    };
    Ok(data)
}

fn render_as_text(array: &ArrayRef) -> Result<ColumnData> {
    let options = FormatOptions::default();
    let formatter = ArrayFormatter::try_new(array.as_ref(), &options)?;
    Ok(ColumnData::Utf8(
        (0..array.len())
            .map(|i| (!array.is_null(i)).then(|| formatter.value(i).to_string()))
            .collect(),
    ))
}
