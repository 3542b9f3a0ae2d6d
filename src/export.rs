//! CSV export of the filtered dataset.
//!
//! The header row is the visible columns' labels in display order. Fields
//! are quoted only when they contain a delimiter, quote or line break, with
//! inner quotes doubled. Null cells export as empty fields.

use crate::column::ColumnDescriptor;
use crate::error::ExportError;
use crate::row::TableRow;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default export file name, without extension.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "table-export";

/// Writes `rows` as CSV to `writer`.
pub fn write_csv<T, W>(writer: W, rows: &[T], columns: &[&ColumnDescriptor]) -> Result<(), ExportError>
where
    T: TableRow,
    W: Write,
{
    if rows.is_empty() {
        return Err(ExportError::NoData);
    }

    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(columns.iter().map(|c| c.label.as_str()))?;
    for row in rows {
        wtr.write_record(columns.iter().map(|c| row.value(&c.key).to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Renders `rows` as a CSV string.
pub fn to_csv_string<T: TableRow>(rows: &[T], columns: &[&ColumnDescriptor]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv(&mut buf, rows, columns)?;
    String::from_utf8(buf).map_err(|e| ExportError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Writes `<file_name>.csv` into `dir` and returns its path.
pub fn export_to_path<T: TableRow>(
    dir: &Path,
    file_name: &str,
    rows: &[T],
    columns: &[&ColumnDescriptor],
) -> Result<PathBuf, ExportError> {
    if rows.is_empty() {
        return Err(ExportError::NoData);
    }
    let path = dir.join(format!("{file_name}.csv"));
    let file = File::create(&path)?;
    write_csv(file, rows, columns)?;
    debug!(path = %path.display(), rows = rows.len(), "exported table");
    Ok(path)
}
