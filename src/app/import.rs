// LeadSweep - app/import.rs
//
// Loads an input file into a `Table`, dispatching on the file extension.
// Delimited text goes through core::table; workbooks are read with calamine
// (first worksheet only) and handed over as a grid of optional strings.

use crate::core::table::{Table, TableOptions};
use crate::platform::fs;
use crate::util::constants;
use crate::util::error::InputFormatError;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Input file kinds recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Delimited,
    TabSeparated,
    Workbook,
}

impl InputKind {
    /// Classify `path` by extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Some(Self::Delimited),
            "tsv" => Some(Self::TabSeparated),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Workbook),
            _ => None,
        }
    }
}

/// Read `path` into a table.
pub fn load_table(path: &Path, options: &TableOptions) -> Result<Table, InputFormatError> {
    let kind = InputKind::from_path(path).ok_or_else(|| InputFormatError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    tracing::info!(path = %path.display(), kind = ?kind, "Loading input table");

    let table = match kind {
        InputKind::Delimited => Table::from_csv_str(&fs::read_text(path)?, options)?,
        InputKind::TabSeparated => {
            let mut options = options.clone();
            if options.delimiter == constants::DEFAULT_DELIMITER {
                options.delimiter = b'\t';
            }
            Table::from_csv_str(&fs::read_text(path)?, &options)?
        }
        InputKind::Workbook => load_workbook(path, options)?,
    };

    tracing::info!(
        rows = table.row_count(),
        columns = table.headers().len(),
        "Input table loaded"
    );
    Ok(table)
}

fn load_workbook(path: &Path, options: &TableOptions) -> Result<Table, InputFormatError> {
    fs::check_input_size(path)?;

    let spreadsheet_err = |e: calamine::Error| InputFormatError::Spreadsheet {
        path: path.to_path_buf(),
        source: e,
    };

    let mut workbook = open_workbook_auto(path).map_err(spreadsheet_err)?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| InputFormatError::EmptyWorkbook {
            path: path.to_path_buf(),
        })?;
    let range = workbook.worksheet_range(&sheet).map_err(spreadsheet_err)?;

    tracing::debug!(
        sheet = %sheet,
        height = range.height(),
        width = range.width(),
        "Reading worksheet"
    );

    let grid = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
    Table::from_grid(grid, options)
}

/// Text form of a worksheet cell; `None` for empty cells.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        // Whole numbers (phone numbers, zip codes) lose the ".0".
        Data::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
        Data::Float(n) => Some(n.to_string()),
        Data::Int(n) => Some(n.to_string()),
        Data::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) => Some(dt.as_f64().to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Error(e) => Some(e.to_string()),
    }
}
