// LeadSweep - core/table.rs
//
// Schema-less input table: a header row plus rows of nullable cells.
// Core layer: parses in-memory content only. File reading and format
// dispatch live in app::import.

use crate::util::constants;
use crate::util::error::InputFormatError;
use std::collections::{HashMap, HashSet};

/// How raw cell text is turned into table cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    /// Field delimiter for delimited text.
    pub delimiter: u8,

    /// Exact cell contents that are read as null.
    pub null_markers: Vec<String>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            delimiter: constants::DEFAULT_DELIMITER,
            null_markers: constants::DEFAULT_NULL_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

impl TableOptions {
    fn cell(&self, raw: &str) -> Option<String> {
        if self.null_markers.iter().any(|m| m == raw) {
            None
        } else {
            Some(raw.to_string())
        }
    }
}

/// An input table of arbitrary columns.
///
/// Every row holds exactly `headers.len()` cells; `None` is a null cell.
/// Header names are unique (see [`normalise_headers`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Parse delimited text. The first record is the header.
    pub fn from_csv_str(content: &str, options: &TableOptions) -> Result<Self, InputFormatError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut records = reader.records();
        let header = match records.next() {
            Some(result) => result.map_err(|e| InputFormatError::Csv { source: e })?,
            None => return Err(InputFormatError::NoColumns),
        };
        let headers = normalise_headers(header.iter().map(str::to_string).collect());

        let mut rows = Vec::new();
        for result in records {
            let record = result.map_err(|e| InputFormatError::Csv { source: e })?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let cells = record.iter().map(|f| options.cell(f)).collect();
            rows.push(fit_row(cells, headers.len(), line)?);
        }

        tracing::debug!(
            columns = headers.len(),
            rows = rows.len(),
            "Parsed delimited table"
        );

        Ok(Self { headers, rows })
    }

    /// Build a table from a spreadsheet grid. The first row is the header.
    ///
    /// Rows in which every cell is null are skipped; worksheet ranges often
    /// extend over formatted but empty rows.
    pub fn from_grid<I>(grid: I, options: &TableOptions) -> Result<Self, InputFormatError>
    where
        I: IntoIterator<Item = Vec<Option<String>>>,
    {
        let mut grid = grid.into_iter();
        let header = grid.next().ok_or(InputFormatError::NoColumns)?;
        if header.is_empty() {
            return Err(InputFormatError::NoColumns);
        }
        let headers = normalise_headers(header.into_iter().map(Option::unwrap_or_default).collect());

        let mut rows = Vec::new();
        for (idx, raw) in grid.enumerate() {
            let cells: Vec<Option<String>> = raw
                .into_iter()
                .map(|c| c.and_then(|s| options.cell(&s)))
                .collect();
            if cells.iter().all(Option::is_none) {
                continue;
            }
            // Header is line 1.
            let line = idx as u64 + 2;
            rows.push(fit_row(cells, headers.len(), line)?);
        }

        tracing::debug!(columns = headers.len(), rows = rows.len(), "Built table from grid");

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of the column with exactly this header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell value, `None` if null or out of range.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|c| c.as_deref())
    }
}

/// Pad a short row with nulls; reject a row wider than the header.
fn fit_row(
    mut cells: Vec<Option<String>>,
    width: usize,
    line: u64,
) -> Result<Vec<Option<String>>, InputFormatError> {
    if cells.len() > width {
        // Trailing empty cells past the header are harmless (e.g. "a,b,").
        while cells.len() > width && cells.last().is_some_and(Option::is_none) {
            cells.pop();
        }
        if cells.len() > width {
            return Err(InputFormatError::RaggedRow {
                line,
                expected: width,
                found: cells.len(),
            });
        }
    }
    cells.resize(width, None);
    Ok(cells)
}

/// Make header names unique and non-blank.
///
/// Blank names become `Unnamed: <index>`. Repeats of a name get `.1`, `.2`,
/// ... in order of appearance, skipping any suffix already taken.
fn normalise_headers(raw: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut repeats: HashMap<String, usize> = HashMap::new();
    let mut headers = Vec::with_capacity(raw.len());

    for (idx, name) in raw.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("{}{idx}", constants::UNNAMED_COLUMN_PREFIX)
        } else {
            name
        };

        let mut n = repeats.get(&base).copied().unwrap_or(0);
        let mut candidate = base.clone();
        while taken.contains(&candidate) {
            n += 1;
            candidate = format!("{base}.{n}");
        }
        repeats.insert(base, n);
        taken.insert(candidate.clone());
        headers.push(candidate);
    }

    headers
}
