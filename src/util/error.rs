// LeadSweep - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Every variant here is fatal for a run; per-record anomalies (null company,
// null location, missing critical fields) are not errors and never appear here.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all LeadSweep operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LeadSweepError {
    /// Column mapping or configuration is invalid.
    Config(ConfigError),

    /// The input table could not be read or parsed.
    Input(InputFormatError),

    /// Writing the output failed.
    Export(ExportError),
}

impl fmt::Display for LeadSweepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Input(e) => write!(f, "Input format error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
        }
    }
}

impl std::error::Error for LeadSweepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Input(e) => Some(e),
            Self::Export(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration and column mapping.
#[derive(Debug)]
pub enum ConfigError {
    /// A required role has no column mapped to it.
    MissingMapping { role: &'static str },

    /// A role is mapped to a column that is not in the input header.
    UnknownColumn { role: &'static str, column: String },

    /// A region name in the configuration is not one of the five regions.
    UnknownRegion { value: String },

    /// Trigger substrings were configured for the fallback region.
    DefaultRegionTriggers,

    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMapping { role } => write!(
                f,
                "No column mapped for required field '{role}'. \
                 Map at least First Name, Last Name, Company and Country/Region."
            ),
            Self::UnknownColumn { role, column } => write!(
                f,
                "Column '{column}' mapped to '{role}' does not exist in the input"
            ),
            Self::UnknownRegion { value } => write!(
                f,
                "Unknown region '{value}'. Expected one of: APAC, EURO, EMEA, US-West, US-East"
            ),
            Self::DefaultRegionTriggers => write!(
                f,
                "US-East is the fallback region and cannot have trigger substrings"
            ),
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for LeadSweepError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Input format errors
// ---------------------------------------------------------------------------

/// Errors raised while turning an input file into rows and columns.
#[derive(Debug)]
pub enum InputFormatError {
    /// Delimited text could not be tokenised.
    Csv { source: csv::Error },

    /// A spreadsheet workbook could not be opened or read.
    Spreadsheet {
        path: PathBuf,
        source: calamine::Error,
    },

    /// The input has no header row.
    NoColumns,

    /// The workbook contains no worksheets.
    EmptyWorkbook { path: PathBuf },

    /// A data row has more cells than the header.
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// The file extension is not a supported table format.
    UnsupportedFormat { path: PathBuf },

    /// Input file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// I/O error reading the input file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for InputFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv { source } => write!(f, "cannot tokenise delimited text: {source}"),
            Self::Spreadsheet { path, source } => {
                write!(f, "cannot read workbook '{}': {source}", path.display())
            }
            Self::NoColumns => write!(f, "no columns to parse from input"),
            Self::EmptyWorkbook { path } => {
                write!(f, "workbook '{}' contains no worksheets", path.display())
            }
            Self::RaggedRow {
                line,
                expected,
                found,
            } => write!(
                f,
                "line {line}: expected at most {expected} fields, found {found}"
            ),
            Self::UnsupportedFormat { path } => write!(
                f,
                "'{}' is not a supported file type. Use CSV or Excel (.xlsx, .xls).",
                path.display()
            ),
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "'{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::Io { path, source } => {
                write!(f, "I/O error reading '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for InputFormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Csv { source } => Some(source),
            Self::Spreadsheet { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<InputFormatError> for LeadSweepError {
    fn from(e: InputFormatError) -> Self {
        Self::Input(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for LeadSweepError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

/// Convenience type alias for LeadSweep results.
pub type Result<T> = std::result::Result<T, LeadSweepError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_missing_mapping_message_names_role() {
        let err = LeadSweepError::from(ConfigError::MissingMapping { role: "First Name" });
        let msg = err.to_string();
        assert!(msg.starts_with("Configuration error:"));
        assert!(msg.contains("'First Name'"));
    }

    #[test]
    fn test_io_error_preserves_source_chain() {
        let err = LeadSweepError::from(InputFormatError::Io {
            path: PathBuf::from("leads.csv"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        });
        let inner = err.source().expect("top-level source");
        assert!(inner.source().is_some());
    }
}
