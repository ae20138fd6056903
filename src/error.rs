use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Error type covering the different failure cases that can occur when the
/// pipeline walks the source tree, decodes spreadsheets, or writes output
/// files.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Wrapper for IO failures such as listing directories or creating the
    /// output tree.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing of a configuration file fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the CSV reader or writer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Errors bubbled up from the spreadsheet reader implementation.
    #[error("spreadsheet read error: {0}")]
    SheetRead(#[from] calamine::Error),

    /// Errors bubbled up from the workbook writer implementation.
    #[error("spreadsheet write error: {0}")]
    SheetWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Raised when the configured source root is not a directory.
    #[error("source root not found: {0}")]
    MissingSourceRoot(PathBuf),

    /// Raised when a candidate file carries an extension outside the
    /// supported set.
    #[error("unrecognised spreadsheet extension: {0}")]
    UnknownFormat(PathBuf),

    /// Raised when the target worksheet is absent from a workbook. Carries
    /// the names that do exist so the skip log can show them.
    #[error("{path}: worksheet '{worksheet}' not found (available: {available:?})")]
    MissingWorksheet {
        path: PathBuf,
        worksheet: String,
        available: Vec<String>,
    },

    /// Raised when a worksheet operation is attempted on a format without
    /// worksheets.
    #[error("{0} is a sheet-less format")]
    Sheetless(PathBuf),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the CLI arguments cannot be assembled into a usable
    /// configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
