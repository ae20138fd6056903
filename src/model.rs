use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A single cell extracted from a worksheet.
///
/// The variant set is closed on purpose: downstream serialisation matches on
/// it exhaustively, so a new kind of value cannot silently fall through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    /// Plain text content.
    Text(String),
    /// Numeric content. Integers are carried as floats, matching the
    /// spreadsheet formats themselves.
    Number(f64),
    /// A point in time decoded from the workbook's date representation.
    Date(NaiveDateTime),
    /// An empty cell.
    Empty,
}

impl CellValue {
    /// Returns true when the cell holds no content.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(value) => write!(f, "{value}"),
            CellValue::Number(value) => write!(f, "{value}"),
            CellValue::Date(value) => {
                if value.time() == NaiveTime::MIN {
                    write!(f, "{}", value.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S"))
                }
            }
            CellValue::Empty => Ok(()),
        }
    }
}

/// An ordered set of rows sharing one column set.
///
/// Invariant: every row holds exactly `columns.len()` cells. Rows pushed with
/// the wrong width are padded with [`CellValue::Empty`] or truncated.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Creates an empty table with the given column set.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a table from raw rows, promoting the first row to column
    /// headers. An empty input yields an empty table with no columns.
    pub fn from_rows(raw: Vec<Vec<CellValue>>) -> Self {
        let mut rows = raw.into_iter();
        let columns = match rows.next() {
            Some(header) => header.iter().map(CellValue::to_string).collect(),
            None => Vec::new(),
        };

        let mut table = Table::new(columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Appends a row, padding short rows and truncating long ones so the
    /// column invariant holds.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Empty);
        self.rows.push(row);
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// True when the table holds no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One candidate file discovered by the directory walker, together with the
/// hierarchy labels it was found under.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLocation {
    /// Full path of the candidate file.
    pub path: PathBuf,
    /// Region code of the top-level directory the file sits under.
    pub region: String,
    /// Month label; becomes the output subdirectory.
    pub month: String,
    /// Business-unit folder name, when the tree has that level.
    pub unit: Option<String>,
}

/// Destination of one harvested table: the month directory under the output
/// root plus the normalised file name.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTarget {
    pub month_dir: PathBuf,
    pub file_name: String,
}

impl OutputTarget {
    /// Computes the destination for a discovered source file. The file name
    /// is kept as-is except that `.xlsb` sources are renamed to `.xlsx`,
    /// since the writer only produces workbook files in the xlsx format.
    pub fn resolve(output_root: &Path, source: &SourceLocation) -> Self {
        let mut file_name = source
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let is_xlsb = Path::new(&file_name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsb"));
        if is_xlsb {
            file_name.truncate(file_name.len() - 4);
            file_name.push_str("xlsx");
        }

        Self {
            month_dir: output_root.join(&source.month),
            file_name,
        }
    }

    /// Full path of the destination file.
    pub fn path(&self) -> PathBuf {
        self.month_dir.join(&self.file_name)
    }
}
