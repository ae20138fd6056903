use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{DataType, Reader, Xls, Xlsb, Xlsx, open_workbook};
use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::error::{HarvestError, Result};
use crate::model::{CellValue, Table};

/// The supported source formats, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Xlsx,
    Xls,
    Xlsb,
    Csv,
}

impl SheetFormat {
    /// Determines the format from a path's extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| HarvestError::UnknownFormat(path.to_path_buf()))?;

        match ext.to_ascii_lowercase().as_str() {
            "xlsx" => Ok(SheetFormat::Xlsx),
            "xls" => Ok(SheetFormat::Xls),
            "xlsb" => Ok(SheetFormat::Xlsb),
            "csv" => Ok(SheetFormat::Csv),
            _ => Err(HarvestError::UnknownFormat(path.to_path_buf())),
        }
    }

    /// CSV is a plain row stream; it has no worksheets to enumerate or
    /// select, so it is read whole instead.
    pub fn is_sheetless(self) -> bool {
        matches!(self, SheetFormat::Csv)
    }
}

enum Book {
    Xlsx(Xlsx<BufReader<File>>),
    Xls(Xls<BufReader<File>>),
    Xlsb(Xlsb<BufReader<File>>),
}

/// An open workbook, scoped to one file's processing. Dropping it releases
/// the underlying reader before the next file is opened.
pub struct Spreadsheet {
    path: PathBuf,
    book: Book,
}

impl std::fmt::Debug for Spreadsheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spreadsheet").field("path", &self.path).finish()
    }
}

impl Spreadsheet {
    /// Opens a workbook file with the decoder matching its extension.
    pub fn open(path: &Path) -> Result<Self> {
        let book = match SheetFormat::from_path(path)? {
            SheetFormat::Xlsx => {
                let book: Xlsx<_> = open_workbook(path).map_err(calamine::Error::from)?;
                Book::Xlsx(book)
            }
            SheetFormat::Xls => {
                let book: Xls<_> = open_workbook(path).map_err(calamine::Error::from)?;
                Book::Xls(book)
            }
            SheetFormat::Xlsb => {
                let book: Xlsb<_> = open_workbook(path).map_err(calamine::Error::from)?;
                Book::Xlsb(book)
            }
            SheetFormat::Csv => return Err(HarvestError::Sheetless(path.to_path_buf())),
        };

        Ok(Self {
            path: path.to_path_buf(),
            book,
        })
    }

    /// Names of the worksheets contained in this workbook.
    pub fn worksheet_names(&self) -> Vec<String> {
        match &self.book {
            Book::Xlsx(book) => book.sheet_names().to_vec(),
            Book::Xls(book) => book.sheet_names().to_vec(),
            Book::Xlsb(book) => book.sheet_names().to_vec(),
        }
    }

    /// Extracts one worksheet as a [`Table`], promoting the first row to
    /// column headers.
    pub fn read_table(&mut self, worksheet: &str) -> Result<Table> {
        let range = match &mut self.book {
            Book::Xlsx(book) => book
                .worksheet_range(worksheet)
                .map(|range| range.map_err(calamine::Error::from)),
            Book::Xls(book) => book
                .worksheet_range(worksheet)
                .map(|range| range.map_err(calamine::Error::from)),
            Book::Xlsb(book) => book
                .worksheet_range(worksheet)
                .map(|range| range.map_err(calamine::Error::from)),
        };

        let range = match range {
            Some(range) => range?,
            None => {
                return Err(HarvestError::MissingWorksheet {
                    path: self.path.clone(),
                    worksheet: worksheet.to_string(),
                    available: self.worksheet_names(),
                });
            }
        };

        let rows = range
            .rows()
            .map(|row| row.iter().map(convert_cell).collect())
            .collect();
        Ok(Table::from_rows(rows))
    }
}

/// Reads a whole CSV file, taking the column set from the header record.
/// Short records are padded and long ones truncated to the header width.
pub fn read_csv(path: &Path) -> Result<Table> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(BufReader::new(file));

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.to_string())
        .collect();

    let mut table = Table::new(columns);
    for record in reader.records() {
        let record = record?;
        table.push_row(record.iter().map(parse_csv_cell).collect());
    }
    Ok(table)
}

fn parse_csv_cell(raw: &str) -> CellValue {
    if raw.is_empty() {
        CellValue::Empty
    } else if let Ok(number) = raw.parse::<f64>() {
        CellValue::Number(number)
    } else {
        CellValue::Text(raw.to_string())
    }
}

fn convert_cell(cell: &DataType) -> CellValue {
    match cell {
        DataType::Empty => CellValue::Empty,
        DataType::String(value) => CellValue::Text(value.clone()),
        DataType::Float(value) => CellValue::Number(*value),
        DataType::Int(value) => CellValue::Number(*value as f64),
        DataType::Bool(value) => CellValue::Text(value.to_string()),
        DataType::DateTime(serial) => match from_excel_serial(*serial) {
            Some(datetime) => CellValue::Date(datetime),
            None => CellValue::Number(*serial),
        },
        other => CellValue::Text(other.to_string()),
    }
}

// Serial day counts are relative to 1899-12-30, with the time of day in the
// fractional part.
fn from_excel_serial(serial: f64) -> Option<NaiveDateTime> {
    let days = Duration::try_days(serial.trunc() as i64)?;
    let seconds = Duration::try_seconds((serial.fract() * 86_400.0).round() as i64)?;
    NaiveDate::from_ymd_opt(1899, 12, 30)?
        .checked_add_signed(days)?
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn format_detection_is_case_insensitive() {
        assert_eq!(
            SheetFormat::from_path(Path::new("19.a.XLSB")).unwrap(),
            SheetFormat::Xlsb
        );
        assert_eq!(
            SheetFormat::from_path(Path::new("19.a.csv")).unwrap(),
            SheetFormat::Csv
        );
        assert!(SheetFormat::from_path(Path::new("19.a.pdf")).is_err());
        assert!(SheetFormat::from_path(Path::new("19")).is_err());
    }

    #[test]
    fn csv_read_pads_and_truncates_to_header_width() {
        let mut file = tempfile::NamedTempFile::with_suffix(".csv").expect("temporary file");
        write!(file, "A,B,C\n1,2\nx,y,z,extra\n").expect("csv written");

        let table = read_csv(file.path()).expect("csv read");

        assert_eq!(table.columns, vec!["A", "B", "C"]);
        assert_eq!(
            table.rows[0],
            vec![
                CellValue::Number(1.0),
                CellValue::Number(2.0),
                CellValue::Empty
            ]
        );
        assert_eq!(
            table.rows[1],
            vec![
                CellValue::Text("x".into()),
                CellValue::Text("y".into()),
                CellValue::Text("z".into())
            ]
        );
    }

    #[test]
    fn csv_cells_parse_numbers_and_blanks() {
        assert_eq!(parse_csv_cell(""), CellValue::Empty);
        assert_eq!(parse_csv_cell("2.5"), CellValue::Number(2.5));
        assert_eq!(parse_csv_cell("abc"), CellValue::Text("abc".into()));
    }

    #[test]
    fn serial_dates_decode_from_the_1900_epoch() {
        // 45306 is 2024-01-15.
        let date = from_excel_serial(45_306.0).expect("valid serial");
        assert_eq!(date.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(date.time(), chrono::NaiveTime::MIN);

        let afternoon = from_excel_serial(45_306.5).expect("valid serial");
        assert_eq!(afternoon.time(), chrono::NaiveTime::from_hms_opt(12, 0, 0).unwrap());
    }

    #[test]
    fn opening_a_csv_as_a_workbook_is_rejected() {
        let err = Spreadsheet::open(Path::new("19.data.csv")).unwrap_err();
        assert!(matches!(err, HarvestError::Sheetless(_)));
    }
}
