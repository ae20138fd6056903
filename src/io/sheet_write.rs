use std::fs;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;

use crate::error::Result;
use crate::model::{CellValue, OutputTarget, Table};

/// Writes a harvested table to its destination, creating the month
/// directory first. Destinations named `.csv` are serialised as delimited
/// text; every other destination becomes a workbook file whose single
/// worksheet is named after the harvested one. An existing file at the
/// destination is overwritten.
pub fn write_table(target: &OutputTarget, table: &Table, worksheet: &str) -> Result<PathBuf> {
    fs::create_dir_all(&target.month_dir)?;

    let path = target.path();
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        write_csv(&path, table)?;
    } else {
        write_workbook(&path, table, worksheet)?;
    }
    Ok(path)
}

fn write_workbook(path: &Path, table: &Table, worksheet_name: &str) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(worksheet_name)?;

    for (col_idx, header) in table.columns.iter().enumerate() {
        worksheet.write_string(0, col_idx as u16, header)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let out_row = (row_idx + 1) as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let out_col = col_idx as u16;
            match cell {
                CellValue::Text(value) => {
                    worksheet.write_string(out_row, out_col, value)?;
                }
                CellValue::Number(value) => {
                    worksheet.write_number(out_row, out_col, *value)?;
                }
                CellValue::Date(_) => {
                    worksheet.write_string(out_row, out_col, &cell.to_string())?;
                }
                CellValue::Empty => {}
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn write_csv(path: &Path, table: &Table) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(CellValue::to_string))?;
    }
    writer.flush()?;
    Ok(())
}
