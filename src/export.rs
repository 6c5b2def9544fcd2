//! Spreadsheet export of the mutable datasets.

use derive_more::{Display, From};
use rust_xlsxwriter::{Workbook, XlsxError};

use crate::session::Session;
use crate::store::{self, Record, TableStore};

pub const REPORT_FILE_NAME: &str = "E-Leave_Report.xlsx";

const NUMERIC_COLUMNS: &[&str] = &["Annual", "Sick"];

#[derive(Debug, Display, From)]
pub enum ExportError {
    Csv(csv::Error),
    Xlsx(XlsxError),
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Csv(e) => Some(e),
            ExportError::Xlsx(e) => Some(e),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(f64),
}

#[derive(Debug)]
struct Sheet {
    name: String,
    rows: Vec<Vec<Cell>>,
}

/// One sheet per table, header row first, in the same column order as the CSV files.
fn sheet<T: Record>(rows: &[T]) -> Result<Sheet, ExportError> {
    let encoded = store::encode(rows)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(encoded.as_slice());

    let mut cells = Vec::new();
    for (r, record) in reader.records().enumerate() {
        let record = record?;
        let row = record
            .iter()
            .enumerate()
            .map(|(c, field)| {
                let numeric = r > 0
                    && T::HEADERS
                        .get(c)
                        .is_some_and(|h| NUMERIC_COLUMNS.contains(h));
                match field.parse::<f64>() {
                    Ok(n) if numeric => Cell::Number(n),
                    _ => Cell::Text(field.to_string()),
                }
            })
            .collect();
        cells.push(row);
    }

    Ok(Sheet {
        name: T::DATASET.to_string(),
        rows: cells,
    })
}

fn sheets<S: TableStore>(session: &Session<S>) -> Result<Vec<Sheet>, ExportError> {
    Ok(vec![
        sheet(session.requests())?,
        sheet(session.audit_trail())?,
        sheet(session.balances())?,
    ])
}

fn write_workbook(sheets: &[Sheet]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        for (r, cells) in sheet.rows.iter().enumerate() {
            for (c, cell) in cells.iter().enumerate() {
                let (row, col) = (r as u32, c as u16);
                match cell {
                    Cell::Number(n) => worksheet.write_number(row, col, *n)?,
                    Cell::Text(s) => worksheet.write_string(row, col, s)?,
                };
            }
        }
    }
    Ok(workbook.save_to_buffer()?)
}

pub fn export_all<S: TableStore>(session: &Session<S>) -> Result<Vec<u8>, ExportError> {
    write_workbook(&sheets(session)?)
}
