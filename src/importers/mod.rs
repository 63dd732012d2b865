// Import module - workbook loading and sheet resolution

pub mod sheet_locator;
pub mod workbook;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{ReportError, Result};

pub use sheet_locator::{locate_sheets, LocatedSheets, LogicalSheet, SheetNames};
pub use workbook::{Cell, Row, Table, Workbook};

/// Load every sheet of a spreadsheet file (xlsx, xlsm, xlsb, xls, ods)
pub fn load_workbook<P: AsRef<Path>>(path: P) -> Result<Workbook> {
    let path = path.as_ref();
    info!("Loading workbook: {:?}", path);

    let sheets = open_workbook_auto(path)?;
    read_all_sheets(sheets)
}

/// Load a workbook from uploaded bytes
pub fn load_workbook_from_bytes(bytes: Vec<u8>) -> Result<Workbook> {
    info!("Loading workbook from {} bytes", bytes.len());

    let sheets = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    read_all_sheets(sheets)
}

fn read_all_sheets<RS: Read + Seek>(mut sheets: Sheets<RS>) -> Result<Workbook> {
    let names = sheets.sheet_names();
    debug!("Workbook sheets: {:?}", names);

    let mut tables = Vec::with_capacity(names.len());
    for name in names {
        let range = sheets.worksheet_range(&name)?;
        tables.push(table_from_range(&name, &range)?);
    }

    Ok(Workbook::new(tables))
}

/// Convert a calamine range into a table, treating the first row as headers.
///
/// A number that cannot be held as a `Decimal` is a schema error rather than
/// a silently blank cell.
fn table_from_range(name: &str, range: &Range<Data>) -> Result<Table> {
    let mut rows = range.rows();

    let columns: Vec<String> = rows
        .next()
        .map(|header| header.iter().map(|cell| cell.to_string()).collect())
        .unwrap_or_default();

    let mut body = Vec::new();
    for (row_index, row) in rows.enumerate() {
        let cells = row
            .iter()
            .enumerate()
            .map(|(col, data)| {
                cell_from_data(data).ok_or_else(|| ReportError::Schema {
                    sheet: name.to_string(),
                    detail: format!(
                        "number {} in data row {}, column '{}' is outside the supported range",
                        data,
                        row_index + 1,
                        columns.get(col).map(String::as_str).unwrap_or("?")
                    ),
                })
            })
            .collect::<Result<Vec<Cell>>>()?;
        body.push(cells);
    }

    let table = Table::new(name, columns, body);
    debug!("Sheet '{}': {} data rows", name, table.len());
    Ok(table)
}

/// `None` for a float with no `Decimal` representation
fn cell_from_data(data: &Data) -> Option<Cell> {
    let cell = match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Int(i) => Cell::Number((*i).into()),
        Data::Float(f) => return Cell::from_float(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        other => Cell::Text(other.to_string()),
    };
    Some(cell)
}
