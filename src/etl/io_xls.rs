// Reading workbooks (xls and xlsx) from disk.

use calamine::{open_workbook_auto, DataType, Range, Reader};
use log::debug;
use snafu::prelude::*;

use organogram::{Cell, Sheet, Workbook};

use crate::etl::*;

pub fn read_workbook(path: &str) -> EtlResult<Workbook> {
    debug!("read_workbook: path: {:?}", path);
    let mut workbook = open_workbook_auto(path).context(OpeningWorkbookSnafu { path })?;
    let sheets: Vec<Sheet> = workbook
        .worksheets()
        .iter()
        .map(|(name, range)| sheet_from_range(name, range))
        .collect();
    debug!(
        "read_workbook: path: {:?} sheets: {:?}",
        path,
        sheets.iter().map(|s| s.name.as_str()).collect::<Vec<&str>>()
    );
    Ok(Workbook::new(sheets))
}

/// The used range of a sheet does not have to start at A1, the grid is
/// padded so that it does.
pub fn sheet_from_range(name: &str, range: &Range<DataType>) -> Sheet {
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells: Vec<Cell> = vec![Cell::Empty; start_col as usize];
        cells.extend(row.iter().map(read_cell));
        rows.push(cells);
    }
    Sheet::new(name, rows)
}

pub fn read_cell(v: &DataType) -> Cell {
    match v {
        DataType::Int(i) => Cell::Int(*i),
        DataType::Float(f) => Cell::Float(*f),
        DataType::String(s) => Cell::from(s.as_str()),
        DataType::Bool(b) => Cell::Bool(*b),
        // Dates are kept as their serial number.
        DataType::DateTime(f) => Cell::Float(*f),
        // Error cells (#N/A, #REF!) and empty cells.
        _ => Cell::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    #[test]
    fn cells() {
        assert_eq!(read_cell(&DataType::Int(3)), Cell::Int(3));
        assert_eq!(read_cell(&DataType::Float(1.5)), Cell::Float(1.5));
        assert_eq!(
            read_cell(&DataType::String("Policy".to_string())),
            Cell::Text("Policy".to_string())
        );
        assert_eq!(read_cell(&DataType::String("".to_string())), Cell::Empty);
        assert_eq!(read_cell(&DataType::DateTime(40815.0)), Cell::Float(40815.0));
        assert_eq!(read_cell(&DataType::Error(CellErrorType::NA)), Cell::Empty);
        assert_eq!(read_cell(&DataType::Empty), Cell::Empty);
    }

    #[test]
    fn grid_is_anchored_at_a1() {
        // Used range B2:C3
        let mut range: Range<DataType> = Range::new((1, 1), (2, 2));
        range.set_value((1, 1), DataType::String("Name".to_string()));
        range.set_value((2, 2), DataType::Int(7));
        let sheet = sheet_from_range("s", &range);
        assert_eq!(sheet.name, "s");
        assert_eq!(sheet.cell(0, 0), &Cell::Empty);
        assert_eq!(sheet.cell(1, 1), &Cell::Text("Name".to_string()));
        assert_eq!(sheet.cell(2, 2), &Cell::Int(7));
        assert_eq!(sheet.cell(2, 1), &Cell::Empty);
    }
}
