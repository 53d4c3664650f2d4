//! Loading of the two data sheets into typed rows.
//!
//! The loader never fails outright: structural problems are returned as load
//! errors together with an empty table, so that callers do not have to deal
//! with a missing table.

use log::{debug, warn};

use crate::cell::*;
use crate::model::*;
use crate::workbook::*;

/// Expected column of a data sheet.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct ColumnSpec {
    /// Title in the current pro-forma, also used in the outputs.
    pub title: &'static str,
    /// Titles found in older pro-formas that are accepted as well.
    pub legacy_titles: &'static [&'static str],
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub const fn new(title: &'static str, kind: ColumnKind) -> ColumnSpec {
        ColumnSpec {
            title,
            legacy_titles: &[],
            kind,
        }
    }

    pub const fn with_legacy(
        title: &'static str,
        legacy_titles: &'static [&'static str],
        kind: ColumnKind,
    ) -> ColumnSpec {
        ColumnSpec {
            title,
            legacy_titles,
            kind,
        }
    }

    /// Title written in the outputs. Discarded columns keep their position
    /// but lose their title.
    pub fn output_title(&self) -> &'static str {
        match self.kind {
            ColumnKind::Discarded => "",
            _ => self.title,
        }
    }

    fn accepts(&self, actual: &str) -> bool {
        self.kind == ColumnKind::Discarded
            || actual == self.title
            || self.legacy_titles.iter().any(|t| *t == actual)
    }
}

/// One coerced value, tagged by the kind of its column.
#[derive(PartialEq, Debug, Clone)]
pub enum Coerced {
    Reference(String),
    Text(Field<String>),
    Integer(Field<i64>),
}

/// The coerced values of one row, consumed in column order by
/// `SheetRecord::from_cells`.
pub struct RowCells {
    row: usize,
    values: std::vec::IntoIter<Coerced>,
}

impl RowCells {
    pub fn new(row: usize, values: Vec<Coerced>) -> RowCells {
        RowCells {
            row,
            values: values.into_iter(),
        }
    }

    /// 1-based spreadsheet row number.
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn reference(&mut self) -> String {
        match self.values.next() {
            Some(Coerced::Reference(s)) => s,
            Some(Coerced::Text(f)) => f.to_string(),
            Some(Coerced::Integer(f)) => f.to_string(),
            None => String::new(),
        }
    }

    pub fn text(&mut self) -> Field<String> {
        match self.values.next() {
            Some(Coerced::Text(f)) => f,
            Some(Coerced::Reference(s)) if s.is_empty() => Field::Blank,
            Some(Coerced::Reference(s)) => Field::Disclosed(s),
            Some(Coerced::Integer(f)) => match f {
                Field::Disclosed(i) => Field::Disclosed(i.to_string()),
                Field::NotApplicable => Field::NotApplicable,
                Field::NotDisclosed => Field::NotDisclosed,
                Field::Invalid(s) => Field::Invalid(s),
                Field::Blank => Field::Blank,
            },
            None => Field::Blank,
        }
    }

    pub fn integer(&mut self) -> Field<i64> {
        match self.values.next() {
            Some(Coerced::Integer(f)) => f,
            _ => Field::NotApplicable,
        }
    }

    /// Skips a column (discarded content).
    pub fn skip(&mut self) {
        self.values.next();
    }
}

/// A typed row of one of the data sheets.
pub trait SheetRecord: Sized {
    const SHEET_NAME: &'static str;

    fn columns() -> &'static [ColumnSpec];

    fn from_cells(cells: RowCells) -> Self;
}

/// The outcome of loading a sheet.
#[derive(PartialEq, Debug, Clone)]
pub struct SheetLoad<R> {
    pub rows: Vec<R>,
    /// The sheet cannot be used at all.
    pub load_errors: Vec<Diagnostic>,
    /// Some values were discarded, the rest of the sheet is usable.
    pub validation_errors: Vec<Diagnostic>,
}

impl<R> SheetLoad<R> {
    fn failed(load_errors: Vec<Diagnostic>) -> SheetLoad<R> {
        SheetLoad {
            rows: Vec::new(),
            load_errors,
            validation_errors: Vec::new(),
        }
    }
}

/// Loads the sheet `R::SHEET_NAME` from the workbook.
///
/// Only the expected columns are read, any extra column to the right is
/// ignored. Rows where the first two columns are blank are padding and are
/// dropped.
pub fn load_sheet<R: SheetRecord>(workbook: &Workbook) -> SheetLoad<R> {
    let sheet_name = R::SHEET_NAME;
    let columns = R::columns();

    let sheet = match workbook.sheet(sheet_name) {
        Some(s) => s,
        None => {
            warn!(
                "load_sheet: no sheet {:?} in {:?}",
                sheet_name,
                workbook.sheet_names()
            );
            return SheetLoad::failed(vec![Diagnostic::new(format!(
                "No sheet named <'{}'>",
                sheet_name
            ))]);
        }
    };

    let width = sheet.used_width().min(columns.len());
    if sheet.rows.is_empty() || width != columns.len() {
        return SheetLoad::failed(vec![Diagnostic::new(format!(
            "Sheet '{}' contains {} columns. I expect at least {} columns.",
            sheet_name,
            width,
            columns.len()
        ))]);
    }

    let mut load_errors: Vec<Diagnostic> = Vec::new();
    for (idx, spec) in columns.iter().enumerate() {
        let actual = cell_text(sheet.cell(0, idx));
        if !spec.accepts(&actual) {
            load_errors.push(Diagnostic::with_cell(
                format!(
                    "Wrong column title. Sheet '{}' column {}: Title='{}' Expected='{}'",
                    sheet_name,
                    column_name(idx),
                    actual,
                    spec.title
                ),
                CellRef::new(idx, 1),
            ));
        }
    }
    if !load_errors.is_empty() {
        return SheetLoad::failed(load_errors);
    }

    let mut validation_errors: Vec<Diagnostic> = Vec::new();
    let mut rows: Vec<R> = Vec::new();
    for (idx, raw) in sheet.rows.iter().enumerate().skip(1) {
        let row_number = idx + 1;
        if sheet.cell(idx, 0).is_blank() && sheet.cell(idx, 1).is_blank() {
            continue;
        }
        debug!("load_sheet: {:?} row {}: {:?}", sheet_name, row_number, raw);
        let mut values: Vec<Coerced> = Vec::with_capacity(columns.len());
        for (col, spec) in columns.iter().enumerate() {
            let cell = sheet.cell(idx, col);
            let v = match spec.kind {
                ColumnKind::Reference => Coerced::Reference(reference_value(cell)),
                ColumnKind::Text => Coerced::Text(text_value(cell)),
                ColumnKind::Decimal => Coerced::Text(decimal_value(cell)),
                ColumnKind::Discarded => Coerced::Text(Field::Blank),
                ColumnKind::Integer => {
                    let f = integer_value(cell);
                    if let Field::Invalid(raw_text) = &f {
                        validation_errors.push(Diagnostic::in_cell(
                            sheet_name,
                            CellRef::new(col, row_number),
                            &format!(
                                "Expected numeric values in column \"{}\" (or N/A or N/D), but got text=\"{}\".",
                                spec.title, raw_text
                            ),
                        ));
                    }
                    Coerced::Integer(f)
                }
            };
            values.push(v);
        }
        rows.push(R::from_cells(RowCells::new(row_number, values)));
    }

    SheetLoad {
        rows,
        load_errors,
        validation_errors,
    }
}
