pub use crate::workbook::*;

/// A builder for assembling workbooks in memory.
///
/// Each sheet is given as a header and a list of rows. Rows may be shorter
/// than the header, missing cells are blank.
///
/// ```
/// use organogram::builder::WorkbookBuilder;
/// use organogram::Cell;
///
/// let workbook = WorkbookBuilder::new()
///     .sheet(
///         "(reference) units",
///         &["Unit"],
///         vec![vec![Cell::from("Finance")], vec![Cell::from("Policy")]],
///     )
///     .build();
///
/// assert!(workbook.sheet("(reference) units").is_some());
/// ```
#[derive(Default)]
pub struct WorkbookBuilder {
    pub(crate) _sheets: Vec<Sheet>,
}

impl WorkbookBuilder {
    pub fn new() -> WorkbookBuilder {
        WorkbookBuilder {
            _sheets: Vec::new(),
        }
    }

    /// Adds a sheet with the given header titles and data rows.
    pub fn sheet(mut self, name: &str, header: &[&str], rows: Vec<Vec<Cell>>) -> WorkbookBuilder {
        let mut grid: Vec<Vec<Cell>> = Vec::with_capacity(rows.len() + 1);
        grid.push(header.iter().map(|h| Cell::from(*h)).collect());
        grid.extend(rows);
        self._sheets.push(Sheet::new(name, grid));
        self
    }

    /// Adds a sheet holding a single column of values under a header, the
    /// shape of the reference sheets.
    pub fn list_sheet(self, name: &str, header: &str, values: &[&str]) -> WorkbookBuilder {
        let rows = values.iter().map(|v| vec![Cell::from(*v)]).collect();
        self.sheet(name, &[header], rows)
    }

    pub fn build(self) -> Workbook {
        Workbook::new(self._sheets)
    }
}
