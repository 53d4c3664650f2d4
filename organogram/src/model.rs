use std::collections::HashSet;
use std::fmt::Display;

// ********* Canonical values ***********

/// A canonical cell value after coercion.
///
/// Organogram cells distinguish "Not Applicable" (the field legitimately has
/// no value, e.g. an unpaid post) from "Not Disclosed" (withheld for privacy).
#[derive(PartialEq, Debug, Clone)]
pub enum Field<T> {
    Blank,
    /// `N/A`
    NotApplicable,
    /// `N/D`
    NotDisclosed,
    Disclosed(T),
    /// A value that could not be understood. The raw text is kept for the
    /// error messages, the outputs substitute `0`.
    Invalid(String),
}

impl<T> Field<T> {
    pub fn is_blank(&self) -> bool {
        matches!(self, Field::Blank)
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self, Field::NotApplicable)
    }

    pub fn is_not_disclosed(&self) -> bool {
        matches!(self, Field::NotDisclosed)
    }

    pub fn disclosed(&self) -> Option<&T> {
        match self {
            Field::Disclosed(v) => Some(v),
            _ => None,
        }
    }
}

impl Field<String> {
    /// Case-insensitive comparison with a disclosed text value, which is how
    /// the spreadsheet formulas compare text.
    pub fn text_is(&self, expected: &str) -> bool {
        matches!(self, Field::Disclosed(s) if s.eq_ignore_ascii_case(expected))
    }
}

impl<T: Display> Display for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Blank => Ok(()),
            Field::NotApplicable => write!(f, "N/A"),
            Field::NotDisclosed => write!(f, "N/D"),
            Field::Disclosed(v) => write!(f, "{}", v),
            Field::Invalid(_) => write!(f, "0"),
        }
    }
}

// ********* Cell coordinates ***********

/// Spreadsheet letters for a 0-based column index: 0 is `A`, 26 is `AA`.
pub fn column_name(column: usize) -> String {
    let mut letters: Vec<char> = Vec::new();
    let mut n = column + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// A cell coordinate: 0-based column and the 1-based row number shown by
/// spreadsheet programs (the header is row 1).
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct CellRef {
    pub column: usize,
    pub row: usize,
}

impl CellRef {
    pub fn new(column: usize, row: usize) -> CellRef {
        CellRef { column, row }
    }
}

impl Display for CellRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", column_name(self.column), self.row)
    }
}

// ********* Diagnostics ***********

/// An error or a warning, readable on its own.
///
/// The message already names the sheet and the cell when there is one, the
/// coordinate is repeated in `cell` for programmatic use.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Diagnostic {
    pub message: String,
    pub cell: Option<CellRef>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Diagnostic {
        Diagnostic {
            message: message.into(),
            cell: None,
        }
    }

    /// A problem located in one cell of a sheet.
    pub fn in_cell(sheet_name: &str, cell: CellRef, text: &str) -> Diagnostic {
        Diagnostic {
            message: format!("Sheet \"{}\" cell {}: {}", sheet_name, cell, text),
            cell: Some(cell),
        }
    }

    pub fn with_cell(message: impl Into<String>, cell: CellRef) -> Diagnostic {
        Diagnostic {
            message: message.into(),
            cell: Some(cell),
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Removes repeated diagnostics, keeping the first occurrence of each.
pub fn dedupe(diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    let mut seen: HashSet<Diagnostic> = HashSet::new();
    diagnostics
        .into_iter()
        .filter(|d| seen.insert(d.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(10), "K");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(27), "AB");
        assert_eq!(CellRef::new(18, 2).to_string(), "S2");
    }

    #[test]
    fn field_rendering() {
        assert_eq!(Field::<i64>::NotApplicable.to_string(), "N/A");
        assert_eq!(Field::<i64>::NotDisclosed.to_string(), "N/D");
        assert_eq!(Field::Disclosed(12000).to_string(), "12000");
        assert_eq!(Field::<i64>::Invalid("lots".to_string()).to_string(), "0");
        assert_eq!(Field::<String>::Blank.to_string(), "");
    }

    #[test]
    fn dedupe_keeps_first_occurrence_order() {
        let a = Diagnostic::new("a");
        let b = Diagnostic::new("b");
        let c = Diagnostic::with_cell("a", CellRef::new(0, 2));
        let res = dedupe(vec![
            a.clone(),
            b.clone(),
            a.clone(),
            c.clone(),
            b.clone(),
        ]);
        assert_eq!(res, vec![a, b, c]);
    }
}
