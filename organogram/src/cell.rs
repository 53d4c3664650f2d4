//! Coercion of raw cells into canonical values.
//!
//! None of these functions fail: a value that cannot be understood is turned
//! into `Field::Invalid` and the sheet loader reports it.

use crate::model::Field;
use crate::workbook::Cell;

/// How the values of a column are interpreted.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ColumnKind {
    /// Identifiers (post references). Kept verbatim, numbers without a
    /// trailing `.0`.
    Reference,
    /// Free text, with `N/A` and `N/D` recognised.
    Text,
    /// Numbers written with two decimals (FTE counts), otherwise as `Text`.
    Decimal,
    /// Whole numbers (money), or `N/A`/`N/D`. A blank cell means `N/A`.
    Integer,
    /// Content is read and thrown away. Old pro-formas duplicated a computed
    /// column there.
    Discarded,
}

/// Renders a number the way it is displayed in a cell: whole numbers without
/// a decimal part, so that `1.0` becomes `"1"`.
pub fn number_text(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// The text of a cell, trimmed. Blank cells give an empty string.
pub fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Int(i) => i.to_string(),
        Cell::Float(f) => number_text(*f),
        Cell::Text(s) => s.trim().to_string(),
        Cell::Bool(true) => "1".to_string(),
        Cell::Bool(false) => "0".to_string(),
    }
}

/// Attempts to read a whole number out of some text, e.g. `" 42 "`.
pub fn parse_integer(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}

fn sentinel_letters(text: &str) -> String {
    text.chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| c.is_ascii_uppercase())
        .collect()
}

/// Integer-or-sentinel coercion for the money columns.
///
/// Blank is `N/A`. Text is matched loosely against the sentinels: only the
/// letters count, so `"n/a"`, `"N.A."` and `"N / D"` are all understood.
pub fn integer_value(cell: &Cell) -> Field<i64> {
    match cell {
        c if c.is_blank() => Field::NotApplicable,
        Cell::Int(i) => Field::Disclosed(*i),
        Cell::Float(f) => Field::Disclosed(f.round() as i64),
        Cell::Bool(b) => Field::Disclosed(i64::from(*b)),
        Cell::Text(s) => match parse_integer(s) {
            Some(i) => Field::Disclosed(i),
            None => match sentinel_letters(s).as_str() {
                "NA" => Field::NotApplicable,
                "ND" => Field::NotDisclosed,
                _ => Field::Invalid(s.trim().to_string()),
            },
        },
        Cell::Empty => Field::NotApplicable,
    }
}

/// Free text coercion. Only exact sentinels (ignoring case and surrounding
/// spaces) are recognised here.
pub fn text_value(cell: &Cell) -> Field<String> {
    let text = cell_text(cell);
    if text.is_empty() {
        Field::Blank
    } else if text.eq_ignore_ascii_case("N/A") {
        Field::NotApplicable
    } else if text.eq_ignore_ascii_case("N/D") {
        Field::NotDisclosed
    } else {
        Field::Disclosed(text)
    }
}

/// Like `text_value`, but numbers keep two decimals.
pub fn decimal_value(cell: &Cell) -> Field<String> {
    match cell {
        Cell::Float(f) => Field::Disclosed(format!("{:.2}", f)),
        Cell::Int(i) => Field::Disclosed(format!("{:.2}", *i as f64)),
        c => text_value(c),
    }
}

/// Identifier coercion: the trimmed text, no sentinel handling.
pub fn reference_value(cell: &Cell) -> String {
    cell_text(cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_from_numbers() {
        assert_eq!(integer_value(&Cell::Float(52499.6)), Field::Disclosed(52500));
        assert_eq!(integer_value(&Cell::Int(0)), Field::Disclosed(0));
        assert_eq!(integer_value(&Cell::from(" 120000 ")), Field::Disclosed(120000));
    }

    #[test]
    fn integers_blank_is_not_applicable() {
        assert_eq!(integer_value(&Cell::Empty), Field::NotApplicable);
        assert_eq!(integer_value(&Cell::from("   ")), Field::NotApplicable);
    }

    #[test]
    fn integers_sentinel_variations() {
        for s in ["N/A", "n/a", "N.A.", "NA", " n / a "] {
            assert_eq!(integer_value(&Cell::from(s)), Field::NotApplicable, "{}", s);
        }
        for s in ["N/D", "n/d", "N.D", "nd"] {
            assert_eq!(integer_value(&Cell::from(s)), Field::NotDisclosed, "{}", s);
        }
    }

    #[test]
    fn integers_unknown_text_is_invalid() {
        assert_eq!(
            integer_value(&Cell::from("about 50k")),
            Field::Invalid("about 50k".to_string())
        );
        assert_eq!(
            integer_value(&Cell::from("£50,000")),
            Field::Invalid("£50,000".to_string())
        );
    }

    #[test]
    fn text_strips_and_finds_sentinels() {
        assert_eq!(
            text_value(&Cell::from("  Head of Policy ")),
            Field::Disclosed("Head of Policy".to_string())
        );
        assert_eq!(text_value(&Cell::from("N/D")), Field::NotDisclosed);
        assert_eq!(text_value(&Cell::from("n/a")), Field::NotApplicable);
        assert_eq!(text_value(&Cell::Empty), Field::Blank);
        // Only exact sentinels in free text
        assert_eq!(
            text_value(&Cell::from("N.A.")),
            Field::Disclosed("N.A.".to_string())
        );
    }

    #[test]
    fn numbers_in_text_columns_have_no_trailing_zero() {
        assert_eq!(reference_value(&Cell::Float(1.0)), "1");
        assert_eq!(reference_value(&Cell::Int(23)), "23");
        assert_eq!(
            text_value(&Cell::Float(2071234567.0)),
            Field::Disclosed("2071234567".to_string())
        );
        assert_eq!(number_text(0.5), "0.5");
    }

    #[test]
    fn decimals_have_two_places() {
        assert_eq!(decimal_value(&Cell::Float(1.0)), Field::Disclosed("1.00".to_string()));
        assert_eq!(decimal_value(&Cell::Float(0.333)), Field::Disclosed("0.33".to_string()));
        assert_eq!(decimal_value(&Cell::from("N/A")), Field::NotApplicable);
    }
}
