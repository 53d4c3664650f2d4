//! Controlled vocabularies used by the cell checks: senior grades,
//! professions and units.

use std::collections::BTreeSet;

use log::{debug, info};

use crate::cell::cell_text;
use crate::model::Diagnostic;
use crate::workbook::{Sheet, Workbook};

pub const SENIOR_GRADES_SHEET_NAME: &str = "(reference) senior-staff-grades";
pub const PROFESSIONS_SHEET_NAME: &str = "(reference) professions";
pub const UNITS_SHEET_NAME: &str = "(reference) units";

const STANDARD_SENIOR_GRADES: [&str; 9] = [
    "SCS4", "SCS3", "SCS2", "SCS1A", "SCS1", "OF-9", "OF-8", "OF-7", "OF-6",
];

const STANDARD_PROFESSIONS: [&str; 24] = [
    "Communications",
    "Economics",
    "Finance",
    "Human Resources",
    "Information Technology",
    "Internal Audit",
    "Knowledge and Information Management (KIM)",
    "Law",
    "Medicine",
    "Military",
    "Operational Delivery",
    "Operational Research",
    "Other",
    "Planning",
    "Policy",
    "Procurement",
    "Programme and Project Management (PPM)",
    "Property and asset management",
    "Psychology",
    "Science and Engineering",
    "Social Research",
    "Statisticians",
    "Tax Professionals",
    "Vets",
];

pub fn standard_senior_grades() -> Vec<String> {
    STANDARD_SENIOR_GRADES.iter().map(|s| s.to_string()).collect()
}

pub fn standard_professions() -> Vec<String> {
    STANDARD_PROFESSIONS.iter().map(|s| s.to_string()).collect()
}

/// The reference lists in force for one workbook.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct References {
    pub senior_grades: Vec<String>,
    pub professions: Vec<String>,
    /// Empty when the workbook has no units sheet.
    pub units: Vec<String>,
}

impl References {
    /// The standard lists, with no units.
    pub fn standard() -> References {
        References {
            senior_grades: standard_senior_grades(),
            professions: standard_professions(),
            units: Vec::new(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReferenceLoad {
    pub references: References,
    pub validation_errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

/// The values of the first column, below the header.
fn read_list(sheet: &Sheet) -> Vec<String> {
    sheet
        .rows
        .iter()
        .skip(1)
        .filter_map(|r| r.first())
        .map(cell_text)
        .filter(|s| !s.is_empty())
        .collect()
}

fn quoted(values: &[&&String]) -> String {
    values
        .iter()
        .map(|x| format!("\"{}\"", x))
        .collect::<Vec<String>>()
        .join(" ")
}

/// Describes how `actual` differs from `standard`: `+` for the values only
/// in `actual`, `-` for the values missing from it. Empty if they hold the
/// same values.
pub fn diff_lists(standard: &[String], actual: &[String]) -> String {
    let standard_: BTreeSet<&String> = standard.iter().collect();
    let actual_: BTreeSet<&String> = actual.iter().collect();
    let plus: Vec<&&String> = actual_.difference(&standard_).collect();
    let minus: Vec<&&String> = standard_.difference(&actual_).collect();
    let mut output: Vec<String> = Vec::new();
    if !plus.is_empty() {
        output.push(format!("+ {}", quoted(&plus)));
    }
    if !minus.is_empty() {
        output.push(format!("- {}", quoted(&minus)));
    }
    output.join("; ")
}

/// Collects the reference lists of a workbook.
///
/// The grades and professions sheets are optional: the standard lists are
/// used when they are missing, and a warning is emitted when they differ
/// from the standard. The units sheet has no standard counterpart, its
/// absence is a validation error.
pub fn get_references(workbook: &Workbook) -> ReferenceLoad {
    let mut validation_errors: Vec<Diagnostic> = Vec::new();
    let mut warnings: Vec<Diagnostic> = Vec::new();

    let senior_grades = match workbook.sheet(SENIOR_GRADES_SHEET_NAME) {
        Some(sheet) => {
            let grades = read_list(sheet);
            let diff = diff_lists(&standard_senior_grades(), &grades);
            if !diff.is_empty() {
                warnings.push(Diagnostic::new(format!(
                    "Mismatch of the senior grades: {}",
                    diff
                )));
            }
            grades
        }
        None => {
            debug!("get_references: no grades sheet, using the standard list");
            standard_senior_grades()
        }
    };

    let professions = match workbook.sheet(PROFESSIONS_SHEET_NAME) {
        Some(sheet) => {
            let professions = read_list(sheet);
            let diff = diff_lists(&standard_professions(), &professions);
            if !diff.is_empty() {
                warnings.push(Diagnostic::new(format!(
                    "Mismatch of the professions: {}",
                    diff
                )));
            }
            professions
        }
        None => {
            debug!("get_references: no professions sheet, using the standard list");
            standard_professions()
        }
    };

    let units = match workbook.sheet(UNITS_SHEET_NAME) {
        Some(sheet) => read_list(sheet),
        None => {
            validation_errors.push(Diagnostic::new(format!(
                "No sheet named <'{}'>",
                UNITS_SHEET_NAME
            )));
            Vec::new()
        }
    };

    info!(
        "get_references: {} grades, {} professions, {} units",
        senior_grades.len(),
        professions.len(),
        units.len()
    );

    ReferenceLoad {
        references: References {
            senior_grades,
            professions,
            units,
        },
        validation_errors,
        warnings,
    }
}
