// Fixtures shared by the unit tests.

use crate::builder::WorkbookBuilder;
use crate::model::Field;
use crate::posts::*;
use crate::references::UNITS_SHEET_NAME;
use crate::sheet::SheetRecord;
use crate::workbook::{Cell, Workbook};

fn text(s: &str) -> Field<String> {
    match s {
        "" => Field::Blank,
        "N/A" => Field::NotApplicable,
        "N/D" => Field::NotDisclosed,
        _ => Field::Disclosed(s.to_string()),
    }
}

/// A senior post on row 2 that passes every cell check.
pub fn senior(post_ref: &str, name: &str, reports_to: &str) -> SeniorPost {
    SeniorPost {
        row: 2,
        post_ref: post_ref.to_string(),
        name: text(name),
        grade: text("SCS1"),
        job_title: text("Director"),
        job_function: text("Policy"),
        parent_department: text("Department for Transport"),
        organisation: text("Department for Transport"),
        unit: text("Finance"),
        contact_phone: text("0300 123 4567"),
        contact_email: text("a.person@example.gov.uk"),
        reports_to: reports_to.to_string(),
        salary_cost_of_reports: Field::Disclosed(100000),
        fte: text("1.00"),
        pay_floor: Field::Disclosed(85000),
        pay_ceiling: Field::Disclosed(89999),
        professional_group: text("Policy"),
        notes: Field::Blank,
        valid: text("1"),
    }
}

/// A junior post on row 2.
pub fn junior(reporting_senior_post: &str) -> JuniorPost {
    JuniorPost {
        row: 2,
        parent_department: text("Department for Transport"),
        organisation: text("Department for Transport"),
        unit: text("Finance"),
        reporting_senior_post: reporting_senior_post.to_string(),
        grade: text("Grade 7"),
        pay_min: Field::Disclosed(50000),
        pay_max: Field::Disclosed(60000),
        generic_job_title: text("Policy Advisor"),
        fte_count: text("2.00"),
        professional_group: text("Policy"),
        valid: text("1"),
    }
}

/// The raw cells of a valid senior row, as found in a workbook.
pub fn senior_cells(post_ref: &str, name: &str, reports_to: &str) -> Vec<Cell> {
    vec![
        Cell::from(post_ref),
        Cell::from(name),
        Cell::from("SCS1"),
        Cell::from("Director"),
        Cell::from("Policy"),
        Cell::from("Department for Transport"),
        Cell::from("Department for Transport"),
        Cell::from("Finance"),
        Cell::from("0300 123 4567"),
        Cell::from("a.person@example.gov.uk"),
        Cell::from(reports_to),
        Cell::Float(100000.0),
        Cell::Float(1.0),
        Cell::Float(85000.0),
        Cell::Float(89999.0),
        Cell::Float(89999.0),
        Cell::from("Policy"),
        Cell::Empty,
        Cell::Int(1),
    ]
}

/// The raw cells of a junior row.
pub fn junior_cells(reporting_senior_post: &str) -> Vec<Cell> {
    vec![
        Cell::from("Department for Transport"),
        Cell::from("Department for Transport"),
        Cell::from("Finance"),
        Cell::from(reporting_senior_post),
        Cell::from("Grade 7"),
        Cell::Float(50000.0),
        Cell::Float(60000.0),
        Cell::from("Policy Advisor"),
        Cell::Float(2.0),
        Cell::from("Policy"),
        Cell::Int(1),
    ]
}

pub fn senior_header() -> Vec<&'static str> {
    SeniorPost::columns().iter().map(|c| c.title).collect()
}

pub fn junior_header() -> Vec<&'static str> {
    JuniorPost::columns().iter().map(|c| c.title).collect()
}

/// A workbook with both data sheets and a units sheet.
pub fn standard_workbook(senior_rows: Vec<Vec<Cell>>, junior_rows: Vec<Vec<Cell>>) -> Workbook {
    WorkbookBuilder::new()
        .sheet(SENIOR_SHEET_NAME, &senior_header(), senior_rows)
        .sheet(JUNIOR_SHEET_NAME, &junior_header(), junior_rows)
        .list_sheet(UNITS_SHEET_NAME, "Unit", &["Finance", "Policy"])
        .build()
}
