// ********* Senior and junior posts ***********

use crate::cell::ColumnKind;
use crate::model::*;
use crate::sheet::*;

pub const SENIOR_SHEET_NAME: &str = "(final data) senior-staff";
pub const JUNIOR_SHEET_NAME: &str = "(final data) junior-staff";

/// True for the "top post" marker in the "Reports to Senior Post" column.
pub fn is_top_marker(reference: &str) -> bool {
    reference.eq_ignore_ascii_case("XX")
}

/// True for the `0` post reference: the individual is paid but not in post.
pub fn is_not_in_post_marker(reference: &str) -> bool {
    reference == "0"
}

static SENIOR_COLUMNS: [ColumnSpec; 19] = [
    ColumnSpec::new("Post Unique Reference", ColumnKind::Reference),
    ColumnSpec::new("Name", ColumnKind::Text),
    ColumnSpec::with_legacy("Grade (or equivalent)", &["Grade"], ColumnKind::Text),
    ColumnSpec::new("Job Title", ColumnKind::Text),
    ColumnSpec::new("Job/Team Function", ColumnKind::Text),
    ColumnSpec::new("Parent Department", ColumnKind::Text),
    ColumnSpec::new("Organisation", ColumnKind::Text),
    ColumnSpec::new("Unit", ColumnKind::Text),
    ColumnSpec::new("Contact Phone", ColumnKind::Text),
    ColumnSpec::new("Contact E-mail", ColumnKind::Text),
    ColumnSpec::new("Reports to Senior Post", ColumnKind::Reference),
    ColumnSpec::new("Salary Cost of Reports (£)", ColumnKind::Integer),
    ColumnSpec::new("FTE", ColumnKind::Decimal),
    ColumnSpec::new("Actual Pay Floor (£)", ColumnKind::Integer),
    ColumnSpec::new("Actual Pay Ceiling (£)", ColumnKind::Integer),
    ColumnSpec::new("Total Pay (£)", ColumnKind::Discarded),
    ColumnSpec::new("Professional/Occupational Group", ColumnKind::Text),
    ColumnSpec::new("Notes", ColumnKind::Text),
    ColumnSpec::new("Valid?", ColumnKind::Text),
];

static JUNIOR_COLUMNS: [ColumnSpec; 11] = [
    ColumnSpec::new("Parent Department", ColumnKind::Text),
    ColumnSpec::new("Organisation", ColumnKind::Text),
    ColumnSpec::new("Unit", ColumnKind::Text),
    ColumnSpec::new("Reporting Senior Post", ColumnKind::Reference),
    ColumnSpec::new("Grade", ColumnKind::Text),
    ColumnSpec::new("Payscale Minimum (£)", ColumnKind::Integer),
    ColumnSpec::new("Payscale Maximum (£)", ColumnKind::Integer),
    ColumnSpec::new("Generic Job Title", ColumnKind::Text),
    ColumnSpec::new("Number of Posts in FTE", ColumnKind::Decimal),
    ColumnSpec::new("Professional/Occupational Group", ColumnKind::Text),
    ColumnSpec::new("Valid?", ColumnKind::Text),
];

/// The columns of the senior sheet, in sheet order.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum SeniorColumn {
    PostRef,
    Name,
    Grade,
    JobTitle,
    JobFunction,
    ParentDepartment,
    Organisation,
    Unit,
    ContactPhone,
    ContactEmail,
    ReportsTo,
    SalaryCostOfReports,
    Fte,
    PayFloor,
    PayCeiling,
    TotalPay,
    ProfessionalGroup,
    Notes,
    Valid,
}

impl SeniorColumn {
    pub const ALL: [SeniorColumn; 19] = [
        SeniorColumn::PostRef,
        SeniorColumn::Name,
        SeniorColumn::Grade,
        SeniorColumn::JobTitle,
        SeniorColumn::JobFunction,
        SeniorColumn::ParentDepartment,
        SeniorColumn::Organisation,
        SeniorColumn::Unit,
        SeniorColumn::ContactPhone,
        SeniorColumn::ContactEmail,
        SeniorColumn::ReportsTo,
        SeniorColumn::SalaryCostOfReports,
        SeniorColumn::Fte,
        SeniorColumn::PayFloor,
        SeniorColumn::PayCeiling,
        SeniorColumn::TotalPay,
        SeniorColumn::ProfessionalGroup,
        SeniorColumn::Notes,
        SeniorColumn::Valid,
    ];

    /// 0-based column index in the sheet.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn title(self) -> &'static str {
        SENIOR_COLUMNS[self.index()].title
    }

    /// Columns in which job-share rows may differ: the person-specific ones.
    pub fn may_differ_in_job_share(self) -> bool {
        matches!(
            self,
            SeniorColumn::Name
                | SeniorColumn::PayCeiling
                | SeniorColumn::PayFloor
                | SeniorColumn::TotalPay
                | SeniorColumn::ContactPhone
                | SeniorColumn::ContactEmail
                | SeniorColumn::Notes
                | SeniorColumn::Fte
        )
    }
}

/// A row that can be written to one of the output tables.
pub trait OutputRecord {
    fn output_header() -> Vec<&'static str>;

    fn output_values(&self) -> Vec<String>;
}

/// One row of the senior staff sheet.
#[derive(PartialEq, Debug, Clone)]
pub struct SeniorPost {
    /// 1-based spreadsheet row number.
    pub row: usize,
    /// Unique except between job-share rows. `0` means paid but not in post.
    pub post_ref: String,
    pub name: Field<String>,
    pub grade: Field<String>,
    pub job_title: Field<String>,
    pub job_function: Field<String>,
    pub parent_department: Field<String>,
    pub organisation: Field<String>,
    pub unit: Field<String>,
    pub contact_phone: Field<String>,
    pub contact_email: Field<String>,
    /// Either `XX` (top post) or the reference of another post.
    pub reports_to: String,
    pub salary_cost_of_reports: Field<i64>,
    pub fte: Field<String>,
    pub pay_floor: Field<i64>,
    pub pay_ceiling: Field<i64>,
    pub professional_group: Field<String>,
    pub notes: Field<String>,
    /// The spreadsheet's own validity flag: 1, 0 or blank.
    pub valid: Field<String>,
}

impl SeniorPost {
    pub fn value(&self, column: SeniorColumn) -> String {
        match column {
            SeniorColumn::PostRef => self.post_ref.clone(),
            SeniorColumn::Name => self.name.to_string(),
            SeniorColumn::Grade => self.grade.to_string(),
            SeniorColumn::JobTitle => self.job_title.to_string(),
            SeniorColumn::JobFunction => self.job_function.to_string(),
            SeniorColumn::ParentDepartment => self.parent_department.to_string(),
            SeniorColumn::Organisation => self.organisation.to_string(),
            SeniorColumn::Unit => self.unit.to_string(),
            SeniorColumn::ContactPhone => self.contact_phone.to_string(),
            SeniorColumn::ContactEmail => self.contact_email.to_string(),
            SeniorColumn::ReportsTo => self.reports_to.clone(),
            SeniorColumn::SalaryCostOfReports => self.salary_cost_of_reports.to_string(),
            SeniorColumn::Fte => self.fte.to_string(),
            SeniorColumn::PayFloor => self.pay_floor.to_string(),
            SeniorColumn::PayCeiling => self.pay_ceiling.to_string(),
            SeniorColumn::TotalPay => String::new(),
            SeniorColumn::ProfessionalGroup => self.professional_group.to_string(),
            SeniorColumn::Notes => self.notes.to_string(),
            SeniorColumn::Valid => self.valid.to_string(),
        }
    }

    pub fn cell(&self, column: SeniorColumn) -> CellRef {
        CellRef::new(column.index(), self.row)
    }

    pub fn is_top(&self) -> bool {
        is_top_marker(&self.reports_to)
    }

    pub fn is_not_in_post(&self) -> bool {
        is_not_in_post_marker(&self.post_ref)
    }

    pub fn is_eliminated(&self) -> bool {
        self.name.text_is("Eliminated")
    }

    pub fn is_vacant_or_eliminated(&self) -> bool {
        self.name.text_is("Vacant") || self.is_eliminated()
    }

    /// The spreadsheet's verdict on this row, if it computed one.
    pub fn valid_flag(&self) -> Option<bool> {
        valid_flag(&self.valid)
    }
}

impl SheetRecord for SeniorPost {
    const SHEET_NAME: &'static str = SENIOR_SHEET_NAME;

    fn columns() -> &'static [ColumnSpec] {
        &SENIOR_COLUMNS
    }

    fn from_cells(mut cells: RowCells) -> SeniorPost {
        let row = cells.row();
        let post_ref = cells.reference();
        let name = cells.text();
        let grade = cells.text();
        let job_title = cells.text();
        let job_function = cells.text();
        let parent_department = cells.text();
        let organisation = cells.text();
        let unit = cells.text();
        let contact_phone = cells.text();
        let contact_email = cells.text();
        let reports_to = cells.reference();
        let salary_cost_of_reports = cells.integer();
        let fte = cells.text();
        let pay_floor = cells.integer();
        let pay_ceiling = cells.integer();
        cells.skip();
        let professional_group = cells.text();
        let notes = cells.text();
        let valid = cells.text();
        SeniorPost {
            row,
            post_ref,
            name,
            grade,
            job_title,
            job_function,
            parent_department,
            organisation,
            unit,
            contact_phone,
            contact_email,
            reports_to,
            salary_cost_of_reports,
            fte,
            pay_floor,
            pay_ceiling,
            professional_group,
            notes,
            valid,
        }
    }
}

impl OutputRecord for SeniorPost {
    fn output_header() -> Vec<&'static str> {
        SENIOR_COLUMNS.iter().map(|c| c.output_title()).collect()
    }

    fn output_values(&self) -> Vec<String> {
        SeniorColumn::ALL.iter().map(|c| self.value(*c)).collect()
    }
}

/// One row of the junior staff sheet.
#[derive(PartialEq, Debug, Clone)]
pub struct JuniorPost {
    /// 1-based spreadsheet row number.
    pub row: usize,
    pub parent_department: Field<String>,
    pub organisation: Field<String>,
    pub unit: Field<String>,
    /// Reference of the senior post these posts report to.
    pub reporting_senior_post: String,
    pub grade: Field<String>,
    pub pay_min: Field<i64>,
    pub pay_max: Field<i64>,
    pub generic_job_title: Field<String>,
    pub fte_count: Field<String>,
    pub professional_group: Field<String>,
    pub valid: Field<String>,
}

impl JuniorPost {
    pub fn valid_flag(&self) -> Option<bool> {
        valid_flag(&self.valid)
    }
}

impl SheetRecord for JuniorPost {
    const SHEET_NAME: &'static str = JUNIOR_SHEET_NAME;

    fn columns() -> &'static [ColumnSpec] {
        &JUNIOR_COLUMNS
    }

    fn from_cells(mut cells: RowCells) -> JuniorPost {
        JuniorPost {
            row: cells.row(),
            parent_department: cells.text(),
            organisation: cells.text(),
            unit: cells.text(),
            reporting_senior_post: cells.reference(),
            grade: cells.text(),
            pay_min: cells.integer(),
            pay_max: cells.integer(),
            generic_job_title: cells.text(),
            fte_count: cells.text(),
            professional_group: cells.text(),
            valid: cells.text(),
        }
    }
}

impl OutputRecord for JuniorPost {
    // The "Valid?" column is not part of the junior output.
    fn output_header() -> Vec<&'static str> {
        JUNIOR_COLUMNS[..JUNIOR_COLUMNS.len() - 1]
            .iter()
            .map(|c| c.output_title())
            .collect()
    }

    fn output_values(&self) -> Vec<String> {
        vec![
            self.parent_department.to_string(),
            self.organisation.to_string(),
            self.unit.to_string(),
            self.reporting_senior_post.clone(),
            self.grade.to_string(),
            self.pay_min.to_string(),
            self.pay_max.to_string(),
            self.generic_job_title.to_string(),
            self.fte_count.to_string(),
            self.professional_group.to_string(),
        ]
    }
}

fn valid_flag(valid: &Field<String>) -> Option<bool> {
    match valid {
        Field::Blank => None,
        Field::Disclosed(s) => Some(s != "0"),
        _ => Some(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn senior_columns_line_up_with_schema() {
        for (idx, col) in SeniorColumn::ALL.iter().enumerate() {
            assert_eq!(col.index(), idx);
        }
        assert_eq!(SeniorColumn::ReportsTo.title(), "Reports to Senior Post");
        assert_eq!(SeniorColumn::PayCeiling.title(), "Actual Pay Ceiling (£)");
        assert_eq!(SeniorPost::output_header()[15], "");
        assert_eq!(SeniorPost::output_header().len(), 19);
        assert_eq!(JuniorPost::output_header().len(), 10);
    }

    #[test]
    fn top_markers() {
        assert!(is_top_marker("XX"));
        assert!(is_top_marker("xx"));
        assert!(!is_top_marker("XX1"));
        assert!(is_not_in_post_marker("0"));
        assert!(!is_not_in_post_marker("00"));
    }
}
