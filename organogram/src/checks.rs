//! In-sheet validation.
//!
//! The senior sheet pro-forma validates each cell with a formula and colours
//! the row red when one of them fails. The checks here reproduce these
//! formulas one column at a time, so that every error points at one cell.

use log::{debug, error};

use crate::model::*;
use crate::posts::*;
use crate::references::References;

/// Characters not allowed in a post reference.
const POST_REF_SYMBOLS: &[char] = &[
    '¬', '!', '"', '£', '$', '%', '^', '&', '(', ')', '+', '=', '{', '}', '[', ']', ':', ';',
    '@', '\'', '#', '<', '>', ',', '.', '\\', '/',
];

/// Spreadsheet `MATCH`: case-insensitive, and `*` matches anything as long
/// as there is something to match.
fn matches_list(value: &str, list: &[String]) -> bool {
    if value == "*" {
        return !list.is_empty();
    }
    list.iter().any(|item| item.eq_ignore_ascii_case(value))
}

fn quoted_list(list: &[String]) -> String {
    list.iter()
        .map(|s| format!("\"{}\"", s))
        .collect::<Vec<String>>()
        .join(", ")
}

/// True when the rest of the row (B to N, P and Q) is empty. Money columns
/// read blank cells as `N/A`, which counts as empty here.
fn rest_of_row_is_blank(post: &SeniorPost) -> bool {
    let money_blank = |f: &Field<i64>| f.is_not_applicable();
    post.name.is_blank()
        && post.grade.is_blank()
        && post.job_title.is_blank()
        && post.job_function.is_blank()
        && post.parent_department.is_blank()
        && post.organisation.is_blank()
        && post.unit.is_blank()
        && post.contact_phone.is_blank()
        && post.contact_email.is_blank()
        && post.reports_to.is_empty()
        && money_blank(&post.salary_cost_of_reports)
        && post.fte.is_blank()
        && money_blank(&post.pay_floor)
        && post.professional_group.is_blank()
}

// Column A
fn check_post_ref(post: &SeniorPost) -> Option<Diagnostic> {
    if rest_of_row_is_blank(post) {
        return None;
    }
    let a = &post.post_ref;
    let text = if a.to_uppercase().contains("XX") {
        "You cannot have \"XX\" in the \"Post Unique Reference\" column."
    } else if a.chars().any(char::is_whitespace) {
        "You cannot have spaces in the \"Post Unique Reference\" column."
    } else if a.chars().any(|c| POST_REF_SYMBOLS.contains(&c)) {
        "You cannot have punctuation/symbols in the \"Post Unique Reference\" column."
    } else {
        return None;
    };
    Some(Diagnostic::in_cell(
        SENIOR_SHEET_NAME,
        post.cell(SeniorColumn::PostRef),
        text,
    ))
}

// Column B
fn check_name(post: &SeniorPost) -> Option<Diagnostic> {
    let cell = post.cell(SeniorColumn::Name);
    let name = &post.name;
    if post.is_not_in_post() {
        if name.is_not_disclosed() {
            return None;
        }
        return Some(Diagnostic::in_cell(
            SENIOR_SHEET_NAME,
            cell,
            "Because the \"Post Unique Reference\" is \"0\" (individual is paid but not in post) the name must be \"N/D\".",
        ));
    }
    // Text compares greater than any number in the spreadsheet, so the
    // sentinels count as a positive pay.
    let paid = match &post.pay_ceiling {
        Field::Disclosed(n) => *n > 0,
        Field::NotApplicable | Field::NotDisclosed | Field::Invalid(_) => true,
        Field::Blank => false,
    };
    let undisclosed_name = name.is_not_disclosed() || name.is_not_applicable();
    if paid && undisclosed_name {
        if name.is_not_applicable() {
            return Some(Diagnostic::in_cell(
                SENIOR_SHEET_NAME,
                cell,
                "The \"Name\" cannot be \"N/A\" (unless \"Actual Pay Ceiling (£)\" is 0).",
            ));
        }
        let pay_withheld =
            post.pay_ceiling.is_not_disclosed() || post.pay_ceiling.is_not_applicable();
        if !pay_withheld {
            return Some(Diagnostic::in_cell(
                SENIOR_SHEET_NAME,
                cell,
                "The \"Name\" cannot be \"N/D\" unless the \"Actual Pay Ceiling (£)\" is 0 or N/A or N/D. i.e. Someone whose pay must be disclosed must also have their name disclosed (unless they are unpaid).",
            ));
        }
        None
    } else if name.is_blank() {
        Some(Diagnostic::in_cell(
            SENIOR_SHEET_NAME,
            cell,
            "The \"Name\" cannot be blank.",
        ))
    } else {
        None
    }
}

// Column C
fn check_grade(post: &SeniorPost, references: &References) -> Option<Diagnostic> {
    let cell = post.cell(SeniorColumn::Grade);
    if post.grade.is_blank() {
        return Some(Diagnostic::in_cell(
            SENIOR_SHEET_NAME,
            cell,
            "The \"Grade (or equivalent)\" cannot be blank.",
        ));
    }
    if matches_list(&post.grade.to_string(), &references.senior_grades) {
        return None;
    }
    Some(Diagnostic::in_cell(
        SENIOR_SHEET_NAME,
        cell,
        &format!(
            "The \"Grade (or equivalent)\" must be from the standard list: {}.",
            quoted_list(&references.senior_grades)
        ),
    ))
}

// Column D
fn check_job_title(post: &SeniorPost) -> Option<Diagnostic> {
    let cell = post.cell(SeniorColumn::JobTitle);
    let d = &post.job_title;
    if d.is_blank() {
        return Some(Diagnostic::in_cell(
            SENIOR_SHEET_NAME,
            cell,
            "The \"Job Title\" cannot be blank.",
        ));
    }
    if d.is_not_disclosed() {
        return None;
    }
    let not_in_post = d.text_is("Not in post");
    if post.is_not_in_post() && !not_in_post {
        Some(Diagnostic::in_cell(
            SENIOR_SHEET_NAME,
            cell,
            "Because the \"Post Unique Reference\" is \"0\" (individual is paid but not in post), the \"Job Title\" must be \"Not in post\".",
        ))
    } else if !post.is_not_in_post() && not_in_post {
        Some(Diagnostic::in_cell(
            SENIOR_SHEET_NAME,
            cell,
            "The \"Job Title\" can only be \"Not in post\" if the \"Post Unique Reference\" is \"0\" (individual is paid but not in post).",
        ))
    } else {
        None
    }
}

// Column E
fn check_job_function(post: &SeniorPost) -> Option<Diagnostic> {
    let cell = post.cell(SeniorColumn::JobFunction);
    let e = &post.job_function;
    if e.is_blank() {
        return Some(Diagnostic::in_cell(
            SENIOR_SHEET_NAME,
            cell,
            "The \"Job/Team Function\" cannot be blank.",
        ));
    }
    if e.is_not_disclosed() {
        return None;
    }
    if post.is_not_in_post() && !e.is_not_applicable() {
        Some(Diagnostic::in_cell(
            SENIOR_SHEET_NAME,
            cell,
            "Because the \"Post Unique Reference\" is \"0\" (individual is paid but not in post), the \"Job/Team Function\" must be \"N/A\".",
        ))
    } else if !post.is_not_in_post() && e.is_not_applicable() {
        Some(Diagnostic::in_cell(
            SENIOR_SHEET_NAME,
            cell,
            "The \"Job/Team Function\" can only be \"N/A\" if the \"Post Unique Reference\" is \"0\" (individual is paid but not in post).",
        ))
    } else {
        None
    }
}

// Column F (Parent Department) has been optional since the 2016 pro-forma.

// Column G
fn check_organisation(post: &SeniorPost) -> Option<Diagnostic> {
    let g = &post.organisation;
    if g.is_blank() || g.is_not_disclosed() {
        return Some(Diagnostic::in_cell(
            SENIOR_SHEET_NAME,
            post.cell(SeniorColumn::Organisation),
            "The \"Organisation\" must be disclosed - it cannot be blank or \"N/D\".",
        ));
    }
    None
}

// Column H
fn check_unit(post: &SeniorPost, references: &References) -> Option<Diagnostic> {
    let cell = post.cell(SeniorColumn::Unit);
    let h = &post.unit;
    if h.is_blank() || h.is_not_disclosed() {
        return Some(Diagnostic::in_cell(
            SENIOR_SHEET_NAME,
            cell,
            "The \"Unit\" must be disclosed - it cannot be blank or \"N/D\".",
        ));
    }
    if post.is_not_in_post() {
        if h.is_not_applicable() {
            return None;
        }
        return Some(Diagnostic::in_cell(
            SENIOR_SHEET_NAME,
            cell,
            "Because the \"Post Unique Reference\" is \"0\" (individual is paid but not in post), the \"Unit\" must be \"N/A\".",
        ));
    }
    if h.is_not_applicable() {
        return Some(Diagnostic::in_cell(
            SENIOR_SHEET_NAME,
            cell,
            "The \"Unit\" can only be \"N/A\" if the \"Post Unique Reference\" is \"0\" (individual is paid but not in post).",
        ));
    }
    // A missing units sheet is already reported by the references.
    if references.units.is_empty() || matches_list(&h.to_string(), &references.units) {
        return None;
    }
    Some(Diagnostic::in_cell(
        SENIOR_SHEET_NAME,
        cell,
        &format!(
            "The \"Unit\" must be from the standard list: {}.",
            quoted_list(&references.units)
        ),
    ))
}

fn exempt_from_contact(post: &SeniorPost) -> bool {
    post.is_not_in_post() || post.is_vacant_or_eliminated()
}

const NO_CONTACT: &str = "You must provide at least one form of contact. You cannot have both \"Contact Phone\" and \"Contact E-mail\" as \"N/D\".";

// Column I
fn check_contact_phone(post: &SeniorPost) -> Option<Diagnostic> {
    let cell = post.cell(SeniorColumn::ContactPhone);
    let i = &post.contact_phone;
    let j = &post.contact_email;
    if i.is_blank() {
        return Some(Diagnostic::in_cell(
            SENIOR_SHEET_NAME,
            cell,
            "The \"Contact Phone\" must be supplied - it cannot be blank.",
        ));
    }
    if i.is_not_disclosed() && j.is_not_disclosed() {
        return Some(Diagnostic::in_cell(SENIOR_SHEET_NAME, cell, NO_CONTACT));
    }
    if exempt_from_contact(post) {
        if i.is_not_applicable() {
            return None;
        }
        let reason = if post.is_not_in_post() {
            "\"Post Unique Reference\" is \"0\" (individual is paid but not in post)"
        } else {
            "\"Name\" is \"Vacant\" or \"Eliminated\""
        };
        return Some(Diagnostic::in_cell(
            SENIOR_SHEET_NAME,
            cell,
            &format!(
                "Because the {}, the \"Contact Phone\" must be \"N/A\".",
                reason
            ),
        ));
    }
    if i.is_not_applicable() {
        return Some(Diagnostic::in_cell(
            SENIOR_SHEET_NAME,
            cell,
            "The \"Contact Phone\" can only be \"N/A\" if the \"Post Unique Reference\" is \"0\" (individual is paid but not in post) or the \"Name\" is \"Vacant\".",
        ));
    }
    None
}

// Column J
fn check_contact_email(post: &SeniorPost) -> Option<Diagnostic> {
    let cell = post.cell(SeniorColumn::ContactEmail);
    let i = &post.contact_phone;
    let j = &post.contact_email;
    if exempt_from_contact(post) && j.is_not_applicable() {
        return None;
    }
    let text = if j.is_blank() {
        "The \"Contact E-mail\" must be supplied - it cannot be blank."
    } else if j.is_not_applicable() {
        "The \"Contact E-mail\" can only be \"N/A\" if the \"Post Unique Reference\" is \"0\" (individual is paid but not in post)."
    } else if i.is_not_disclosed() && j.is_not_disclosed() {
        NO_CONTACT
    } else if j.is_not_disclosed()
        || j
            .disclosed()
            .map(|email| email.contains('@') && email.contains('.'))
            .unwrap_or(false)
    {
        return None;
    } else {
        "The \"Contact E-mail\" must be a valid email address (containing \"@\" and \".\" characters) unless the \"Name\" is \"Vacant\" or \"Eliminated\", or the \"Post Unique Reference\" is \"0\" (the individual is paid but not in post). It cannot be blank."
    };
    Some(Diagnostic::in_cell(SENIOR_SHEET_NAME, cell, text))
}

// Column K
fn check_reports_to(post: &SeniorPost, table: &[SeniorPost]) -> Option<Diagnostic> {
    let cell = post.cell(SeniorColumn::ReportsTo);
    let k = &post.reports_to;
    if k.is_empty() {
        return Some(Diagnostic::in_cell(
            SENIOR_SHEET_NAME,
            cell,
            "The \"Reports to Senior Post\" value must be supplied - it cannot be blank.",
        ));
    }
    if is_top_marker(k) || table.iter().any(|p| p.post_ref.eq_ignore_ascii_case(k)) {
        return None;
    }
    Some(Diagnostic::in_cell(
        SENIOR_SHEET_NAME,
        cell,
        "The \"Reports to Senior Post\" value must match one of the values in \"Post Unique Reference\" (column A) or be \"XX\" (which is a top level post - reports to no-one in this sheet).",
    ))
}

/// Runs every column check on one senior row.
///
/// A row without a post reference is treated as empty, and an empty row is
/// valid.
pub fn validate_senior_row(
    post: &SeniorPost,
    table: &[SeniorPost],
    references: &References,
) -> Vec<Diagnostic> {
    if post.post_ref.is_empty() {
        return Vec::new();
    }
    [
        check_post_ref(post),
        check_name(post),
        check_grade(post, references),
        check_job_title(post),
        check_job_function(post),
        check_organisation(post),
        check_unit(post, references),
        check_contact_phone(post),
        check_contact_email(post),
        check_reports_to(post, table),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// What the "Valid?" column says about a sheet.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RowColourCheck {
    /// False when the column is empty everywhere: the sheet never ran its
    /// own validation (typically data regenerated from the triplestore).
    pub present: bool,
    pub errors: Vec<Diagnostic>,
}

/// Reads the spreadsheet's own verdict, as `(row number, flag)` pairs.
pub fn row_colour_validation(
    sheet_name: &str,
    flags: &[(usize, Option<bool>)],
    valid_column: usize,
) -> RowColourCheck {
    if !flags.is_empty() && flags.iter().all(|(_, f)| f.is_none()) {
        return RowColourCheck {
            present: false,
            errors: Vec::new(),
        };
    }
    let invalid_rows: Vec<usize> = flags
        .iter()
        .filter(|(_, f)| *f == Some(false))
        .map(|(row, _)| *row)
        .collect();
    let errors = match invalid_rows.as_slice() {
        [] => Vec::new(),
        [first, ..] => {
            let several = invalid_rows.len() > 1;
            let cell = CellRef::new(valid_column, *first);
            vec![Diagnostic::with_cell(
                format!(
                    "Sheet \"{}\" has {} invalid row{}. The {}problem is on row {}, as indicated by the red colour in cell {}.",
                    sheet_name,
                    invalid_rows.len(),
                    if several { "s" } else { "" },
                    if several { "first " } else { "" },
                    first,
                    cell
                ),
                cell,
            )]
        }
    };
    RowColourCheck {
        present: true,
        errors,
    }
}

/// Chooses between the column checks and the row colours when they
/// disagree.
///
/// When the column checks find problems the spreadsheet did not, the
/// spreadsheet is trusted. When the spreadsheet found problems the column
/// checks missed, its errors are used. Otherwise the column errors, being
/// more specific, are used.
pub fn reconcile(
    sheet_name: &str,
    cell_errors: Vec<Diagnostic>,
    row_colours: RowColourCheck,
) -> Vec<Diagnostic> {
    if !cell_errors.is_empty() && row_colours.errors.is_empty() && row_colours.present {
        error!(
            "reconcile: {:?}: errors found by ETL were not picked up by spreadsheet: {:?}",
            sheet_name, cell_errors
        );
        row_colours.errors
    } else if !row_colours.errors.is_empty() && cell_errors.is_empty() {
        error!(
            "reconcile: {:?}: errors found by spreadsheet were not picked up by ETL: {:?}",
            sheet_name, row_colours.errors
        );
        row_colours.errors
    } else {
        cell_errors
    }
}

/// In-sheet validation of the senior sheet.
pub fn validate_senior_sheet(posts: &[SeniorPost], references: &References) -> Vec<Diagnostic> {
    let flags: Vec<(usize, Option<bool>)> =
        posts.iter().map(|p| (p.row, p.valid_flag())).collect();
    let row_colours =
        row_colour_validation(SENIOR_SHEET_NAME, &flags, SeniorColumn::Valid.index());
    let cell_errors: Vec<Diagnostic> = posts
        .iter()
        .flat_map(|p| validate_senior_row(p, posts, references))
        .collect();
    debug!(
        "validate_senior_sheet: {} cell errors, row colours: {:?}",
        cell_errors.len(),
        row_colours
    );
    reconcile(SENIOR_SHEET_NAME, cell_errors, row_colours)
}

/// In-sheet validation of the junior sheet. Only the row colours are
/// checked: the junior pro-forma has no per-cell rules worth reproducing.
pub fn validate_junior_sheet(posts: &[JuniorPost]) -> Vec<Diagnostic> {
    let flags: Vec<(usize, Option<bool>)> =
        posts.iter().map(|p| (p.row, p.valid_flag())).collect();
    // "Valid?" is column K of the junior sheet
    let row_colours = row_colour_validation(JUNIOR_SHEET_NAME, &flags, 10);
    reconcile(JUNIOR_SHEET_NAME, Vec::new(), row_colours)
}
