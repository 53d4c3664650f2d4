mod cell;
mod checks;
mod graph;
mod model;
mod policy;
mod posts;
mod references;
mod sheet;
mod workbook;

pub mod builder;
pub mod manual;

#[cfg(test)]
mod testing;

use log::{info, warn};

pub use crate::cell::ColumnKind;
pub use crate::checks::{reconcile, row_colour_validation, validate_senior_row, RowColourCheck};
pub use crate::graph::{verify_graph, GraphError, MAX_DEPTH};
pub use crate::model::*;
pub use crate::policy::*;
pub use crate::posts::*;
pub use crate::references::*;
pub use crate::sheet::{load_sheet, ColumnSpec, RowCells, SheetLoad, SheetRecord};
pub use crate::workbook::*;

/// The two tables of an organogram, in canonical form.
#[derive(PartialEq, Debug, Clone)]
pub struct Organogram {
    pub senior: Vec<SeniorPost>,
    pub junior: Vec<JuniorPost>,
}

impl Organogram {
    /// The display name: the organisations, joined with `&`. Ministry of
    /// Defence organograms are split by unit, so the units are appended.
    pub fn name(&self) -> String {
        let organisations = distinct(self.senior.iter().map(|p| &p.organisation));
        let mut name = organisations.join(" & ");
        if name == "Ministry of Defence" {
            let units = distinct(self.senior.iter().map(|p| &p.unit));
            name.push_str(" - ");
            name.push_str(&units.join(" & "));
        }
        name
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a Field<String>>) -> Vec<String> {
    let mut res: Vec<String> = Vec::new();
    for v in values.filter(|v| !v.is_blank()) {
        let s = v.to_string();
        if !res.contains(&s) {
            res.push(s);
        }
    }
    res
}

/// The step at which a workbook was rejected.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum FailureStage {
    /// The sheets could not be read. There is no table.
    Load,
    /// No top post: there is nothing to display.
    Display,
    /// Tables were produced but they have errors, and the verify level
    /// requires a valid organogram.
    Validation,
}

/// The result of processing one workbook.
#[derive(PartialEq, Debug, Clone)]
pub struct EtlOutcome {
    /// Absent when the workbook failed to load or cannot be displayed.
    pub tables: Option<Organogram>,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub failure: Option<FailureStage>,
}

impl EtlOutcome {
    /// True if the organogram may be accepted, possibly with errors.
    pub fn will_display(&self) -> bool {
        self.failure.is_none()
    }

    fn failed(
        stage: FailureStage,
        tables: Option<Organogram>,
        errors: Vec<Diagnostic>,
        warnings: Vec<Diagnostic>,
    ) -> EtlOutcome {
        info!("run: failed at stage {:?} with {} errors", stage, errors.len());
        EtlOutcome {
            tables,
            errors: dedupe(errors),
            warnings: dedupe(warnings),
            failure: Some(stage),
        }
    }
}

/// Loads and validates an organogram workbook.
///
/// The stages are, in order: loading of the references and of both sheets,
/// the cell checks, and the reporting structure checks (skipped at the
/// `Load` level). Errors and warnings are collected along the way and
/// de-duplicated at the end.
///
/// ```
/// use organogram::builder::WorkbookBuilder;
/// use organogram::{run, FailureStage, VerifyLevel};
///
/// let outcome = run(&WorkbookBuilder::new().build(), VerifyLevel::Load);
/// assert_eq!(outcome.failure, Some(FailureStage::Load));
/// assert!(!outcome.will_display());
/// ```
pub fn run(workbook: &Workbook, verify_level: VerifyLevel) -> EtlOutcome {
    info!(
        "run: sheets {:?}, verify level: {}",
        workbook.sheet_names(),
        verify_level
    );
    let references = get_references(workbook);
    let senior: SheetLoad<SeniorPost> = load_sheet(workbook);
    let junior: SheetLoad<JuniorPost> = load_sheet(workbook);
    let warnings = references.warnings;

    let mut load_errors: Vec<Diagnostic> = senior.load_errors;
    load_errors.extend(junior.load_errors);
    if !load_errors.is_empty() {
        return EtlOutcome::failed(FailureStage::Load, None, load_errors, warnings);
    }

    let mut errors: Vec<Diagnostic> = references.validation_errors;
    errors.extend(senior.validation_errors);
    errors.extend(junior.validation_errors);
    errors.extend(checks::validate_senior_sheet(
        &senior.rows,
        &references.references,
    ));
    errors.extend(checks::validate_junior_sheet(&junior.rows));

    if verify_level.checks_graph() {
        match verify_graph(&senior.rows, &junior.rows) {
            Ok(graph_errors) => errors.extend(graph_errors),
            Err(fatal) => {
                warn!("run: cannot display: {}", fatal);
                return EtlOutcome::failed(
                    FailureStage::Display,
                    None,
                    vec![Diagnostic::new(fatal.to_string())],
                    warnings,
                );
            }
        }
    }

    let tables = Organogram {
        senior: senior.rows,
        junior: junior.rows,
    };
    if verify_level.requires_validity() && !errors.is_empty() {
        return EtlOutcome::failed(FailureStage::Validation, Some(tables), errors, warnings);
    }

    let errors = dedupe(errors);
    info!(
        "run: done: {} senior posts, {} junior posts, {} errors, {} warnings",
        tables.senior.len(),
        tables.junior.len(),
        errors.len(),
        warnings.len()
    );
    EtlOutcome {
        tables: Some(tables),
        errors,
        warnings: dedupe(warnings),
        failure: None,
    }
}
