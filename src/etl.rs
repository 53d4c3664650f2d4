use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use text_diff::print_diff;

use organogram::{
    date_from_filename, get_verify_level, run, EtlOutcome, FailureStage, Organogram, PolicyError,
    VerifyLevel,
};

use crate::args::EtlArgs;
use crate::etl::io_common::file_stem;
use crate::etl::io_csv::{table_to_string, write_table_file};
use crate::etl::io_xls::read_workbook;

pub mod io_common;
pub mod io_csv;
pub mod io_xls;
pub mod migrate;

#[derive(Debug, Snafu)]
pub enum EtlError {
    #[snafu(display("Error opening workbook {path}"))]
    OpeningWorkbook {
        source: calamine::Error,
        path: String,
    },
    #[snafu(display("Error reading file {path}"))]
    ReadingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing CSV file {path}"))]
    WritingCsv { source: csv::Error, path: String },
    #[snafu(display("Error reading metadata file {path}"))]
    ReadingMetadata { source: csv::Error, path: String },
    #[snafu(display("Error with JSON data"))]
    ParsingJson { source: serde_json::Error },

    #[snafu(display("Input file does not exist: {path}"))]
    MissingInput { path: String },
    #[snafu(display("Output folder is not a directory: {path}"))]
    NotADirectory { path: String },
    #[snafu(display("{source}"))]
    Policy { source: PolicyError },
    #[snafu(display("Organogram {path} {reason}, no output written"))]
    Rejected { path: String, reason: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type EtlResult<T> = Result<T, EtlError>;

/// The entry of `index.json` that names the organogram.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub name: String,
    pub value: String,
}

/// Where the tables of an organogram were written.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct OutputFiles {
    pub senior: String,
    pub junior: String,
    pub index: String,
}

fn verify_level_from_args(args: &EtlArgs) -> EtlResult<VerifyLevel> {
    let level = if let Some(date) = &args.date {
        get_verify_level(date).context(PolicySnafu {})?
    } else if args.date_from_filename {
        let date = date_from_filename(&args.input_xls).context(PolicySnafu {})?;
        info!("Date from filename: {}", date);
        get_verify_level(&date).context(PolicySnafu {})?
    } else {
        VerifyLevel::default()
    };
    Ok(level)
}

fn print_diagnostics(outcome: &EtlOutcome) {
    if outcome.failure == Some(FailureStage::Load) {
        println!("Critical error(s):");
    }
    for e in outcome.errors.iter() {
        println!("ERROR: {}", e);
    }
    for w in outcome.warnings.iter() {
        println!("WARNING: {}", w);
    }
}

fn rejection_reason(failure: Option<FailureStage>) -> &'static str {
    match failure {
        Some(FailureStage::Load) => "could not be loaded",
        Some(FailureStage::Display) => "cannot be displayed",
        Some(FailureStage::Validation) => "is not valid",
        None => "has no table",
    }
}

/// Writes the two tables and `index.json` in the output folder.
pub fn write_outputs(
    tables: &Organogram,
    output_folder: &str,
    basename: &str,
) -> EtlResult<OutputFiles> {
    let folder = Path::new(output_folder);
    let path_of = |name: String| folder.join(name).to_string_lossy().to_string();
    let files = OutputFiles {
        senior: path_of(format!("{}-senior.csv", basename)),
        junior: path_of(format!("{}-junior.csv", basename)),
        index: path_of("index.json".to_string()),
    };
    write_table_file(&files.senior, &tables.senior)?;
    write_table_file(&files.junior, &tables.junior)?;

    let index = vec![IndexEntry {
        name: tables.name(),
        value: basename.to_string(),
    }];
    let js = serde_json::to_string_pretty(&index).context(ParsingJsonSnafu {})?;
    fs::write(&files.index, js).context(WritingFileSnafu {
        path: files.index.clone(),
    })?;
    info!("write_outputs: {:?}", files);
    Ok(files)
}

fn check_reference(tables: &Organogram, reference_path: &str) -> EtlResult<()> {
    let reference = fs::read_to_string(reference_path).context(ReadingFileSnafu {
        path: reference_path,
    })?;
    let computed = table_to_string(&tables.senior).context(WritingCsvSnafu {
        path: reference_path,
    })?;
    if reference != computed {
        warn!("Found differences with the reference file");
        print_diff(reference.as_str(), computed.as_str(), "\n");
        whatever!(
            "Difference detected between the senior table and the reference {}",
            reference_path
        )
    }
    Ok(())
}

pub fn run_etl(args: &EtlArgs) -> EtlResult<OutputFiles> {
    let verify_level = verify_level_from_args(args)?;
    ensure!(
        Path::new(&args.input_xls).exists(),
        MissingInputSnafu {
            path: args.input_xls.clone()
        }
    );
    ensure!(
        Path::new(&args.output_folder).is_dir(),
        NotADirectorySnafu {
            path: args.output_folder.clone()
        }
    );
    info!("Verify level: {}", verify_level);
    println!("Loading {}", args.input_xls);

    let workbook = read_workbook(&args.input_xls)?;
    let outcome = run(&workbook, verify_level);
    print_diagnostics(&outcome);
    debug!(
        "run_etl: {} errors {} warnings",
        outcome.errors.len(),
        outcome.warnings.len()
    );

    let tables = match outcome.tables {
        Some(tables) if outcome.failure.is_none() => tables,
        _ => {
            return RejectedSnafu {
                path: args.input_xls.clone(),
                reason: rejection_reason(outcome.failure),
            }
            .fail()
        }
    };

    let basename = file_stem(&args.input_xls);
    let files = write_outputs(&tables, &args.output_folder, &basename)?;
    println!("Written {}", files.senior);
    println!("Written {}", files.junior);

    if let Some(reference_path) = &args.reference {
        check_reference(&tables, reference_path)?;
    }
    Ok(files)
}
