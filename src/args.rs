use clap::{Parser, Subcommand};

/// Converts organogram workbooks (senior and junior staff sheets) to CSV,
/// after checking them.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(short, long, global = true, takes_value = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Checks one workbook and writes its senior and junior tables as CSV.
    Etl(EtlArgs),
    /// Converts a collection of legacy uploads and records the snapshots.
    Migrate(MigrateArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct EtlArgs {
    /// (file path) The organogram workbook, in xls or xlsx format.
    #[clap(value_parser)]
    pub input_xls: String,

    /// (directory) Where the CSV files and the index.json file are written. It must exist.
    #[clap(value_parser)]
    pub output_folder: String,

    /// (YYYY-MM-DD or DD-MM-YYYY) The date of the data. It sets how strict the checks are:
    /// older data is accepted with errors. Without a date, any error rejects the workbook.
    #[clap(long, value_parser)]
    pub date: Option<String>,

    /// Takes the date of the data from the name of the workbook file (for manual tests only!)
    #[clap(long, takes_value = false)]
    pub date_from_filename: bool,

    /// (file path) A reference senior CSV file. If provided, the senior output must match it.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct MigrateArgs {
    /// (file path) The combined metadata of the legacy uploads (tso_combined.csv).
    #[clap(value_parser)]
    pub tso_combined: String,

    /// (file path) The report of the uploads, with the email of each submitter.
    #[clap(value_parser)]
    pub uploads_report: String,

    /// (directory) The root of the paths in the xls_path column.
    #[clap(value_parser)]
    pub source_data_dir: String,

    /// (directory) Where the converted files and organograms.json are stored.
    #[clap(value_parser)]
    pub organogram_dir: String,

    /// Only migrate the organograms of this body (exact title).
    #[clap(long, value_parser)]
    pub body: Option<String>,

    /// Only migrate the organograms of this date (YYYY-MM-DD).
    #[clap(long, value_parser)]
    pub graph: Option<String>,
}
