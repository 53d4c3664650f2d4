mod args;
mod etl;

use clap::Parser;
use log::{debug, LevelFilter};
use snafu::ErrorCompat;

use crate::args::{Args, Command};
use crate::etl::EtlResult;

fn run_command(command: &Command) -> EtlResult<()> {
    match command {
        Command::Etl(etl_args) => etl::run_etl(etl_args).map(|_| ()),
        Command::Migrate(migrate_args) => etl::migrate::run_migration(migrate_args).map(|_| ()),
    }
}

fn main() {
    let args = Args::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
    debug!("args: {:?}", args);

    if let Err(e) = run_command(&args.command) {
        eprintln!("An error occured: {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
