use clap::Args;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tree_ledger::config::AppConfig;
use tree_ledger::error::AppError;
use tree_ledger::records::write_csv;

use crate::infra::ledger_service;

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Submitter name to match, in any of the accepted formats
    #[arg(long)]
    pub(crate) name: String,
    /// Write CSV to this file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) async fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = ledger_service(&config)?;
    let records = service.records_for(&args.name).await?;

    let written = match &args.output {
        Some(path) => write_csv(&records, BufWriter::new(File::create(path)?))?,
        None => write_csv(&records, io::stdout().lock())?,
    };

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "exported {written} record(s) for '{}'", args.name)?;
    Ok(())
}
