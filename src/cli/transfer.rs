use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error};

use crate::{
    storage::RecordStore,
    tracker::{
        exchange::{export_file_name, CSV_MIME_TYPE},
        Tracker,
    },
};

#[derive(Debug, Parser)]
pub struct ExportCommand {
    #[arg(
        long,
        short,
        help = "Where to write the CSV. Defaults to mess-data-<today>.csv in the current directory"
    )]
    output: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct ImportCommand {
    #[arg(help = "CSV file in the format written by export")]
    file: PathBuf,
}

pub async fn process_export_command<S: RecordStore>(
    ExportCommand { output }: ExportCommand,
    tracker: &Tracker<S>,
) -> Result<()> {
    let path = output.unwrap_or_else(|| PathBuf::from(export_file_name(tracker.today())));
    let csv = tracker.export_csv();
    debug!("Writing {} bytes of {CSV_MIME_TYPE} to {path:?}", csv.len());
    tokio::fs::write(&path, csv)
        .await
        .with_context(|| format!("Failed to write {path:?}"))?;
    println!("Data exported as CSV successfully! ({})", path.display());
    Ok(())
}

pub async fn process_import_command<S: RecordStore>(
    ImportCommand { file }: ImportCommand,
    tracker: &mut Tracker<S>,
) -> Result<()> {
    let text = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("Failed to read {file:?}"))?;
    let summary = tracker
        .import_csv(&text)
        .await
        .inspect_err(|e| error!("Import of {file:?} failed: {e}"))
        .context("Error importing CSV file. Please check the file format.")?;
    println!(
        "Data imported successfully! {} records and {} payments added.",
        summary.meals, summary.payments
    );
    Ok(())
}
