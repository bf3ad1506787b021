//! pdfdeck - Load PDF files, edit their pages, and write one merged PDF.

mod cli;

use clap::Parser;
use std::process;

use crate::cli::Cli;
use pdfdeck::config::{Config, OverwriteMode};
use pdfdeck::error::PdfDeckError;
use pdfdeck::io::{PdfWriter, SourceReader};
use pdfdeck::merge::{ExportOptions, MergeExporter};
use pdfdeck::output::{
    OutputFormatter, display_export_summary, display_load_statistics, page_table_json,
};
use pdfdeck::{PageCollection, Preferences};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Log to stderr, honouring `RUST_LOG`.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), PdfDeckError> {
    let config = cli.to_config().await?;
    log::debug!("{config:?}");
    let formatter = OutputFormatter::from_config(&config);

    let preferences = match &config.preferences {
        Some(path) => Some(Preferences::load(path).await?),
        None => None,
    };

    if !config.json {
        formatter.section(&format!("{} v{}", pdfdeck::NAME, pdfdeck::VERSION));
    }

    let mut collection = PageCollection::new();
    let report = SourceReader::new()
        .load_into(
            &mut collection,
            &config.inputs,
            config.effective_jobs(),
            config.continue_on_error,
        )
        .await?;

    for skipped in &report.skipped {
        formatter.warning(&format!("Skipped: {skipped}"));
    }
    if !config.json {
        display_load_statistics(&formatter, &report.statistics);
    }

    pdfdeck::edit::apply_all(&config.edits, &mut collection)?;
    if !config.edits.is_empty() {
        formatter.debug(&format!(
            "Applied {} edit(s): {} page(s) remain",
            config.edits.len(),
            collection.len()
        ));
    }

    if config.dry_run {
        let rows = collection.page_summaries();
        if config.json {
            println!("{}", page_table_json(&rows)?);
        } else {
            formatter.page_table(&rows, true);
            formatter.info(&format!(
                "Dry run: {} page(s) would be written to {}",
                rows.len(),
                config.output.display()
            ));
        }
    } else {
        export(&config, &collection, &formatter).await?;
    }

    if let (Some(path), Some(preferences)) = (&config.preferences, &preferences) {
        preferences.save(path).await?;
    }

    Ok(())
}

/// Export the collection and write it to the configured output.
async fn export(
    config: &Config,
    collection: &PageCollection,
    formatter: &OutputFormatter,
) -> Result<(), PdfDeckError> {
    let writer = PdfWriter::new();
    writer.can_write(&config.output).await?;
    handle_output_overwrite(config, formatter, &writer).await?;

    formatter.info(&format!("Exporting {} page(s)...", collection.len()));
    let exporter = MergeExporter::new(ExportOptions::from_config(config));
    let result = exporter.export(collection).await?;

    let write_stats = writer.save_bytes(result.bytes, &config.output).await?;
    display_export_summary(formatter, &result.statistics, &write_stats);

    Ok(())
}

/// Handle output file overwrite scenarios.
async fn handle_output_overwrite(
    config: &Config,
    formatter: &OutputFormatter,
    writer: &PdfWriter,
) -> Result<(), PdfDeckError> {
    if !writer.exists(&config.output).await {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(PdfDeckError::output_exists(config.output.clone())),
        OverwriteMode::Prompt => {
            // Nobody to ask in quiet mode.
            if formatter.is_quiet() {
                return Err(PdfDeckError::output_exists(config.output.clone()));
            }

            formatter.warning(&format!(
                "Output file already exists: {}",
                config.output.display()
            ));

            use std::io::{self, Write};
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin()
                .read_line(&mut response)
                .map_err(|err| PdfDeckError::other(format!("Failed to read input: {err}")))?;

            let response = response.trim().to_lowercase();
            if response == "y" || response == "yes" {
                Ok(())
            } else {
                Err(PdfDeckError::Cancelled)
            }
        }
    }
}
