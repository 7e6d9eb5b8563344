//! Batch command - export every payment document of a directory.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::{glob, Pattern};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info, warn};

use gispd_core::{DocumentOutcome, GispdConfig, Pipeline, XlsxOutput};

use super::load_config;

/// Arguments for the batch command.
#[derive(Args, Default)]
pub struct BatchArgs {
    /// Directory scanned for .xls payment documents
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// Output workbook
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Rooms reference workbook
    #[arg(long)]
    rooms: Option<PathBuf>,

    /// Accounts reference workbook
    #[arg(long)]
    accounts: Option<PathBuf>,

    /// Write a per-file summary CSV
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Skip documents already present in the output workbook
    #[arg(long)]
    skip_existing: bool,

    /// Stop at the first failing document
    #[arg(long)]
    fail_fast: bool,
}

impl BatchArgs {
    fn apply(&self, config: &mut GispdConfig) {
        if let Some(dir) = &self.input_dir {
            config.paths.input_dir = dir.clone();
        }
        if let Some(output) = &self.output {
            config.paths.output_file = output.clone();
        }
        if let Some(rooms) = &self.rooms {
            config.paths.rooms_file = rooms.clone();
        }
        if let Some(accounts) = &self.accounts {
            config.paths.accounts_file = accounts.clone();
        }
        if self.skip_existing {
            config.output.skip_existing = true;
        }
    }
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    outcome: Option<DocumentOutcome>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    args.apply(&mut config);

    let files = find_documents(&config.paths.input_dir)?;
    if files.is_empty() {
        println!(
            "{} No payment documents found in {}",
            style("ℹ").blue(),
            config.paths.input_dir.display()
        );
        return Ok(());
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let output_path = config.paths.output_file.clone();
    let pipeline = Pipeline::from_config(config);
    info!(
        "Reference data: {} rooms, {} accounts",
        pipeline.references().room_count(),
        pipeline.references().account_count()
    );

    let mut output = XlsxOutput::open_or_create(&output_path)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        pb.set_message(
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );

        let result = pipeline.process_file(&path, &mut output);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(outcome) => results.push(FileResult {
                path,
                outcome: Some(outcome),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if args.fail_fast {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    pb.abandon();
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
                warn!("Failed to process {}: {}", path.display(), error_msg);
                results.push(FileResult {
                    path,
                    outcome: None,
                    error: Some(error_msg),
                    processing_time_ms,
                });
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    print_report(&results, &output_path, start);
    Ok(())
}

/// Payment documents of `dir`, sorted by file name.
fn find_documents(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let pattern = format!("{}/*.xls", Pattern::escape(&dir.to_string_lossy()));
    let mut files: Vec<PathBuf> = glob(&pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}

fn print_report(results: &[FileResult], output_path: &Path, start: Instant) {
    let exported: Vec<_> = results
        .iter()
        .filter(|r| matches!(r.outcome, Some(DocumentOutcome::Exported { .. })))
        .collect();
    let skipped = results
        .iter()
        .filter(|r| matches!(r.outcome, Some(DocumentOutcome::Skipped { .. })))
        .count();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?} into {}",
        style("✓").green(),
        results.len(),
        start.elapsed(),
        output_path.display()
    );
    println!(
        "   {} exported, {} skipped, {} failed",
        style(exported.len()).green(),
        style(skipped).yellow(),
        style(failed.len()).red()
    );

    let with_warnings: Vec<_> = exported
        .iter()
        .filter_map(|r| match &r.outcome {
            Some(DocumentOutcome::Exported { warnings, .. }) if !warnings.is_empty() => {
                Some((&r.path, warnings))
            }
            _ => None,
        })
        .collect();
    if !with_warnings.is_empty() {
        println!();
        println!("{}", style("Warnings:").yellow());
        for (path, warnings) in with_warnings {
            for warning in warnings {
                println!("  - {}: {}", path.display(), warning);
            }
        }
    }

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "document_number",
        "services",
        "penalties",
        "warnings",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let time = result.processing_time_ms.to_string();

        match &result.outcome {
            Some(DocumentOutcome::Exported {
                document_number,
                services,
                penalties,
                warnings,
            }) => {
                wtr.write_record([
                    filename,
                    "exported",
                    document_number,
                    &services.to_string(),
                    &penalties.to_string(),
                    &warnings.join("; "),
                    &time,
                    "",
                ])?;
            }
            Some(DocumentOutcome::Skipped { document_number }) => {
                wtr.write_record([filename, "skipped", document_number, "", "", "", &time, ""])?;
            }
            None => {
                wtr.write_record([
                    filename,
                    "error",
                    "",
                    "",
                    "",
                    "",
                    &time,
                    result.error.as_deref().unwrap_or(""),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
