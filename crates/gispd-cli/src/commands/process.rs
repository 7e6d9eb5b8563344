//! Process command - transform a single payment document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use gispd_core::models::rows::{fixed2, CellValue, ServiceDetail};
use gispd_core::output::{PENALTIES_SHEET, ROOMS_SHEET, SERVICES_SHEET};
use gispd_core::{DocumentExport, DocumentOutcome, Pipeline, XlsxOutput};

use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Payment document workbook
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Also append the document to the configured output workbook
    #[arg(long)]
    write: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV rows, prefixed with the target sheet
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let output_path = config.paths.output_file.clone();
    let pipeline = Pipeline::from_config(config);
    let export = pipeline.transform_file(&args.input)?;

    let rendered = format_export(&export, args.format)?;
    if let Some(path) = &args.output {
        fs::write(path, &rendered)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            path.display()
        );
    } else {
        println!("{}", rendered);
    }

    for warning in &export.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    if args.write {
        let mut workbook = XlsxOutput::open_or_create(&output_path)?;
        match pipeline.commit(&export, &mut workbook)? {
            DocumentOutcome::Exported { document_number, .. } => println!(
                "{} Document {} appended to {}",
                style("✓").green(),
                document_number,
                output_path.display()
            ),
            DocumentOutcome::Skipped { document_number } => println!(
                "{} Document {} already in {}, skipped",
                style("ℹ").blue(),
                document_number,
                output_path.display()
            ),
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());
    Ok(())
}

fn format_export(export: &DocumentExport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(export)?),
        OutputFormat::Csv => format_export_csv(export),
        OutputFormat::Text => Ok(format_export_text(export)),
    }
}

fn format_export_csv(export: &DocumentExport) -> anyhow::Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(vec![]);

    let mut write = |sheet: &str, cells: Vec<CellValue>| -> csv::Result<()> {
        let record: Vec<String> = std::iter::once(sheet.to_string())
            .chain(cells.iter().map(CellValue::render))
            .collect();
        wtr.write_record(&record)
    };

    write(ROOMS_SHEET, export.room.cells())?;
    for service in &export.services {
        write(SERVICES_SHEET, service.cells())?;
    }
    for penalty in &export.penalties {
        write(PENALTIES_SHEET, penalty.cells())?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_export_text(export: &DocumentExport) -> String {
    let header = &export.header;
    let mut output = String::new();

    output.push_str(&format!("Document: {}\n", header.document_number));
    output.push_str(&format!("Period: {}\n", header.period.display()));
    output.push_str(&format!("Account: {}\n", header.account));
    output.push_str(&format!("Room: {} ({:?})\n", header.room.number, header.room.kind));
    output.push_str(&format!("Area: {} m2\n", header.area));
    output.push_str(&format!(
        "GIS account: {}\n",
        header.gis_account.as_deref().unwrap_or("-")
    ));
    output.push('\n');

    output.push_str("Services:\n");
    for service in &export.services {
        let amount = match &service.detail {
            ServiceDetail::Charge { amount_due, .. } => fixed2(*amount_due),
            ServiceDetail::Maintenance { total, .. } => fixed2(*total),
        };
        output.push_str(&format!("  {:<40} {:>12}\n", service.service, amount));
    }

    if !export.penalties.is_empty() {
        output.push('\n');
        output.push_str("Penalties:\n");
        for penalty in &export.penalties {
            output.push_str(&format!("  {:>12}\n", fixed2(penalty.amount)));
        }
    }

    output.push('\n');
    output.push_str(&format!(
        "Capital repair: {}\n",
        fixed2(header.capital_repair.total)
    ));
    output.push_str(&format!(
        "Total: {}\n",
        fixed2(header.total)
    ));

    output
}
