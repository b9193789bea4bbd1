use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use plan_bom::{
    Document, ExtractOptions, ExtractWarning, ExtractedData, HeaderMode, PageSelection,
    PlanExtractor, extract_bom_to_csv, extract_text_bom_to_csv, position_log, reconstruct_tables,
};
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "plan2bom",
    version,
    about = "Reconstruct tables from OCR tokens and derive a bill of materials"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the bill of materials for an extracted-data directory.
    Bom(BomArgs),
    /// Build a bill of materials from a single text file by keyword counts.
    TextBom(TextBomArgs),
    /// Print ATM specifications and the panel schedule as CSV.
    Specs(SpecsArgs),
    /// Print the tables reconstructed from a position log as markdown or document JSON.
    Tables(TablesArgs),
    /// Write the extracted-data layout for a document JSON file.
    Export(ExportArgs),
}

#[derive(Debug, Args)]
struct BomArgs {
    /// Extracted-data directory containing `texts/`.
    #[arg(short = 'd', long)]
    data_dir: PathBuf,

    /// Output CSV path.
    #[arg(short, long)]
    output: PathBuf,

    /// Pages searched for the ATM table, like 1-4.
    #[arg(long, default_value = "1-4")]
    atm_pages: String,

    /// Maximum y distance between tokens of one row.
    #[arg(long, default_value_t = 20)]
    row_threshold: i64,

    /// Enable verbose warning output.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Args)]
struct TextBomArgs {
    /// Input text path.
    #[arg(short, long)]
    input: PathBuf,

    /// Output CSV path.
    #[arg(short, long)]
    output: PathBuf,

    /// Enable verbose warning output.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Args)]
struct SpecsArgs {
    /// Extracted-data directory containing `texts/`.
    #[arg(short = 'd', long)]
    data_dir: PathBuf,

    /// Pages searched for the ATM table, like 1-4.
    #[arg(long, default_value = "1-4")]
    atm_pages: String,

    /// Enable verbose warning output.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Args)]
struct TablesArgs {
    /// Position log path.
    #[arg(short, long)]
    input: PathBuf,

    /// Maximum y distance between tokens of one row.
    #[arg(long, default_value_t = 20)]
    row_threshold: i64,

    /// Keep the first row of each table as data.
    #[arg(long)]
    no_header: bool,

    /// Print a document JSON with one table element per table.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct ExportArgs {
    /// Document JSON path.
    #[arg(short, long)]
    input: PathBuf,

    /// Extracted-data directory to write.
    #[arg(short = 'd', long)]
    data_dir: PathBuf,
}

fn parse_pages(value: &str) -> Result<PageSelection> {
    PageSelection::from_str(value)
        .map_err(|error| anyhow!("invalid page selection: {error}"))
        .context("failed to parse --atm-pages")
}

fn log_warnings(warnings: &[ExtractWarning], verbose: bool) {
    if warnings.is_empty() {
        return;
    }

    eprintln!("warning: {} issue(s) detected", warnings.len());
    if verbose {
        for warning in warnings {
            eprintln!(
                "  - {:?} page={:?} path={:?}: {}",
                warning.code, warning.page, warning.path, warning.message
            );
        }
    }
}

fn outcome(found: bool) -> ExitCode {
    if found {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}

fn run_bom(args: &BomArgs) -> Result<ExitCode> {
    let options = ExtractOptions {
        atm_pages: parse_pages(&args.atm_pages)?,
        row_threshold: args.row_threshold,
        ..ExtractOptions::default()
    };
    let report = extract_bom_to_csv(&args.data_dir, &args.output, &options).with_context(|| {
        format!(
            "failed to build bill of materials from '{}'",
            args.data_dir.display()
        )
    })?;

    log_warnings(&report.warnings, args.verbose);
    eprintln!(
        "{} line(s), {} item(s) total, {} kind(s)",
        report.summary.line_count, report.summary.total_quantity, report.summary.item_kinds
    );
    Ok(outcome(report.line_count() > 0))
}

fn run_text_bom(args: &TextBomArgs) -> Result<ExitCode> {
    let report = extract_text_bom_to_csv(&args.input, &args.output).with_context(|| {
        format!(
            "failed to build bill of materials from '{}'",
            args.input.display()
        )
    })?;

    log_warnings(&report.warnings, args.verbose);
    Ok(outcome(report.line_count() > 0))
}

fn run_specs(args: &SpecsArgs) -> Result<ExitCode> {
    let options = ExtractOptions {
        atm_pages: parse_pages(&args.atm_pages)?,
        ..ExtractOptions::default()
    };
    let extractor = PlanExtractor::new(&args.data_dir, options)?;
    let mut warnings = Vec::new();

    let atm = extractor.atm_specifications_csv_string(&mut warnings)?;
    let panel = extractor.panel_schedule_csv_string(&mut warnings)?;
    let found = atm.is_some() || panel.is_some();
    for csv in [atm, panel].into_iter().flatten() {
        println!("{csv}");
    }

    log_warnings(&warnings, args.verbose);
    Ok(outcome(found))
}

fn run_tables(args: &TablesArgs) -> Result<ExitCode> {
    let log = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read position log '{}'", args.input.display()))?;
    let options = ExtractOptions {
        row_threshold: args.row_threshold,
        header_mode: if args.no_header {
            HeaderMode::NoHeader
        } else {
            HeaderMode::FirstRow
        },
        ..ExtractOptions::default()
    };

    let grids = reconstruct_tables(position_log::parse_position_log(&log), &options)?;
    if args.json {
        let mut metadata = Map::new();
        metadata.insert("source".to_string(), Value::from(args.input.display().to_string()));
        println!("{}", Document::from_tables(metadata, &grids).to_json_pretty()?);
    } else {
        for (index, grid) in grids.iter().enumerate() {
            println!("Table {}:\n{}\n", index + 1, grid.to_markdown());
        }
    }
    Ok(outcome(!grids.is_empty()))
}

fn run_export(args: &ExportArgs) -> Result<ExitCode> {
    let json = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read document '{}'", args.input.display()))?;
    let document = Document::from_json(&json)
        .with_context(|| format!("failed to parse document '{}'", args.input.display()))?;

    let pages = ExtractedData::new(&args.data_dir)
        .write_document(&document)
        .with_context(|| format!("failed to write '{}'", args.data_dir.display()))?;
    eprintln!("exported {pages} page(s)");
    Ok(outcome(pages > 0))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = match &cli.command {
        Commands::Bom(args) => args.verbose,
        Commands::TextBom(args) => args.verbose,
        Commands::Specs(args) => args.verbose,
        Commands::Tables(_) | Commands::Export(_) => false,
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "plan_bom=debug"
        } else {
            "plan_bom=warn"
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let result = match &cli.command {
        Commands::Bom(args) => run_bom(args),
        Commands::TextBom(args) => run_text_bom(args),
        Commands::Specs(args) => run_specs(args),
        Commands::Tables(args) => run_tables(args),
        Commands::Export(args) => run_export(args),
    };

    match result {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}
