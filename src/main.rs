//! csv-consolidate CLI - merge CSV files into one

use clap::Parser;
use csv_consolidate::ingest::{IngestLimits, export, load_files};
use csv_consolidate::{
    ConsolidationOptions, ConsolidationResult, HeaderHandling, Method, SortOrder, Table,
    consolidate, data_points, suggest_mapping, write_csv,
};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Consolidate CSV files with header alignment and set operations.
///
/// Aligns the columns of every input file, combines the rows by merge,
/// union or intersect, and writes a single CSV.
#[derive(Parser, Debug)]
#[command(name = "csv-consolidate")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input CSV file(s)
    #[arg(required_unless_present = "list_data_points")]
    files: Vec<PathBuf>,

    /// JSON options file (camelCase keys); flags override its values.
    /// Manual data-point mappings go under `dataPointSelection.fileMappings`,
    /// keyed by input file name
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// How rows are combined: merge, union or intersect
    #[arg(short = 'm', long)]
    method: Option<Method>,

    /// Output headers: first, all or custom
    #[arg(long = "headers")]
    header_handling: Option<HeaderHandling>,

    /// Comma-separated output headers (implies --headers custom)
    #[arg(long, value_delimiter = ',')]
    custom_headers: Vec<String>,

    /// Sort by this output column
    #[arg(short = 's', long)]
    sort_by: Option<String>,

    /// Sort in descending order
    #[arg(long)]
    desc: bool,

    /// Remove duplicate rows
    #[arg(short = 'u', long)]
    remove_duplicates: bool,

    /// Drop rows where every cell is blank
    #[arg(short = 'e', long)]
    filter_empty: bool,

    /// Consolidate these data points (comma-separated catalog keys)
    #[arg(short = 'p', long, value_delimiter = ',')]
    data_points: Vec<String>,

    /// Write the CSV to this file instead of stdout
    #[arg(short = 'o', long, conflicts_with = "export")]
    output: Option<PathBuf>,

    /// Write consolidated-data-<date>.csv into this directory
    #[arg(long)]
    export: Option<PathBuf>,

    /// What to print: csv (default), json (result with stats) or stats
    #[arg(short = 'f', long, default_value = "csv")]
    format: OutputFormat,

    /// Print suggested data-point mappings for each file and exit
    #[arg(long)]
    suggest: bool,

    /// List the data point catalog and exit
    #[arg(long)]
    list_data_points: bool,

    /// Maximum number of input files
    #[arg(long, default_value_t = IngestLimits::default().max_files)]
    max_files: usize,

    /// Maximum size of one input file in bytes
    #[arg(long, default_value_t = IngestLimits::default().max_file_bytes)]
    max_file_size: u64,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
    Stats,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Install a stderr subscriber; `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    if args.list_data_points {
        print_catalog();
        return Ok(());
    }

    let limits = IngestLimits {
        max_files: args.max_files,
        max_file_bytes: args.max_file_size,
    };

    let report = load_files(args.files.as_slice(), &limits)?;
    for (path, error) in &report.failures {
        eprintln!("Skipping {}: {}", path.display(), error);
    }
    let tables = report.into_tables()?;

    let options = build_options(args)?;

    if args.suggest {
        print_suggestions(&tables, &options);
        return Ok(());
    }

    let result = consolidate(&tables, &options)?;
    for warning in tables.iter().flat_map(Table::warnings).chain(&result.warnings) {
        eprintln!("Warning: {warning}");
    }

    if let Some(dir) = &args.export {
        let path = export(dir, &result)?;
        eprintln!("Exported {} rows to {}", result.stats.total_rows, path.display());
    } else if let Some(path) = &args.output {
        write_csv(BufWriter::new(fs::File::create(path)?), &result.headers, &result.rows)?;
    }

    let writes_file = args.export.is_some() || args.output.is_some();
    match args.format {
        OutputFormat::Csv if !writes_file => {
            write_csv(io::stdout().lock(), &result.headers, &result.rows)?;
        }
        OutputFormat::Csv => eprintln!("{}", result.stats),
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Stats => println!("{}", result.stats),
    }

    Ok(())
}

/// Options from the config file, overridden by flags.
fn build_options(args: &Args) -> csv_consolidate::Result<ConsolidationOptions> {
    let mut options = match &args.config {
        Some(path) => ConsolidationOptions::from_json(&fs::read_to_string(path)?)?,
        None => ConsolidationOptions::new(),
    };

    if let Some(method) = args.method {
        options.method(method);
    }
    if let Some(handling) = args.header_handling {
        options.header_handling(handling);
    }
    if !args.custom_headers.is_empty() {
        options.custom_headers(args.custom_headers.iter().cloned());
    }
    if let Some(column) = &args.sort_by {
        let order = if args.desc {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        };
        options.sort_by(column.clone(), order);
    }
    if args.remove_duplicates {
        options.remove_duplicates(true);
    }
    if args.filter_empty {
        options.filter_empty(true);
    }
    if !args.data_points.is_empty() {
        // Keep manual mappings from the config file
        let selection = options.data_point_selection_mut();
        selection.enabled = true;
        selection.selected_fields = args.data_points.clone();
    }

    Ok(options)
}

fn print_json(result: &ConsolidationResult) -> Result<(), Box<dyn std::error::Error>> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, result)?;
    writeln!(out)?;
    Ok(())
}

fn print_catalog() {
    for dp in data_points() {
        println!("{:<14} {:<14} {}", dp.key, dp.label, dp.description);
        println!("{:<14} aliases: {}", "", dp.aliases.join(", "));
    }
}

fn print_suggestions(tables: &[Table], options: &ConsolidationOptions) {
    let fields: Vec<String> = match options.active_data_points() {
        Some(selection) => selection.selected_fields.clone(),
        None => data_points().iter().map(|dp| dp.key.to_string()).collect(),
    };

    for table in tables {
        println!("File: {}", table.name());
        let mapping = suggest_mapping(table.headers(), fields.as_slice());
        for field in &fields {
            println!("  {:<14} -> {}", field, mapping.get(field).unwrap_or("(unmapped)"));
        }
        println!();
    }
}
