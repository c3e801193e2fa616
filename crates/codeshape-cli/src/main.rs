use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use codeshape_cli::analyze::{self, MAX_SOURCE_SIZE};
use codeshape_cli::render;

#[derive(Parser, Debug)]
#[command(name = "codeshape")]
#[command(about = "Structure and complexity of PHP/Hack sources from their token stream")]
struct Cli {
    /// Refuse source files larger than this many bytes
    #[arg(long, global = true, default_value_t = MAX_SOURCE_SIZE)]
    max_source_size: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Dump the token stream of a file
    Tokens {
        /// Path to a .php / .hh source file
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },

    /// Show the declaration tree of a file
    Outline {
        /// Path to a .php / .hh source file
        file: PathBuf,

        #[command(flatten)]
        coverage: CoverageArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },

    /// CCN and CRAP for every function and method
    Metrics {
        /// Source files; unreadable ones are reported and skipped
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        coverage: CoverageArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },
}

#[derive(Args, Debug)]
struct CoverageArgs {
    /// Line coverage (percent) for declarations missing from --coverage-file
    #[arg(long, default_value_t = 0.0)]
    coverage: f64,

    /// JSON object of coverage percentages keyed `Class::method`, `function` or `Class`
    #[arg(long)]
    coverage_file: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Pretty,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Tokens { file, format } => cmd_tokens(&file, format, cli.max_source_size),
        Commands::Outline {
            file,
            coverage,
            format,
        } => cmd_outline(&file, &coverage, format, cli.max_source_size),
        Commands::Metrics {
            files,
            coverage,
            format,
        } => cmd_metrics(&files, &coverage, format, cli.max_source_size),
    }
}

fn cmd_tokens(file: &Path, format: Format, max_size: usize) -> Result<()> {
    let source = analyze::read_source(file, max_size)?;
    let stream = source
        .stream()
        .with_context(|| format!("failed to load '{}'", file.display()))?;
    match format {
        Format::Pretty => print!("{}", render::tokens(stream)),
        Format::Json => println!("{}", serde_json::to_string_pretty(stream.tokens())?),
    }
    Ok(())
}

fn cmd_outline(file: &Path, coverage: &CoverageArgs, format: Format, max_size: usize) -> Result<()> {
    let map = analyze::load_coverage(coverage.coverage_file.as_deref(), coverage.coverage)?;
    let report = analyze::analyze(file, &map, max_size)?;
    match format {
        Format::Pretty => print!("{}", render::outline(&report)),
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn cmd_metrics(
    files: &[PathBuf],
    coverage: &CoverageArgs,
    format: Format,
    max_size: usize,
) -> Result<()> {
    let map = analyze::load_coverage(coverage.coverage_file.as_deref(), coverage.coverage)?;
    let reports = analyze::analyze_all(files, &map, max_size);
    if reports.is_empty() {
        bail!("none of the {} input files could be analyzed", files.len());
    }

    match format {
        Format::Pretty => {
            for (path, report) in &reports {
                print!("{}", render::metrics(&path.display().to_string(), report));
            }
        }
        Format::Json => {
            let rows: Vec<render::MetricsRow> = reports
                .iter()
                .flat_map(|(path, report)| render::metric_rows(path, report))
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}
