mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing::Level;

use commands::deal::AnalyseArgs;
use commands::normalize::NormalizeArgs;
use commands::project::{HistoryArgs, PrepareArgs, ValidateArgs};

/// Profitability calculations for property dealer operations
#[derive(Parser)]
#[command(
    name = "dealer",
    version,
    about = "Profitability calculations for property dealer operations",
    long_about = "A CLI for analysing property dealer deals with decimal precision. \
                  Computes acquisition, financing and VAT figures, the resulting \
                  margin and profitability, and checks projects against the \
                  draft and submit rule sets."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log to stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the deal summary (margin, VAT, profitability)
    Analyse(AnalyseArgs),
    /// Check a project against the submit or draft rule set
    Validate(ValidateArgs),
    /// Validate a project and build the payload to store
    Prepare(PrepareArgs),
    /// Summarise a list of projects for the history view
    History(HistoryArgs),
    /// Normalise a raw numeric form token
    Normalize(NormalizeArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyse(args) => commands::deal::run_analyse(args),
        Commands::Validate(args) => commands::project::run_validate(args),
        Commands::Prepare(args) => commands::project::run_prepare(args),
        Commands::History(args) => commands::project::run_history(args),
        Commands::Normalize(args) => commands::normalize::run_normalize(args),
        Commands::Version => {
            println!("dealer {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
