mod commands;
mod config;
mod input;
mod output;
mod store;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::consolidation::ConsolidateArgs;
use commands::projection::{ExportArgs, ProjectArgs};
use commands::schedules::{DebtScheduleArgs, DepreciationScheduleArgs};

/// Ten-year financial projections with decimal precision
#[derive(Parser)]
#[command(
    name = "finproj",
    version,
    about = "Ten-year financial projections and consolidated statements",
    long_about = "A CLI for building debt and depreciation schedules and a 120-month \
                  consolidated P&L, cash flow and balance sheet, rolled up into quarters \
                  and years, with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Engine configuration file (.yaml, .yml or .json)
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the monthly amortization schedule for one debt instrument
    DebtSchedule(DebtScheduleArgs),
    /// Build the 120-month depreciation schedule for an asset pool
    DepreciationSchedule(DepreciationScheduleArgs),
    /// Consolidate prepared schedules into monthly, quarterly and annual statements
    Consolidate(ConsolidateArgs),
    /// Run the full projection from one input snapshot
    Project(ProjectArgs),
    /// Write one projected series as CSV
    Export(ExportArgs),
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

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let engine_config = match config::load_engine_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => fail(e),
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::DebtSchedule(args) => commands::schedules::run_debt_schedule(args),
        Commands::DepreciationSchedule(args) => {
            commands::schedules::run_depreciation_schedule(args)
        }
        Commands::Consolidate(args) => {
            commands::consolidation::run_consolidate(args, &engine_config)
        }
        Commands::Project(args) => commands::projection::run_project(args, &engine_config),
        Commands::Export(args) => {
            match commands::projection::run_export(args, &engine_config) {
                Ok(text) => {
                    print!("{}", text);
                    return;
                }
                Err(e) => fail(e),
            }
        }
        Commands::Version => {
            println!("finproj {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => fail(e),
    }
}

fn fail(e: Box<dyn std::error::Error>) -> ! {
    eprintln!("{}: {}", "error".red().bold(), e);
    process::exit(1);
}
