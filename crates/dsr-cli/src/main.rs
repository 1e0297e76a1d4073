mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::advice::{AdviseArgs, PromptArgs};
use commands::dsr::{CalculateArgs, ScheduleArgs, StressArgs};

/// Debt service ratio calculator
#[derive(Parser)]
#[command(
    name = "dsr",
    version,
    about = "Debt service ratio calculator",
    long_about = "Computes a debt service ratio for a single loan scenario with decimal \
                  precision. Builds the monthly amortisation schedule at the contracted \
                  rate and a stress pass for the interest burden, with grace periods, \
                  collateral type and equal-installment or equal-principal repayment."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "warn", env = "DSR_LOG_LEVEL", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the debt service ratio and repayment schedule
    Calculate(CalculateArgs),
    /// Print the monthly repayment schedule at the contracted rate
    Schedule(ScheduleArgs),
    /// Show the stress pass and the interest burden it produces
    Stress(StressArgs),
    /// Calculate and request advice from an external program
    Advise(AdviseArgs),
    /// Print the prompt an advice service would receive
    Prompt(PromptArgs),
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

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::dsr::run_calculate(args),
        Commands::Schedule(args) => commands::dsr::run_schedule(args),
        Commands::Stress(args) => commands::dsr::run_stress(args),
        Commands::Advise(args) => commands::advice::run_advise(args),
        Commands::Prompt(args) => match commands::advice::run_prompt(args) {
            Ok(text) => {
                println!("{text}");
                return;
            }
            Err(e) => Err(e),
        },
        Commands::Version => {
            println!("dsr {}", env!("CARGO_PKG_VERSION"));
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
