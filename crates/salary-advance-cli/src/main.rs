mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use salary_advance_core::{AdvanceError, ErrorKind};

use commands::advance::{AdvanceArgs, BatchArgs};
use commands::loan::LoanArgs;
use commands::salary::NormalizeArgs;

/// Salary advance eligibility and loan amortization
#[derive(Parser)]
#[command(
    name = "sadv",
    version,
    about = "Salary advance eligibility and loan amortization",
    long_about = "Evaluates salary advance requests (eligibility, maximum advance, fee) \
                  and computes compound-interest totals and amortization schedules \
                  for associated installment loans, with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Advance policy file (.json, .yaml or .yml); defaults apply when omitted
    #[arg(long, global = true)]
    policy: Option<String>,

    /// Log filter written to stderr (e.g. "debug", "salary_advance_core=info")
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a salary advance request (with optional loan terms)
    Advance(AdvanceArgs),
    /// Process a JSON array of advance requests against one record store
    Batch(BatchArgs),
    /// Convert a salary at any pay frequency to its monthly equivalent
    Normalize(NormalizeArgs),
    /// Total repayable for a loan under monthly compounding
    Repayable(LoanArgs),
    /// Month-by-month amortization schedule for a loan
    Schedule(LoanArgs),
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

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Exit status for a failed command: 2 for bad input, 3 for an unknown
/// record, 1 for anything else.
fn exit_code(err: &(dyn std::error::Error + 'static)) -> i32 {
    match err.downcast_ref::<AdvanceError>().map(AdvanceError::kind) {
        Some(ErrorKind::ClientInput) => 2,
        Some(ErrorKind::NotFound) => 3,
        _ => 1,
    }
}

fn run(cli: Cli) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let policy = config::load_policy(cli.policy.as_deref())?;

    match cli.command {
        Commands::Advance(args) => commands::advance::run_advance(args, policy),
        Commands::Batch(args) => commands::advance::run_batch(args, policy),
        Commands::Normalize(args) => commands::salary::run_normalize(args),
        Commands::Repayable(args) => commands::loan::run_repayable(args),
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Version => Ok(serde_json::json!({
            "name": "sadv",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let format = cli.output.clone();

    match run(cli) {
        Ok(value) => {
            if let Err(e) = output::format_output(&format, &value) {
                eprintln!("{}: {}", "error".red().bold(), e);
                process::exit(1);
            }
        }
        Err(e) => {
            let message = match e.downcast_ref::<AdvanceError>() {
                Some(core_err) => core_err.public_message(),
                None => e.to_string(),
            };
            eprintln!("{}: {}", "error".red().bold(), message);
            process::exit(exit_code(e.as_ref()));
        }
    }
}
