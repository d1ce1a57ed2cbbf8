mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::compare::CompareArgs;
use commands::lease::LeasePaymentArgs;
use commands::loan::LoanPaymentArgs;

/// Compare the net cost of leasing versus buying a vehicle
#[derive(Parser)]
#[command(
    name = "lvb",
    version,
    about = "Compare the net cost of leasing versus buying a vehicle",
    long_about = "Prices a lease and a financed purchase over the same horizon with decimal \
                  precision, tracks the cumulative net cost of each month by month, and \
                  recommends the cheaper option. Also exposes the lease and loan payment \
                  calculators on their own."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare leasing against buying over a horizon
    Compare(CompareArgs),
    /// Monthly lease payment from cap cost, residual and money factor
    LeasePayment(LeasePaymentArgs),
    /// Level monthly loan payment, optionally with the amortization schedule
    LoanPayment(LoanPaymentArgs),
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

/// Logs go to stderr so they never mix with formatted output on stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Compare(args) => commands::compare::run_compare(args),
        Commands::LeasePayment(args) => commands::lease::run_lease_payment(args),
        Commands::LoanPayment(args) => commands::loan::run_loan_payment(args),
        Commands::Version => {
            println!("lvb {}", env!("CARGO_PKG_VERSION"));
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
