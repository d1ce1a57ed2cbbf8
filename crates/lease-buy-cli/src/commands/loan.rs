use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use lease_buy_core::buy::loan::{self, LoanInput};

use crate::input;

/// Arguments for the standalone loan payment calculator
#[derive(Args)]
pub struct LoanPaymentArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount financed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// APR as a decimal (0.05 = 5%)
    #[arg(long)]
    pub apr: Option<Decimal>,

    /// Loan term in months
    #[arg(long)]
    pub term: Option<u32>,

    /// Include the month-by-month amortization schedule
    #[arg(long)]
    pub schedule: bool,
}

pub fn run_loan_payment(args: LoanPaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: LoanInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        LoanInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            apr: args.apr.ok_or("--apr is required (or provide --input)")?,
            term_months: args.term.ok_or("--term is required (or provide --input)")?,
            include_schedule: args.schedule,
        }
    };

    let result = loan::calculate_loan(&loan_input)?;
    Ok(serde_json::to_value(result)?)
}
