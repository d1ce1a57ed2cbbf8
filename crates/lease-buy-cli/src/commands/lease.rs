use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use lease_buy_core::lease::payment::{self, apr_to_money_factor, LeasePaymentInput};

use crate::input;

/// Arguments for the standalone lease payment calculator
#[derive(Args)]
pub struct LeasePaymentArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Capitalized cost after any cap cost reduction
    #[arg(long)]
    pub cap_cost: Option<Decimal>,

    /// Residual value at lease end
    #[arg(long)]
    pub residual: Option<Decimal>,

    /// Money factor (e.g. 0.00125)
    #[arg(long, conflicts_with = "apr")]
    pub money_factor: Option<Decimal>,

    /// Lease APR as a decimal, converted with mf = apr / 24
    #[arg(long)]
    pub apr: Option<Decimal>,

    /// Lease term in months
    #[arg(long)]
    pub term: Option<u32>,
}

pub fn run_lease_payment(args: LeasePaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let lease_input: LeasePaymentInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let adjusted_cap_cost = args
            .cap_cost
            .ok_or("--cap-cost is required (or provide --input)")?;
        let residual_value = args
            .residual
            .ok_or("--residual is required (or provide --input)")?;
        let term_months = args.term.ok_or("--term is required (or provide --input)")?;
        let money_factor = match (args.money_factor, args.apr) {
            (Some(mf), _) => mf,
            (None, Some(apr)) => apr_to_money_factor(apr),
            (None, None) => return Err("--money-factor or --apr is required".into()),
        };

        LeasePaymentInput {
            adjusted_cap_cost,
            residual_value,
            money_factor,
            term_months,
        }
    };

    let result = payment::calculate_lease_payment(&lease_input)?;
    Ok(serde_json::to_value(result)?)
}
