use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use lease_buy_core::comparison::{compare_request, parse_request, ComparisonRequest, SimpleInputs};
use lease_buy_core::horizon::{HorizonPolicy, LeaseEnd};

use crate::config;
use crate::input;

/// What happens when the horizon outlives the lease.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LeaseEndArg {
    Renew,
    WalkAway,
}

impl From<LeaseEndArg> for LeaseEnd {
    fn from(arg: LeaseEndArg) -> Self {
        match arg {
            LeaseEndArg::Renew => LeaseEnd::Renew,
            LeaseEndArg::WalkAway => LeaseEnd::WalkAway,
        }
    }
}

/// Arguments for the lease versus buy comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to a JSON or YAML request (simple or advanced mode)
    #[arg(long)]
    pub input: Option<String>,

    /// TOML file overriding the simple-mode defaults
    #[arg(long)]
    pub defaults: Option<String>,

    /// Quoted monthly lease payment, tax included
    #[arg(long)]
    pub lease_payment: Option<Decimal>,

    /// Vehicle price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Loan APR as a decimal (0.06 = 6%)
    #[arg(long)]
    pub apr: Option<Decimal>,

    /// Lease money factor (e.g. 0.0025)
    #[arg(long)]
    pub money_factor: Option<Decimal>,

    /// Anticipated miles driven per year
    #[arg(long)]
    pub annual_miles: Option<u32>,

    /// Comparison horizon in months
    #[arg(long)]
    pub horizon: Option<u32>,

    /// Down payment on the purchase
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Loan term in months
    #[arg(long)]
    pub loan_term: Option<u32>,

    /// Lease term in months
    #[arg(long)]
    pub lease_term: Option<u32>,

    /// Cash due at lease signing
    #[arg(long)]
    pub due_at_signing: Option<Decimal>,

    /// Allow the horizon past either term, with this lease-end assumption
    #[arg(long)]
    pub extrapolate: Option<LeaseEndArg>,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let defaults = config::load_defaults(args.defaults.as_deref())?;

    let request: ComparisonRequest = if let Some(ref path) = args.input {
        let value = input::file::read_value(path)?;
        parse_request(&value.to_string())?
    } else if let Some(data) = input::stdin::read_stdin()? {
        parse_request(&data.to_string())?
    } else {
        ComparisonRequest::Simple(simple_from_flags(&args)?)
    };

    let result = compare_request(&request, &defaults)?;
    Ok(serde_json::to_value(result)?)
}

fn simple_from_flags(args: &CompareArgs) -> Result<SimpleInputs, Box<dyn std::error::Error>> {
    let horizon_months = args
        .horizon
        .ok_or("--horizon is required (or provide --input)")?;

    let horizon_policy = match args.extrapolate {
        Some(lease_end) => HorizonPolicy::Extrapolate {
            lease_end: lease_end.into(),
        },
        None => HorizonPolicy::Strict,
    };

    Ok(SimpleInputs {
        monthly_lease_payment: args.lease_payment,
        vehicle_price: args.price,
        apr: args.apr,
        money_factor: args.money_factor,
        annual_miles: args.annual_miles,
        horizon_months,
        down_payment: args.down_payment,
        loan_term_months: args.loan_term,
        lease_term_months: args.lease_term,
        due_at_signing: args.due_at_signing,
        horizon_policy,
    })
}
