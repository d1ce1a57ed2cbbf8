//! Simple-mode defaults.
//!
//! Every value a simple-mode request does not supply comes from here. The
//! constants are the documented product defaults; `SimpleDefaults` bundles
//! them so a caller can override individual values (the CLI reads a TOML
//! file into it).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Months, Rate};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const DEFAULT_LOAN_TERM_MONTHS: Months = 60;
pub const DEFAULT_LEASE_TERM_MONTHS: Months = 36;

/// Lease residual as a share of the vehicle price.
pub const DEFAULT_RESIDUAL_PCT: Rate = dec!(0.58);

pub const DEFAULT_DOWN_PAYMENT: Money = dec!(5000);
pub const DEFAULT_DUE_AT_SIGNING: Money = dec!(2000);
pub const DEFAULT_DISPOSITION_FEE: Money = dec!(395);
pub const DEFAULT_BUY_FEES: Money = dec!(0);
pub const DEFAULT_SALES_TAX_RATE: Rate = dec!(0.0625);

pub const DEFAULT_MILEAGE_ALLOWANCE: u32 = 12_000;
pub const DEFAULT_ANNUAL_MILES: u32 = 12_000;
pub const DEFAULT_EXCESS_MILE_RATE: Money = dec!(0.25);

/// Loan terms outside this range are rejected.
pub const MIN_LOAN_TERM_MONTHS: Months = 12;
pub const MAX_LOAN_TERM_MONTHS: Months = 96;

/// Highest accepted APR. Rates are decimals, so 1 is 100%.
pub const MAX_APR: Rate = dec!(1);

/// Longest comparison horizon, seven years.
pub const MAX_HORIZON_MONTHS: Months = 84;

/// Money factor expressed per unit of decimal APR: `mf = apr / 24`.
/// Equivalent to the dealer convention `APR% / 2400`.
pub const MONEY_FACTOR_DIVISOR: Decimal = dec!(24);

/// Expected resale value as a share of price after `n` whole years,
/// indexed by `n - 1`. Horizons past the table use the last entry.
pub const RESALE_PCT_BY_YEAR: [Rate; 7] = [
    dec!(0.80),
    dec!(0.70),
    dec!(0.60),
    dec!(0.50),
    dec!(0.45),
    dec!(0.40),
    dec!(0.35),
];

// ---------------------------------------------------------------------------
// Overridable bundle
// ---------------------------------------------------------------------------

/// Defaults applied when resolving a simple-mode request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleDefaults {
    pub loan_term_months: Months,
    pub lease_term_months: Months,
    pub residual_pct: Rate,
    pub down_payment: Money,
    pub due_at_signing: Money,
    pub disposition_fee: Money,
    pub buy_fees: Money,
    pub sales_tax_rate: Rate,
    pub mileage_allowance: u32,
    pub annual_miles: u32,
    pub excess_mile_rate: Money,
    pub resale_pct_by_year: Vec<Rate>,
}

impl Default for SimpleDefaults {
    fn default() -> Self {
        Self {
            loan_term_months: DEFAULT_LOAN_TERM_MONTHS,
            lease_term_months: DEFAULT_LEASE_TERM_MONTHS,
            residual_pct: DEFAULT_RESIDUAL_PCT,
            down_payment: DEFAULT_DOWN_PAYMENT,
            due_at_signing: DEFAULT_DUE_AT_SIGNING,
            disposition_fee: DEFAULT_DISPOSITION_FEE,
            buy_fees: DEFAULT_BUY_FEES,
            sales_tax_rate: DEFAULT_SALES_TAX_RATE,
            mileage_allowance: DEFAULT_MILEAGE_ALLOWANCE,
            annual_miles: DEFAULT_ANNUAL_MILES,
            excess_mile_rate: DEFAULT_EXCESS_MILE_RATE,
            resale_pct_by_year: RESALE_PCT_BY_YEAR.to_vec(),
        }
    }
}

impl SimpleDefaults {
    /// Resale share of price for a horizon, rounding partial years up.
    pub fn resale_pct_for_horizon(&self, horizon_months: Months) -> Rate {
        let years = horizon_months.div_ceil(12).max(1) as usize;
        self.resale_pct_by_year
            .get(years - 1)
            .or_else(|| self.resale_pct_by_year.last())
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}
