pub mod buy;
pub mod comparison;
pub mod defaults;
pub mod error;
pub mod horizon;
pub mod lease;
pub mod time_value;
pub mod types;

mod validation;

pub use comparison::{compare, compare_request, parse_request, ComparisonInput, ComparisonRequest};
pub use defaults::SimpleDefaults;
pub use error::LeaseBuyError;
pub use types::*;

/// Standard result type for all lease-buy operations
pub type LeaseBuyResult<T> = Result<T, LeaseBuyError>;
