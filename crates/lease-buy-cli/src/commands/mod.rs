pub mod compare;
pub mod lease;
pub mod loan;
