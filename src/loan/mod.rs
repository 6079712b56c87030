//! Loan input records and portfolio loading

pub mod data;
pub mod loader;

pub use data::{AncillaryCharges, Compounding, Currency, LoanTerms, RateType};
pub use loader::{load_default_portfolio, load_loans, load_loans_from_reader};
