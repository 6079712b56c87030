//! Financial indicators derived from a generated schedule

pub mod calculator;
pub mod irr;
pub mod npv;

pub use calculator::{
    compute_indicators, default_discount_rate_monthly, FinancialIndicators,
    DEFAULT_OPPORTUNITY_COST_PCT,
};
pub use irr::{annualize, monthly_irr, IrrResult};
pub use npv::{full_cost_vector, npv, principal_interest_vector};
