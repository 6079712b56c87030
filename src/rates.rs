//! Rate normalization to effective monthly terms
//!
//! Every downstream calculation (schedule rows, NPV, IRR) works on an
//! effective monthly rate. This module converts annual rates quoted as
//! nominal or effective, under their compounding convention, into that
//! common form.

use crate::loan::{Compounding, RateType};

/// Convert an annual rate (as a percentage, e.g. 7.5 for 7.5%) into an
/// effective monthly rate (as a decimal fraction, e.g. 0.00604).
///
/// A zero annual rate short-circuits to zero regardless of type and
/// compounding. Effective rates convert via `(1+r)^(1/12) - 1`; nominal
/// rates are first converted to their effective-annual equivalent.
pub fn monthly_effective_rate(
    annual_rate_pct: f64,
    rate_type: RateType,
    compounding: Compounding,
) -> f64 {
    if annual_rate_pct == 0.0 {
        return 0.0;
    }

    let annual = annual_rate_pct / 100.0;

    let effective_annual = match rate_type {
        RateType::Effective => annual,
        RateType::Nominal => effective_annual_from_nominal(annual, compounding),
    };

    monthly_from_annual(effective_annual)
}

/// Effective annual rate equivalent to a nominal annual rate compounded
/// `m` times per year: `(1 + r/m)^m - 1`
pub fn effective_annual_from_nominal(nominal_annual: f64, compounding: Compounding) -> f64 {
    let m = compounding.periods_per_year() as f64;
    (1.0 + nominal_annual / m).powf(m) - 1.0
}

/// Effective monthly rate equivalent to an effective annual rate
pub fn monthly_from_annual(effective_annual: f64) -> f64 {
    (1.0 + effective_annual).powf(1.0 / 12.0) - 1.0
}

/// Effective annual rate equivalent to an effective monthly rate
pub fn annual_from_monthly(monthly_rate: f64) -> f64 {
    (1.0 + monthly_rate).powi(12) - 1.0
}
