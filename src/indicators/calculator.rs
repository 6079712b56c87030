//! Financial indicator derivation from a generated schedule

use log::warn;
use serde::{Deserialize, Serialize};

use crate::loan::{Compounding, RateType};
use crate::rates;
use crate::schedule::PaymentPeriod;

use super::irr::{annualize, monthly_irr};
use super::npv::{full_cost_vector, npv, principal_interest_vector};

/// Default opportunity-cost discount rate, effective annual percent
pub const DEFAULT_OPPORTUNITY_COST_PCT: f64 = 9.0;

/// Effective monthly discount rate for the default opportunity cost
pub fn default_discount_rate_monthly() -> f64 {
    rates::monthly_effective_rate(
        DEFAULT_OPPORTUNITY_COST_PCT,
        RateType::Effective,
        Compounding::Monthly,
    )
}

/// Indicators derived once per schedule
///
/// Two annualized cost rates are reported side by side because the two
/// historical definitions of the total-cost rate disagree:
/// `tcea_all_in_pct` annualizes the IRR of the flow including every
/// borrower charge, while `tcea_interest_only_pct` annualizes the IRR of
/// the principal-and-interest flow alone (and therefore equals
/// `irr_annual_pct` by construction). Callers choose which reading to
/// present; neither is privileged here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialIndicators {
    /// NPV of the full-cost flow at `discount_rate_monthly`
    pub npv: f64,

    /// Discount rate the NPV was evaluated at (effective monthly)
    pub discount_rate_monthly: f64,

    /// IRR of the principal-and-interest flow (effective monthly) —
    /// the pure cost of money
    pub irr_monthly: f64,

    /// `irr_monthly` annualized, percent
    pub irr_annual_pct: f64,

    /// Annualized IRR of the flow including all ancillary charges, percent
    pub tcea_all_in_pct: f64,

    /// Annualized IRR of the principal-and-interest flow, percent
    pub tcea_interest_only_pct: f64,

    /// False when the principal-and-interest IRR search hit its
    /// iteration cap (best-effort value)
    pub irr_converged: bool,

    /// False when the all-in IRR search hit its iteration cap
    pub tcea_converged: bool,
}

/// Compute all indicators from the disbursed principal and the schedule
///
/// Numeric non-convergence never fails the call; it is logged and
/// surfaced through the `*_converged` flags.
pub fn compute_indicators(
    principal: f64,
    periods: &[PaymentPeriod],
    discount_rate_monthly: f64,
) -> FinancialIndicators {
    let full_flows = full_cost_vector(principal, periods);
    let pi_flows = principal_interest_vector(principal, periods);

    let npv_value = npv(&full_flows, discount_rate_monthly);

    let (irr_monthly_rate, irr_converged) = resolve_irr(&pi_flows, "principal-and-interest");
    let (tcea_monthly_rate, tcea_converged) = resolve_irr(&full_flows, "all-in cost");

    let irr_annual_pct = annualize(irr_monthly_rate) * 100.0;

    FinancialIndicators {
        npv: npv_value,
        discount_rate_monthly,
        irr_monthly: irr_monthly_rate,
        irr_annual_pct,
        tcea_all_in_pct: annualize(tcea_monthly_rate) * 100.0,
        tcea_interest_only_pct: irr_annual_pct,
        irr_converged,
        tcea_converged,
    }
}

fn resolve_irr(flows: &[f64], label: &str) -> (f64, bool) {
    match monthly_irr(flows) {
        Some(result) => {
            if !result.converged {
                warn!(
                    "IRR bisection for the {} flow hit the iteration cap; \
                     returning bracket midpoint {:.6}",
                    label, result.monthly_rate
                );
            }
            (result.monthly_rate, result.converged)
        }
        None => {
            warn!("IRR undefined for the {} flow (no sign change); reporting 0", label);
            (0.0, false)
        }
    }
}
