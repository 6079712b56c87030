//! Net present value and cash-flow vector construction
//!
//! Both indicator rates work over a monthly cash-flow vector where
//! index 0 is the disbursement received by the borrower (positive) and
//! index t is period t's flow (negative outflows). Two vectors exist:
//! the full-cost vector includes every ancillary charge, the
//! principal-and-interest vector is the "pure cost of money" view.

use crate::schedule::PaymentPeriod;

/// Discount a monthly cash-flow vector at the given effective monthly
/// rate. Index 0 is time zero and is not discounted.
pub fn npv(cashflows: &[f64], monthly_rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + monthly_rate).powi(t as i32))
        .sum()
}

/// Cash-flow vector including every borrower outflow: payment plus all
/// ancillary charges. Total-grace periods contribute zero.
pub fn full_cost_vector(principal: f64, periods: &[PaymentPeriod]) -> Vec<f64> {
    let mut flows = Vec::with_capacity(periods.len() + 1);
    flows.push(principal);
    flows.extend(periods.iter().map(|p| p.net_flow));
    flows
}

/// Cash-flow vector restricted to principal-and-interest payments,
/// excluding ancillary charges.
pub fn principal_interest_vector(principal: f64, periods: &[PaymentPeriod]) -> Vec<f64> {
    let mut flows = Vec::with_capacity(periods.len() + 1);
    flows.push(principal);
    flows.extend(periods.iter().map(|p| -p.payment));
    flows
}
