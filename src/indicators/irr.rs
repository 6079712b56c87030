//! Internal Rate of Return via bisection
//!
//! Bisection is used instead of Newton-Raphson: the loan cash-flow
//! pattern (one positive disbursement followed by all-negative payments)
//! has exactly one sign change, so a bracketing search converges without
//! derivative evaluation, including on near-zero-rate and very
//! short-term inputs.

use super::npv::npv;

/// Lower bracket for the monthly rate search (-99%)
pub const IRR_BRACKET_LOW: f64 = -0.99;

/// Upper bracket for the monthly rate search (+1000%)
pub const IRR_BRACKET_HIGH: f64 = 10.0;

/// NPV magnitude below which the root is considered closed
pub const IRR_TOLERANCE: f64 = 1e-4;

/// Hard cap on bisection iterations
pub const IRR_MAX_ITERATIONS: u32 = 100;

/// Result of an IRR search
#[derive(Debug, Clone, Copy)]
pub struct IrrResult {
    /// Effective monthly rate found; the final bracket midpoint when the
    /// search did not converge
    pub monthly_rate: f64,

    /// Whether the search met tolerance within the iteration cap.
    /// Callers must treat a non-converged rate as a best-effort estimate.
    pub converged: bool,

    /// Iterations consumed
    pub iterations: u32,
}

/// Find the effective monthly rate that zeroes the NPV of `cashflows`.
///
/// Returns `None` when no root can exist: an empty vector, or one whose
/// flows never change sign. An all-zero vector trivially yields a
/// converged zero rate.
pub fn monthly_irr(cashflows: &[f64]) -> Option<IrrResult> {
    if cashflows.is_empty() {
        return None;
    }

    if cashflows.iter().all(|&cf| cf.abs() < 1e-10) {
        return Some(IrrResult {
            monthly_rate: 0.0,
            converged: true,
            iterations: 0,
        });
    }

    let has_positive = cashflows.iter().any(|&cf| cf > 1e-10);
    let has_negative = cashflows.iter().any(|&cf| cf < -1e-10);
    if !has_positive || !has_negative {
        return None; // No sign change means no IRR
    }

    let mut low = IRR_BRACKET_LOW;
    let mut high = IRR_BRACKET_HIGH;

    // Root must lie inside the bracket
    if npv(cashflows, low) * npv(cashflows, high) > 0.0 {
        return None;
    }

    for iteration in 1..=IRR_MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = npv(cashflows, mid);

        if npv_mid.abs() < IRR_TOLERANCE {
            return Some(IrrResult {
                monthly_rate: mid,
                converged: true,
                iterations: iteration,
            });
        }

        if npv_mid * npv(cashflows, low) < 0.0 {
            high = mid;
        } else {
            low = mid;
        }
    }

    // Iteration budget exhausted; report the midpoint as a best-effort
    // estimate with the low-confidence marker set.
    Some(IrrResult {
        monthly_rate: (low + high) / 2.0,
        converged: false,
        iterations: IRR_MAX_ITERATIONS,
    })
}

/// Annualize an effective monthly rate: `(1 + i)^12 - 1`
pub fn annualize(monthly_rate: f64) -> f64 {
    (1.0 + monthly_rate).powi(12) - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_irr() {
        // 1000 lent out, 1100 back after 12 months: 10% effective annual
        let mut cashflows = vec![-1000.0];
        cashflows.extend(vec![0.0; 11]);
        cashflows.push(1100.0);

        let result = monthly_irr(&cashflows).unwrap();
        assert!(result.converged);

        let annual = annualize(result.monthly_rate);
        assert!((annual - 0.10).abs() < 0.001, "Expected ~10% annual, got {}", annual);
    }

    #[test]
    fn test_level_loan_flows() {
        // 100k disbursed, 12 payments of 8,884.88: exactly 1% monthly
        let mut cashflows = vec![100_000.0];
        cashflows.extend(vec![-8884.87886783416; 12]);

        let result = monthly_irr(&cashflows).unwrap();
        assert!(result.converged);
        assert!((result.monthly_rate - 0.01).abs() < 1e-6);
        assert!((annualize(result.monthly_rate) - 0.126825).abs() < 1e-4);
    }

    #[test]
    fn test_npv_at_irr_is_zero() {
        let mut cashflows = vec![100_000.0];
        cashflows.extend(vec![-8884.87886783416; 12]);

        let result = monthly_irr(&cashflows).unwrap();
        assert!(npv(&cashflows, result.monthly_rate).abs() < IRR_TOLERANCE);
    }

    #[test]
    fn test_degenerate_vectors() {
        assert!(monthly_irr(&[]).is_none());

        // No sign change
        assert!(monthly_irr(&[100.0, 50.0, 25.0]).is_none());
        assert!(monthly_irr(&[-100.0, -50.0]).is_none());

        // All zero
        let result = monthly_irr(&[0.0, 0.0, 0.0]).unwrap();
        assert_eq!(result.monthly_rate, 0.0);
        assert!(result.converged);
    }

    #[test]
    fn test_zero_rate_flows() {
        // Interest-free loan: IRR must land on zero
        let mut cashflows = vec![12_000.0];
        cashflows.extend(vec![-1000.0; 12]);

        let result = monthly_irr(&cashflows).unwrap();
        assert!(result.converged);
        assert!(result.monthly_rate.abs() < 1e-6);
    }
}
