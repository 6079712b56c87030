//! Core schedule generator for monthly loan repayment plans

use crate::error::EngineError;
use crate::loan::{AncillaryCharges, LoanTerms};

use super::periods::{PaymentPeriod, ScheduleResult};
use super::state::{Phase, ScheduleState};

/// Main schedule generator
///
/// Holds the ancillary charge profile applied from the partial-grace
/// phase onward; the all-zero profile produces a bare
/// principal-and-interest plan.
#[derive(Debug, Clone)]
pub struct ScheduleEngine {
    charges: AncillaryCharges,
}

impl ScheduleEngine {
    /// Create an engine with the given charge profile
    pub fn new(charges: AncillaryCharges) -> Self {
        Self { charges }
    }

    /// Create an engine with no ancillary charges
    pub fn without_charges() -> Self {
        Self::new(AncillaryCharges::none())
    }

    /// Generate the full schedule, normalizing the annual rate internally
    pub fn build(&self, terms: &LoanTerms) -> Result<ScheduleResult, EngineError> {
        terms.validate()?;
        self.build_with_rate(terms, terms.monthly_rate())
    }

    /// Generate the full schedule from a pre-normalized effective monthly rate
    pub fn build_with_rate(
        &self,
        terms: &LoanTerms,
        monthly_rate: f64,
    ) -> Result<ScheduleResult, EngineError> {
        terms.validate()?;

        let mut result = ScheduleResult::new(terms.loan_id);
        let mut state = ScheduleState::from_terms(terms);

        // The constant payment is sized on the balance the grace phases
        // leave behind, over exactly the remaining period count.
        let mut constant_payment: Option<f64> = None;

        for _ in 0..terms.term_months {
            state.advance_period(terms);

            let mut row = match state.phase {
                Phase::TotalGrace => self.total_grace_period(&mut state, monthly_rate),
                Phase::PartialGrace => self.partial_grace_period(&mut state, monthly_rate),
                Phase::Amortizing => {
                    let payment = *constant_payment.get_or_insert_with(|| {
                        constant_payment_for(state.balance, monthly_rate, terms.regular_periods())
                    });
                    let is_final = state.period == terms.term_months;
                    self.amortizing_period(&mut state, monthly_rate, payment, is_final)
                }
            };

            row.due_date = terms.due_date(row.period);
            result.add_period(row);
        }

        Ok(result)
    }

    /// Total grace: nothing is collected, interest capitalizes into the
    /// balance, no charges accrue
    fn total_grace_period(&self, state: &mut ScheduleState, monthly_rate: f64) -> PaymentPeriod {
        let mut row = PaymentPeriod::new(state.period, state.phase);
        row.opening_balance = state.balance;
        row.interest = state.balance * monthly_rate;
        row.closing_balance = state.balance + row.interest;

        state.balance = row.closing_balance;
        row
    }

    /// Partial grace: interest (plus charges) is billed and paid, the
    /// balance is unchanged at period end
    fn partial_grace_period(&self, state: &mut ScheduleState, monthly_rate: f64) -> PaymentPeriod {
        let mut row = PaymentPeriod::new(state.period, state.phase);
        row.opening_balance = state.balance;
        row.interest = state.balance * monthly_rate;
        row.payment = row.interest;
        row.closing_balance = state.balance;

        self.apply_charges(&mut row);
        row.net_flow = -(row.payment + row.total_charges());
        row
    }

    /// Regular amortization: the constant payment splits into interest on
    /// the opening balance and principal. The final period's principal is
    /// forced to the exact remaining balance so the loan closes at zero.
    fn amortizing_period(
        &self,
        state: &mut ScheduleState,
        monthly_rate: f64,
        constant_payment: f64,
        is_final: bool,
    ) -> PaymentPeriod {
        let mut row = PaymentPeriod::new(state.period, state.phase);
        row.opening_balance = state.balance;
        row.interest = state.balance * monthly_rate;

        if is_final {
            row.principal = state.balance;
            row.payment = row.principal + row.interest;
            row.closing_balance = 0.0;
        } else {
            row.payment = constant_payment;
            row.principal = constant_payment - row.interest;
            row.closing_balance = state.balance - row.principal;
        }

        self.apply_charges(&mut row);
        row.net_flow = -(row.payment + row.total_charges());

        state.balance = row.closing_balance;
        row
    }

    fn apply_charges(&self, row: &mut PaymentPeriod) {
        row.balance_insurance = row.opening_balance * self.charges.balance_insurance_rate;
        row.property_insurance = self.charges.property_insurance;
        row.statement_fee = self.charges.statement_fee;
    }
}

impl Default for ScheduleEngine {
    fn default() -> Self {
        Self::without_charges()
    }
}

/// Standard fixed-installment payment: `balance * i / (1 - (1+i)^-n)`.
/// A zero rate reduces to straight-line principal.
fn constant_payment_for(balance: f64, monthly_rate: f64, periods: u32) -> f64 {
    if monthly_rate.abs() < 1e-10 {
        return balance / periods as f64;
    }

    balance * monthly_rate / (1.0 - (1.0 + monthly_rate).powi(-(periods as i32)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::{Compounding, RateType};
    use chrono::NaiveDate;

    const EPS: f64 = 1e-6;

    fn assert_schedule_consistent(result: &ScheduleResult) {
        for pair in result.periods.windows(2) {
            assert!(
                (pair[0].closing_balance - pair[1].opening_balance).abs() < EPS,
                "closing balance of period {} does not carry into period {}",
                pair[0].period,
                pair[1].period
            );
        }
        assert_eq!(result.periods.last().unwrap().closing_balance, 0.0);
    }

    #[test]
    fn test_no_grace_effective_rate() {
        // 100k over 12 months at 12% effective annual:
        // monthly rate 0.9489%, constant payment 8,856.21
        let terms = LoanTerms::new(
            1, 100_000.0, 12, 12.0, RateType::Effective, Compounding::Monthly,
        );
        let result = ScheduleEngine::without_charges().build(&terms).unwrap();

        assert_eq!(result.periods.len(), 12);
        assert!((terms.monthly_rate() - 0.009488792934583).abs() < 1e-12);

        for row in &result.periods[..11] {
            assert!((row.payment - 8856.21).abs() < 0.01);
            assert_eq!(row.phase, Phase::Amortizing);
        }

        assert_schedule_consistent(&result);
        let total_principal: f64 = result.periods.iter().map(|p| p.principal).sum();
        assert!((total_principal - 100_000.0).abs() < EPS);
    }

    #[test]
    fn test_no_grace_nominal_rate() {
        // 12% nominal compounded monthly is exactly 1% per month; the
        // classic 12-month payment on 100k is 8,884.88
        let terms = LoanTerms::new(
            2, 100_000.0, 12, 12.0, RateType::Nominal, Compounding::Monthly,
        );
        let result = ScheduleEngine::without_charges().build(&terms).unwrap();

        assert!((result.periods[0].payment - 8884.88).abs() < 0.01);
        assert_schedule_consistent(&result);
    }

    #[test]
    fn test_total_grace_capitalizes_interest() {
        // 100k, 6 months, 2 of total grace, 1% monthly: the balance grows
        // to 102,010 before amortization starts
        let terms = LoanTerms::with_grace(
            3, 100_000.0, 6, 12.0, RateType::Nominal, Compounding::Monthly, 2, 0,
        );
        let result = ScheduleEngine::without_charges().build(&terms).unwrap();

        let p1 = &result.periods[0];
        assert_eq!(p1.phase, Phase::TotalGrace);
        assert_eq!(p1.payment, 0.0);
        assert_eq!(p1.net_flow, 0.0);
        assert_eq!(p1.total_charges(), 0.0);
        assert!((p1.closing_balance - 101_000.0).abs() < EPS);
        assert!(p1.closing_balance > p1.opening_balance);

        let p2 = &result.periods[1];
        assert!((p2.closing_balance - 102_010.0).abs() < EPS);

        // Constant payment amortizes the grown balance over 4 periods
        let p3 = &result.periods[2];
        assert_eq!(p3.phase, Phase::Amortizing);
        assert!((p3.payment - 26_143.23).abs() < 0.01);

        assert_schedule_consistent(&result);
        let total_principal: f64 = result.periods.iter().map(|p| p.principal).sum();
        assert!((total_principal - 102_010.0).abs() < EPS);
    }

    #[test]
    fn test_partial_grace_holds_balance() {
        let terms = LoanTerms::with_grace(
            4, 100_000.0, 12, 12.0, RateType::Nominal, Compounding::Monthly, 0, 3,
        );
        let charges = AncillaryCharges::standard(120_000.0);
        let result = ScheduleEngine::new(charges).build(&terms).unwrap();

        for row in &result.periods[..3] {
            assert_eq!(row.phase, Phase::PartialGrace);
            assert_eq!(row.principal, 0.0);
            assert!((row.closing_balance - row.opening_balance).abs() < EPS);
            assert!((row.payment - row.interest).abs() < EPS);
            // Cash flow is interest plus charges only
            let expected = -(row.interest + row.total_charges());
            assert!((row.net_flow - expected).abs() < EPS);
            assert!((row.balance_insurance - 100_000.0 * 0.00035).abs() < EPS);
            assert!((row.property_insurance - 30.0).abs() < EPS);
            assert!((row.statement_fee - 5.0).abs() < EPS);
        }

        assert_schedule_consistent(&result);
    }

    #[test]
    fn test_zero_rate_straight_line() {
        let terms = LoanTerms::new(
            5, 12_000.0, 12, 0.0, RateType::Effective, Compounding::Monthly,
        );
        let result = ScheduleEngine::without_charges().build(&terms).unwrap();

        for (i, row) in result.periods.iter().enumerate() {
            assert_eq!(row.interest, 0.0);
            assert!((row.principal - 1000.0).abs() < EPS);
            assert!((row.closing_balance - (12_000.0 - 1000.0 * (i as f64 + 1.0))).abs() < EPS);
        }
        assert_schedule_consistent(&result);
    }

    #[test]
    fn test_final_period_forced_to_zero() {
        // Long odd-rate schedule; drift must never leave a residual
        let terms = LoanTerms::new(
            6, 123_456.78, 240, 7.37, RateType::Effective, Compounding::Monthly,
        );
        let result = ScheduleEngine::without_charges().build(&terms).unwrap();

        let last = result.periods.last().unwrap();
        assert_eq!(last.closing_balance, 0.0);
        assert!((last.principal - last.opening_balance).abs() < EPS);

        let total_principal: f64 = result.periods.iter().map(|p| p.principal).sum();
        assert!((total_principal - 123_456.78).abs() < EPS);
    }

    #[test]
    fn test_invalid_grace_rejected_before_generation() {
        let terms = LoanTerms::with_grace(
            7, 100_000.0, 12, 12.0, RateType::Effective, Compounding::Monthly, 8, 4,
        );
        let err = ScheduleEngine::without_charges().build(&terms).unwrap_err();
        assert!(matches!(err, EngineError::InvalidGraceConfig { .. }));
    }

    #[test]
    fn test_due_dates_stamped() {
        let mut terms = LoanTerms::new(
            8, 100_000.0, 12, 12.0, RateType::Effective, Compounding::Monthly,
        );
        terms.disbursement_date = NaiveDate::from_ymd_opt(2024, 1, 15);
        let result = ScheduleEngine::without_charges().build(&terms).unwrap();

        assert_eq!(result.periods[0].due_date, NaiveDate::from_ymd_opt(2024, 2, 15));
        assert_eq!(result.periods[11].due_date, NaiveDate::from_ymd_opt(2025, 1, 15));
    }

    #[test]
    fn test_charge_free_schedule_matches_charged_principal_flow() {
        // Charges overlay must not perturb the principal/interest columns
        let terms = LoanTerms::with_grace(
            9, 80_000.0, 24, 9.0, RateType::Effective, Compounding::Monthly, 1, 2,
        );
        let bare = ScheduleEngine::without_charges().build(&terms).unwrap();
        let charged = ScheduleEngine::new(AncillaryCharges::standard(100_000.0))
            .build(&terms)
            .unwrap();

        for (b, c) in bare.periods.iter().zip(charged.periods.iter()) {
            assert_eq!(b.payment, c.payment);
            assert_eq!(b.principal, c.principal);
            assert_eq!(b.closing_balance, c.closing_balance);
        }
    }

    #[test]
    fn test_summary_totals() {
        let terms = LoanTerms::new(
            10, 12_000.0, 12, 0.0, RateType::Effective, Compounding::Monthly,
        );
        let result = ScheduleEngine::without_charges().build(&terms).unwrap();
        let summary = result.summary();

        assert_eq!(summary.total_periods, 12);
        assert_eq!(summary.total_interest, 0.0);
        assert!((summary.total_principal - 12_000.0).abs() < EPS);
        assert!((summary.total_paid - 12_000.0).abs() < EPS);
        assert_eq!(summary.final_balance, 0.0);
    }
}
