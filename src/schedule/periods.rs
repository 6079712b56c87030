//! Payment schedule output structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::state::Phase;

/// A single monthly row of the payment schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentPeriod {
    /// Period index, 1-based
    pub period: u32,

    /// Phase this period falls in
    pub phase: Phase,

    /// Due date, when the loan carries a disbursement date
    pub due_date: Option<NaiveDate>,

    /// Outstanding balance at the start of the period
    pub opening_balance: f64,

    /// Interest accrued on the opening balance
    pub interest: f64,

    /// Scheduled payment, principal and interest only
    pub payment: f64,

    /// Principal amortized this period
    pub principal: f64,

    /// Outstanding balance at the end of the period
    pub closing_balance: f64,

    /// Life insurance on the outstanding balance
    pub balance_insurance: f64,

    /// Flat property insurance
    pub property_insurance: f64,

    /// Flat statement fee
    pub statement_fee: f64,

    /// Net cash flow for the period from the borrower's side; outflows
    /// are negative, total-grace periods are zero
    pub net_flow: f64,
}

impl PaymentPeriod {
    /// Create a new row with all amounts zeroed
    pub fn new(period: u32, phase: Phase) -> Self {
        Self {
            period,
            phase,
            due_date: None,
            opening_balance: 0.0,
            interest: 0.0,
            payment: 0.0,
            principal: 0.0,
            closing_balance: 0.0,
            balance_insurance: 0.0,
            property_insurance: 0.0,
            statement_fee: 0.0,
            net_flow: 0.0,
        }
    }

    /// Sum of all ancillary charges for the period
    pub fn total_charges(&self) -> f64 {
        self.balance_insurance + self.property_insurance + self.statement_fee
    }
}

/// Complete generated schedule for one loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// Credit identifier the schedule belongs to
    pub loan_id: u32,

    /// Monthly rows, ordered by period index
    pub periods: Vec<PaymentPeriod>,
}

impl ScheduleResult {
    pub fn new(loan_id: u32) -> Self {
        Self {
            loan_id,
            periods: Vec::new(),
        }
    }

    /// Append a schedule row
    pub fn add_period(&mut self, period: PaymentPeriod) {
        self.periods.push(period);
    }

    /// Get summary statistics
    pub fn summary(&self) -> ScheduleSummary {
        let total_interest: f64 = self.periods.iter().map(|p| p.interest).sum();
        let total_principal: f64 = self.periods.iter().map(|p| p.principal).sum();
        let total_charges: f64 = self.periods.iter().map(|p| p.total_charges()).sum();
        let total_paid: f64 = self
            .periods
            .iter()
            .map(|p| p.payment + p.total_charges())
            .sum();

        let final_balance = self.periods.last().map(|p| p.closing_balance).unwrap_or(0.0);

        ScheduleSummary {
            total_periods: self.periods.len() as u32,
            total_interest,
            total_principal,
            total_charges,
            total_paid,
            final_balance,
        }
    }
}

/// Summary statistics for a schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total_periods: u32,
    pub total_interest: f64,
    pub total_principal: f64,
    pub total_charges: f64,
    pub total_paid: f64,
    pub final_balance: f64,
}
