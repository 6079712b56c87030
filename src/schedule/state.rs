//! Phase state machine for schedule generation
//!
//! A schedule walks three sequential phases over one running balance:
//! total grace (interest capitalizes), partial grace (interest-only),
//! then regular constant-payment amortization. Zero-length phases
//! collapse to nothing.

use serde::{Deserialize, Serialize};

use crate::loan::LoanTerms;

/// Phase of the repayment schedule a period falls in
///
/// Serialized as the upstream payment-plan single-letter codes:
/// `T` total grace, `P` partial grace, `S` regular installment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Nothing is collected; interest accrues and capitalizes into the balance
    #[serde(rename = "T")]
    TotalGrace,
    /// Interest (plus charges) is paid; no principal is amortized
    #[serde(rename = "P")]
    PartialGrace,
    /// Constant-payment amortization
    #[serde(rename = "S")]
    Amortizing,
}

impl Phase {
    /// Phase for a 1-based period index under the given terms
    pub fn for_period(terms: &LoanTerms, period: u32) -> Self {
        if period <= terms.total_grace_months {
            Phase::TotalGrace
        } else if period <= terms.total_grace_months + terms.partial_grace_months {
            Phase::PartialGrace
        } else {
            Phase::Amortizing
        }
    }

    /// Single-letter code used in the upstream payment-plan records
    pub fn code(&self) -> &'static str {
        match self {
            Phase::TotalGrace => "T",
            Phase::PartialGrace => "P",
            Phase::Amortizing => "S",
        }
    }
}

/// Running state while generating a schedule
#[derive(Debug, Clone)]
pub struct ScheduleState {
    /// Current period (1-indexed; 0 before the first period)
    pub period: u32,

    /// Phase of the current period
    pub phase: Phase,

    /// Outstanding balance at the start of the current period
    pub balance: f64,
}

impl ScheduleState {
    /// Initialize state at the disbursement point
    pub fn from_terms(terms: &LoanTerms) -> Self {
        Self {
            period: 0,
            phase: Phase::for_period(terms, 1),
            balance: terms.principal,
        }
    }

    /// Advance to the next period
    pub fn advance_period(&mut self, terms: &LoanTerms) {
        self.period += 1;
        self.phase = Phase::for_period(terms, self.period);
    }
}
