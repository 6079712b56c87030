//! Loan data structures matching the persisted credit-entity format

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::rates;

/// Currency the credit is denominated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    /// Peruvian sol
    PEN,
    /// US dollar
    USD,
}

impl Currency {
    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::PEN => "PEN",
            Currency::USD => "USD",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::PEN
    }
}

/// How the annual interest rate is quoted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateType {
    /// Effective annual rate
    Effective,
    /// Nominal annual rate under a compounding convention
    Nominal,
}

/// Compounding frequency for nominal rates
///
/// Meaningful only when the rate type is `Nominal`; effective rates
/// ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compounding {
    Monthly,
    Quarterly,
    Semiannual,
    Annual,
}

impl Compounding {
    /// Number of compounding periods per year
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Compounding::Monthly => 12,
            Compounding::Quarterly => 4,
            Compounding::Semiannual => 2,
            Compounding::Annual => 1,
        }
    }
}

fn default_compounding() -> Compounding {
    Compounding::Monthly
}

/// Terms of a single credit, as sourced from the persisted credit entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Unique credit identifier
    pub loan_id: u32,

    /// Currency tag, carried through to outputs as plain data
    #[serde(default)]
    pub currency: Currency,

    /// Disbursed principal
    pub principal: f64,

    /// Term in whole months
    pub term_months: u32,

    /// Annual interest rate, percent (e.g. 7.5 for 7.5%)
    pub annual_rate_pct: f64,

    /// Whether the annual rate is effective or nominal
    pub rate_type: RateType,

    /// Compounding convention for nominal rates
    #[serde(default = "default_compounding")]
    pub compounding: Compounding,

    /// Months of total grace (nothing collected, interest capitalizes)
    #[serde(default)]
    pub total_grace_months: u32,

    /// Months of partial grace (interest-only)
    #[serde(default)]
    pub partial_grace_months: u32,

    /// Disbursement date; when present, each period is stamped with a
    /// due date offset by its index in months
    #[serde(default)]
    pub disbursement_date: Option<NaiveDate>,
}

impl LoanTerms {
    /// Create loan terms with no grace periods
    pub fn new(
        loan_id: u32,
        principal: f64,
        term_months: u32,
        annual_rate_pct: f64,
        rate_type: RateType,
        compounding: Compounding,
    ) -> Self {
        Self::with_grace(
            loan_id, principal, term_months, annual_rate_pct, rate_type, compounding, 0, 0,
        )
    }

    /// Create loan terms with grace periods specified
    pub fn with_grace(
        loan_id: u32,
        principal: f64,
        term_months: u32,
        annual_rate_pct: f64,
        rate_type: RateType,
        compounding: Compounding,
        total_grace_months: u32,
        partial_grace_months: u32,
    ) -> Self {
        Self {
            loan_id,
            currency: Currency::default(),
            principal,
            term_months,
            annual_rate_pct,
            rate_type,
            compounding,
            total_grace_months,
            partial_grace_months,
            disbursement_date: None,
        }
    }

    /// Validate the terms before any computation
    ///
    /// Grace periods consuming the entire term are reported as their own
    /// error kind, distinct from generic input errors.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.principal > 0.0) {
            return Err(EngineError::InvalidPrincipal(self.principal));
        }
        if self.term_months == 0 {
            return Err(EngineError::InvalidTerm(self.term_months));
        }
        if self.annual_rate_pct < 0.0 {
            return Err(EngineError::InvalidRate(self.annual_rate_pct));
        }
        if self.total_grace_months + self.partial_grace_months >= self.term_months {
            return Err(EngineError::InvalidGraceConfig {
                total: self.total_grace_months,
                partial: self.partial_grace_months,
                term: self.term_months,
            });
        }
        Ok(())
    }

    /// Effective monthly rate for these terms
    pub fn monthly_rate(&self) -> f64 {
        rates::monthly_effective_rate(self.annual_rate_pct, self.rate_type, self.compounding)
    }

    /// Total months covered by either grace phase
    pub fn grace_months(&self) -> u32 {
        self.total_grace_months + self.partial_grace_months
    }

    /// Number of regular amortizing periods after both grace phases
    pub fn regular_periods(&self) -> u32 {
        self.term_months - self.grace_months()
    }

    /// Due date for a 1-based period index, when a disbursement date is set
    pub fn due_date(&self, period: u32) -> Option<NaiveDate> {
        self.disbursement_date
            .and_then(|d| d.checked_add_months(Months::new(period)))
    }
}

/// Monthly ancillary charges overlaid on the payment schedule
///
/// All three components default to zero; the all-zero profile produces
/// a bare principal-and-interest plan.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AncillaryCharges {
    /// Life insurance rate applied to the outstanding balance each month
    /// (decimal fraction, e.g. 0.00035 for 0.035%)
    pub balance_insurance_rate: f64,

    /// Flat monthly property insurance amount
    pub property_insurance: f64,

    /// Flat monthly statement fee
    pub statement_fee: f64,
}

impl AncillaryCharges {
    /// Standard life insurance rate on the outstanding balance: 0.035% monthly
    pub const STANDARD_BALANCE_INSURANCE_RATE: f64 = 0.035 / 100.0;

    /// Standard property insurance: 0.3% annual on the property value
    pub const STANDARD_PROPERTY_INSURANCE_ANNUAL_PCT: f64 = 0.3;

    /// Standard flat statement fee per month
    pub const STANDARD_STATEMENT_FEE: f64 = 5.0;

    /// No charges at all
    pub fn none() -> Self {
        Self::default()
    }

    /// The standard charge profile, with property insurance derived
    /// from the insured property's value
    pub fn standard(property_value: f64) -> Self {
        Self {
            balance_insurance_rate: Self::STANDARD_BALANCE_INSURANCE_RATE,
            property_insurance: (Self::STANDARD_PROPERTY_INSURANCE_ANNUAL_PCT / 100.0)
                * property_value
                / 12.0,
            statement_fee: Self::STANDARD_STATEMENT_FEE,
        }
    }
}
