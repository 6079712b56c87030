//! Credit System - High-performance simulation engine for mortgage loans
//!
//! This library provides:
//! - Rate normalization across nominal/effective quoting conventions
//! - Payment schedule generation with total and partial grace phases
//! - Ancillary charge overlays (life/property insurance, statement fees)
//! - Financial indicators (NPV, IRR, annualized total-cost rates)
//! - Batch portfolio simulation

pub mod error;
pub mod indicators;
pub mod loan;
pub mod rates;
pub mod schedule;
pub mod simulation;

// Re-export commonly used types
pub use error::EngineError;
pub use indicators::{compute_indicators, FinancialIndicators};
pub use loan::{AncillaryCharges, Compounding, Currency, LoanTerms, RateType};
pub use schedule::{PaymentPeriod, Phase, ScheduleEngine, ScheduleResult};
pub use simulation::{Simulation, SimulationRunner};
