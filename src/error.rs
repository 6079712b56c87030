//! Error types for the credit simulation engine

use thiserror::Error;

/// Validation errors raised before any schedule computation begins
///
/// `InvalidGraceConfig` is deliberately its own variant: callers route it
/// to form-level feedback on the grace fields, while the remaining
/// variants map to generic input errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Grace periods consume the whole term; at least one amortizing
    /// period must remain
    #[error("invalid grace configuration: {total} total + {partial} partial grace months leave no amortizing periods in a {term}-month term")]
    InvalidGraceConfig { total: u32, partial: u32, term: u32 },

    /// Principal must be strictly positive
    #[error("invalid principal: {0} (must be positive)")]
    InvalidPrincipal(f64),

    /// Term must be at least one month
    #[error("invalid term: {0} months (must be at least 1)")]
    InvalidTerm(u32),

    /// Annual rate must be non-negative
    #[error("invalid rate: {0}% (must not be negative)")]
    InvalidRate(f64),
}
