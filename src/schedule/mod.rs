//! Payment schedule generation
//!
//! The three-phase state machine (total grace, partial grace, regular
//! amortization) lives in `state`, the output rows in `periods`, and
//! the generator itself in `engine`.

pub mod engine;
pub mod periods;
pub mod state;

pub use engine::ScheduleEngine;
pub use periods::{PaymentPeriod, ScheduleResult, ScheduleSummary};
pub use state::{Phase, ScheduleState};
