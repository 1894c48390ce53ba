use thiserror::Error;

/// Recurrence compilation and expansion errors
#[derive(Error, Debug)]
pub enum RecurrenceError {
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    #[error("Series has no count, end date or window and cannot be enumerated")]
    UnboundedSeries,

    #[error("Expansion exceeded the safety ceiling of {0} iterations")]
    IterationLimit(u64),

    #[error("RRule interop error: {0}")]
    RRuleError(#[from] rrule::RRuleError),

    #[error(transparent)]
    CoreError(#[from] cadence_core::error::CoreError),
}

pub type RecurrenceResult<T> = std::result::Result<T, RecurrenceError>;
