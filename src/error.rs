use chrono::Weekday;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalendarError {
    #[error("invalid workdays: {first_workday} + {workdays_in_week}")]
    InvalidWorkdays {
        first_workday: Weekday,
        workdays_in_week: i32,
    },
    /// Work offsets are kept in their `HH:MM[:SS]` rendering.
    #[error("invalid work datetime: {work_begins} - {work_ends}")]
    InvalidWorkTime {
        work_begins: String,
        work_ends: String,
    },
    #[error("invalid time format: {format:?}")]
    InvalidTimeFormat { format: String },
    #[error("invalid submit datetime: {submitted}, must be {valid_from} - {valid_to}")]
    InvalidSubmitTime {
        submitted: String,
        valid_from: String,
        valid_to: String,
    },
    #[error("invalid turnaround: {hours} hours")]
    InvalidTurnaround { hours: f64 },
    #[error("due date {due} is past the work end {work_ends}")]
    WorkWindowOverrun { due: String, work_ends: String },
    #[error("due date is outside the supported date range")]
    OutOfRange,
}

impl CalendarError {
    /// True for the errors raised while building a schedule, as opposed to
    /// the per-call errors of a due-date calculation.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CalendarError::InvalidWorkdays { .. }
                | CalendarError::InvalidWorkTime { .. }
                | CalendarError::InvalidTimeFormat { .. }
        )
    }
}

pub type CalendarResult<T> = Result<T, CalendarError>;
