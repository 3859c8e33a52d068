//! Error types for the calendar subsystem.

use thiserror::Error;

/// Errors that can occur in calendar operations.
///
/// Rule decoding and timezone resolution never produce errors; both
/// degrade to documented fallbacks so one bad record cannot break a
/// calendar render.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("All-day event '{0}' cannot be rescheduled by dragging")]
    AllDayImmovable(String),

    #[error("Store error: {0}")]
    Store(String),
}

/// Result type alias for calendar operations.
pub type CalendarResult<T> = Result<T, CalendarError>;
