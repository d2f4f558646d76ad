//! Error types for the work-time engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can reach a caller of the engine.

use chrono::NaiveDate;
use thiserror::Error;

use crate::store::StoreError;

/// The main error type for the work-time engine.
///
/// Pure computations (schedule resolution, daily summaries) never produce
/// these for malformed data; only mutating operations and identity lookups do.
///
/// # Example
///
/// ```
/// use worktime_engine::error::EngineError;
///
/// let error = EngineError::EmployeeNotFound {
///     employee_id: "emp_404".to_string(),
/// };
/// assert_eq!(error.to_string(), "Employee not found: emp_404");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// No employee exists with the given identifier.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The identifier that was looked up.
        employee_id: String,
    },

    /// Schedule data for an employee could not be interpreted.
    ///
    /// The resolver logs this and falls back to the default schedule; it is
    /// exposed so embedders can surface the same message elsewhere.
    #[error("Invalid schedule for employee '{employee_id}': {message}")]
    InvalidSchedule {
        /// The employee whose schedule is malformed.
        employee_id: String,
        /// A description of what was wrong.
        message: String,
    },

    /// Punch creation kept hitting lock conflicts until the retry budget ran out.
    #[error(
        "Transient conflict writing punch for employee '{employee_id}' on {date} after {attempts} attempts"
    )]
    TransientConflict {
        /// The employee the punch belongs to.
        employee_id: String,
        /// The calendar day of the punch.
        date: NaiveDate,
        /// How many attempts were made.
        attempts: u32,
    },

    /// The storage collaborator reported an error.
    #[error("Store error: {message}")]
    Store {
        /// The underlying store message.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An auto-close pass is already running in this process.
    #[error("Auto-close pass already in progress")]
    AutoCloseInProgress,
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { employee_id } => EngineError::EmployeeNotFound { employee_id },
            other => EngineError::Store {
                message: other.to_string(),
            },
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
