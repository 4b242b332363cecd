//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Every variant belongs to one [`ErrorKind`] so callers can tell "fix your
//! input" apart from "this is already done" without string matching.

use thiserror::Error;

/// The broad family an [`EngineError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied malformed or out-of-range input.
    Validation,
    /// The entity is in a state that does not allow the operation.
    StateConflict,
    /// A referenced entity does not exist.
    NotFound,
    /// Storage or configuration failed underneath the operation.
    Infrastructure,
}

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::{EngineError, ErrorKind};
///
/// let error = EngineError::Validation {
///     field: "end_date".to_string(),
///     message: "must be after start_date".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid field 'end_date': must be after start_date");
/// assert_eq!(error.kind(), ErrorKind::Validation);
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A request field failed validation. No state was changed.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The offending field.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// The requested transition is not legal from the entity's current state.
    #[error("Cannot {action} {entity} '{id}' in state '{state}'")]
    InvalidTransition {
        /// The kind of entity ("period", "settlement").
        entity: &'static str,
        /// The entity id.
        id: String,
        /// The state the entity is currently in.
        state: String,
        /// The attempted action.
        action: &'static str,
    },

    /// The entity reached a terminal state and accepts no further mutation.
    #[error("{entity} '{id}' is {state} and can no longer be modified")]
    TerminalState {
        /// The kind of entity.
        entity: &'static str,
        /// The entity id.
        id: String,
        /// The terminal state.
        state: String,
    },

    /// A concurrent writer or an existing record won the race.
    #[error("Conflict on {entity} '{id}': {message}")]
    Conflict {
        /// The kind of entity.
        entity: &'static str,
        /// The entity id.
        id: String,
        /// A description of the conflict.
        message: String,
    },

    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity.
        entity: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// The backing store failed. Any batch in flight was rolled back.
    #[error("Persistence failure: {message}")]
    Persistence {
        /// A description of the failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or holds invalid values.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the family this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Validation { .. } => ErrorKind::Validation,
            EngineError::InvalidTransition { .. }
            | EngineError::TerminalState { .. }
            | EngineError::Conflict { .. } => ErrorKind::StateConflict,
            EngineError::NotFound { .. } => ErrorKind::NotFound,
            EngineError::Persistence { .. }
            | EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. } => ErrorKind::Infrastructure,
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
