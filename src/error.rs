//! Error types for the HR engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while computing leave balances,
//! payroll totals and attendance aggregates, or while loading configuration.

use thiserror::Error;

/// The main error type for the HR engine.
///
/// Domain failures terminate the current request; the HTTP layer maps
/// them onto status codes and passes the message through verbatim.
///
/// # Example
///
/// ```
/// use hr_engine::error::EngineError;
///
/// let error = EngineError::NotFound {
///     entity: "Employee".to_string(),
///     id: 42,
/// };
/// assert_eq!(error.to_string(), "Employee not found");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
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

    /// A referenced employee or record does not exist.
    #[error("{entity} not found")]
    NotFound {
        /// Human-readable name of the missing entity (e.g. "Leave request").
        entity: String,
        /// The identifier that was looked up.
        id: u64,
    },

    /// The requested transition is not allowed from the record's current state.
    #[error("{message}")]
    InvalidState {
        /// A description of why the transition was rejected.
        message: String,
    },

    /// A unique field value is already taken by another record.
    #[error("{entity} with {field} '{value}' already exists")]
    DuplicateConflict {
        /// The kind of entity (e.g. "Department").
        entity: String,
        /// The unique field (e.g. "name").
        field: String,
        /// The conflicting value.
        value: String,
    },

    /// A record or query contained invalid data.
    #[error("Invalid field '{field}': {message}")]
    InvalidRecord {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A free-text value could not be parsed.
    #[error("Failed to parse '{input}': {message}")]
    ParseFailure {
        /// The text that failed to parse.
        input: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::NotFound`] error.
    pub fn not_found(entity: &str, id: u64) -> Self {
        EngineError::NotFound {
            entity: entity.to_string(),
            id,
        }
    }

    /// Shorthand for an [`EngineError::InvalidState`] error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        EngineError::InvalidState {
            message: message.into(),
        }
    }

    /// Shorthand for a [`EngineError::DuplicateConflict`] error.
    pub fn duplicate(entity: &str, field: &str, value: impl Into<String>) -> Self {
        EngineError::DuplicateConflict {
            entity: entity.to_string(),
            field: field.to_string(),
            value: value.into(),
        }
    }

    /// Shorthand for an [`EngineError::InvalidRecord`] error.
    pub fn invalid_record(field: &str, message: impl Into<String>) -> Self {
        EngineError::InvalidRecord {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
