//! Error types for the attendance and pay engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while recording attendance or
//! computing pay.

use thiserror::Error;

/// The main error type for the attendance and pay engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
///
/// let error = EngineError::AlreadyCheckedIn {
///     worker_id: "worker_001".to_string(),
/// };
/// assert_eq!(error.to_string(), "Worker 'worker_001' is already checked in");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or contained invalid values.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A required input was missing or malformed.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The worker already has an open session.
    #[error("Worker '{worker_id}' is already checked in")]
    AlreadyCheckedIn {
        /// The worker that attempted to check in.
        worker_id: String,
    },

    /// The worker has no open session to close.
    #[error("Worker '{worker_id}' is not checked in")]
    NotCheckedIn {
        /// The worker that attempted to check out.
        worker_id: String,
    },

    /// A worker with the same ID is already registered.
    #[error("Worker '{worker_id}' already exists")]
    WorkerExists {
        /// The duplicate worker ID.
        worker_id: String,
    },

    /// No worker record exists for the given ID.
    #[error("Worker not found: {worker_id}")]
    WorkerNotFound {
        /// The worker ID that was not found.
        worker_id: String,
    },

    /// The caller's role does not permit the operation.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// A description of the missing permission.
        message: String,
    },

    /// Storage could not complete the transaction; nothing was written.
    #[error("Storage temporarily unavailable: {message}")]
    StorageUnavailable {
        /// A description of the storage failure.
        message: String,
    },
}

/// Broad classification of an [`EngineError`].
///
/// Callers use the kind to tell "you already did that" apart from
/// "try again".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed input. Do not retry.
    Validation,
    /// The request conflicts with the current state. Change intent, do not resubmit.
    Conflict,
    /// The referenced entity does not exist.
    NotFound,
    /// The caller lacks permission.
    Forbidden,
    /// Transient storage failure. The whole operation is safe to retry.
    Transient,
    /// Configuration could not be loaded.
    Config,
}

impl EngineError {
    /// Creates a validation error for the given field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the broad classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ErrorKind::Config
            }
            EngineError::Validation { .. } => ErrorKind::Validation,
            EngineError::AlreadyCheckedIn { .. }
            | EngineError::NotCheckedIn { .. }
            | EngineError::WorkerExists { .. } => ErrorKind::Conflict,
            EngineError::WorkerNotFound { .. } => ErrorKind::NotFound,
            EngineError::Forbidden { .. } => ErrorKind::Forbidden,
            EngineError::StorageUnavailable { .. } => ErrorKind::Transient,
        }
    }

    /// Returns true if the failed operation can be retried unchanged.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
