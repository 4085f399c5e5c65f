//! Unified error types for the crate.
//!
//! Every fallible operation returns [`Result`]. The API layer maps these
//! variants onto HTTP statuses and `{ error, description }` JSON bodies;
//! the core never swallows a failure silently.

use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// Request carried no valid session identity
    #[error("The user does not have an active session or is not authenticated")]
    NotAuthenticated,

    /// The session user lacks the role required for the operation
    #[error("Operation requires the {required} role")]
    Forbidden {
        /// Role the operation requires
        required: String,
    },

    /// Referenced profile does not exist (or is deactivated)
    #[error("Profile not found: {id}")]
    ProfileNotFound {
        /// Profile id that failed to resolve
        id: String,
    },

    /// Referenced record row does not exist
    #[error("{kind} not found: {id}")]
    RecordNotFound {
        /// Record kind name ("meeting", "offer", "sale", "booking", "service")
        kind: &'static str,
        /// Row id that failed to resolve
        id: i64,
    },

    /// Level-up requested while the gating thresholds are unmet
    #[error("Level-up requirements not met at level {level}")]
    LevelUpNotEligible {
        /// The profile's current level at validation time
        level: i32,
    },

    /// Quantity or amount outside its valid range
    #[error("Invalid amount: {message}")]
    InvalidAmount {
        /// What was wrong with the value
        message: String,
    },

    /// Malformed input that is not an amount (empty name, bad goal, ...)
    #[error("Validation error: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// Configuration problem (missing/unparseable settings)
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Underlying database failure; the enclosing transaction rolls back
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure (config file reads, socket binding)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
