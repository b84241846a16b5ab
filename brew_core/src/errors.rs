//! # Error Types
//!
//! Structured error types for brew_core. Every variant carries enough context
//! for a caller (a form layer, an API, an LLM) to explain the problem to the
//! brewer without re-deriving it.
//!
//! ## Example
//!
//! ```rust
//! use brew_core::errors::{BrewError, BrewResult};
//!
//! fn validate_boil_time(minutes: u32) -> BrewResult<()> {
//!     if minutes > 600 {
//!         return Err(BrewError::invalid_input(
//!             "boil_time",
//!             minutes.to_string(),
//!             "Boil time exceeds ten hours",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_boil_time(60).is_ok());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for brew_core operations
pub type BrewResult<T> = Result<T, BrewError>;

/// Structured error type for calculation and stage operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum BrewError {
    /// Arithmetic or conversion across incompatible quantity families
    #[error("Unit family mismatch: cannot combine {from} with {to}")]
    UnitFamilyMismatch { from: String, to: String },

    /// A unit name that is not in the alias table
    #[error("Unknown unit: '{unit}'")]
    UnknownUnit { unit: String },

    /// A formula input outside the formula's domain
    #[error("Invalid gravity for {formula}: {gravity} - {reason}")]
    InvalidGravityRange {
        formula: String,
        gravity: f64,
        reason: String,
    },

    /// An input value is invalid (out of range, negative volume, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Stage validation failed; lists every missing field at once
    #[error("Missing required fields for stage {stage}: {}", fields.join(", "))]
    MissingRequiredFields { stage: String, fields: Vec<String> },

    /// A stage transition that the state machine does not allow
    #[error("Cannot {action} from stage {from}: {reason}")]
    InvalidTransition {
        from: String,
        action: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// File I/O error
    #[error("File error during {operation} on '{path}': {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Brewery file is being edited by someone else
    #[error("File '{path}' is locked by {holder} since {since}")]
    FileLocked {
        path: String,
        holder: String,
        since: String,
    },

    /// Brewery file written by an incompatible schema version
    #[error("Schema version {file_version} is not compatible with {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl BrewError {
    /// Create a UnitFamilyMismatch error
    pub fn unit_family_mismatch(from: impl Into<String>, to: impl Into<String>) -> Self {
        BrewError::UnitFamilyMismatch {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create an UnknownUnit error
    pub fn unknown_unit(unit: impl Into<String>) -> Self {
        BrewError::UnknownUnit { unit: unit.into() }
    }

    /// Create an InvalidGravityRange error
    pub fn invalid_gravity(formula: impl Into<String>, gravity: f64, reason: impl Into<String>) -> Self {
        BrewError::InvalidGravityRange {
            formula: formula.into(),
            gravity,
            reason: reason.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        BrewError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingRequiredFields error
    pub fn missing_fields<I, S>(stage: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BrewError::MissingRequiredFields {
            stage: stage.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Create an InvalidTransition error
    pub fn invalid_transition(from: impl Into<String>, action: impl Into<String>, reason: impl Into<String>) -> Self {
        BrewError::InvalidTransition {
            from: from.into(),
            action: action.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        BrewError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, holder: impl Into<String>, since: impl Into<String>) -> Self {
        BrewError::FileLocked {
            path: path.into(),
            holder: holder.into(),
            since: since.into(),
        }
    }

    /// Errors the brewer can fix by supplying data or picking another action
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BrewError::MissingRequiredFields { .. }
                | BrewError::InvalidTransition { .. }
                | BrewError::FileLocked { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            BrewError::UnitFamilyMismatch { .. } => "UNIT_FAMILY_MISMATCH",
            BrewError::UnknownUnit { .. } => "UNKNOWN_UNIT",
            BrewError::InvalidGravityRange { .. } => "INVALID_GRAVITY_RANGE",
            BrewError::InvalidInput { .. } => "INVALID_INPUT",
            BrewError::MissingRequiredFields { .. } => "MISSING_REQUIRED_FIELD",
            BrewError::InvalidTransition { .. } => "INVALID_TRANSITION",
            BrewError::SerializationError { .. } => "SERIALIZATION_ERROR",
            BrewError::FileError { .. } => "FILE_ERROR",
            BrewError::FileLocked { .. } => "FILE_LOCKED",
            BrewError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for BrewError {
    fn from(err: serde_json::Error) -> Self {
        BrewError::SerializationError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = BrewError::invalid_gravity("abv", 1.8, "original gravity must be below 1.775");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("InvalidGravityRange"));
        let roundtrip: BrewError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(BrewError::unknown_unit("furlong").error_code(), "UNKNOWN_UNIT");
        assert_eq!(
            BrewError::unit_family_mismatch("kg", "l").error_code(),
            "UNIT_FAMILY_MISMATCH"
        );
    }

    #[test]
    fn test_missing_fields_message_lists_everything() {
        let error = BrewError::missing_fields("BOIL", ["name", "gravity_before_boil"]);
        assert_eq!(
            error.to_string(),
            "Missing required fields for stage BOIL: name, gravity_before_boil"
        );
        assert!(error.is_recoverable());
        assert!(!BrewError::unknown_unit("x").is_recoverable());
    }

    #[test]
    fn test_file_errors() {
        let locked = BrewError::file_locked("cellar.brew", "ana (taproom)", "2024-03-09T10:00:00Z");
        assert_eq!(locked.error_code(), "FILE_LOCKED");
        assert!(locked.is_recoverable());

        let io = BrewError::file_error("open", "cellar.brew", "not found");
        assert_eq!(io.error_code(), "FILE_ERROR");
        assert!(io.to_string().contains("open"));
    }
}
