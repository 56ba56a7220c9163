//! Error types for rehabtrack.
//!
//! This module defines all error types used throughout the rehabtrack crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for rehabtrack operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to write the registry document.
    #[error("failed to write registry at {path}: {source}")]
    StorageWrite {
        /// Path to the registry document.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Registry Errors ===
    /// A registration request was rejected.
    #[error("registration rejected: {0}")]
    Registration(#[from] RegistrationError),

    /// Unknown username or wrong password.
    #[error("incorrect username or password")]
    AuthenticationFailed,

    /// No account exists under the given username.
    #[error("no account named '{username}'")]
    AccountNotFound {
        /// The username that was looked up.
        username: String,
    },

    /// The account exists but is not a doctor.
    #[error("account '{username}' is not a doctor")]
    NotADoctor {
        /// The username that was looked up.
        username: String,
    },

    // === I/O Errors ===
    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Internal Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Reasons a registration request is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// The username was empty.
    #[error("username must not be empty")]
    EmptyUsername,

    /// The password was empty.
    #[error("password must not be empty")]
    EmptyPassword,

    /// The username is already registered.
    #[error("username '{0}' already exists")]
    UsernameTaken(String),

    /// No doctor is registered under the given doctor id.
    #[error("doctor id '{0}' not found")]
    UnknownDoctorId(String),

    /// Another doctor already uses this doctor id.
    #[error("doctor id '{0}' is already in use")]
    DoctorIdTaken(String),

    /// The patient's age is outside the accepted range.
    #[error("age {age} is outside the accepted range {min}-{max}")]
    AgeOutOfRange {
        /// The rejected age.
        age: u8,
        /// Lowest accepted age.
        min: u8,
        /// Highest accepted age.
        max: u8,
    },
}

/// A specialized Result type for rehabtrack operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an account-not-found error.
    #[must_use]
    pub fn account_not_found(username: impl Into<String>) -> Self {
        Self::AccountNotFound {
            username: username.into(),
        }
    }

    /// Create a not-a-doctor error.
    #[must_use]
    pub fn not_a_doctor(username: impl Into<String>) -> Self {
        Self::NotADoctor {
            username: username.into(),
        }
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error is a failed login.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed)
    }

    /// Check if this error is a rejected registration.
    #[must_use]
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, Self::Registration(_))
    }

    /// Check if this error came from writing the registry.
    #[must_use]
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            Self::StorageWrite { .. } | Self::DirectoryCreate { .. }
        )
    }
}
