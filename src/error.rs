//! Error types for the tracker
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, unknown item, invalid config)
//! - 4: Operation failed (store, I/O, corrupt data)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the `todo` CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for tracker operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Cannot move item from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    // Operation failures (exit code 4)
    #[error("Store error: {0}")]
    Store(Box<Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Corrupt data: {0}")]
    CorruptData(String),
}

impl Error {
    /// Wrap a collaborator failure so callers can tell it apart from a
    /// rejected request.
    pub fn store(err: Error) -> Self {
        match err {
            Error::Store(_) => err,
            other => Error::Store(Box::new(other)),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::ItemNotFound(_)
            | Error::InvalidTransition { .. } => exit_codes::USER_ERROR,

            Error::Store(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::LockFailed(_)
            | Error::CorruptData(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Short machine-readable category used in JSON error bodies
    pub fn kind(&self) -> &'static str {
        match self.exit_code() {
            exit_codes::USER_ERROR => "user_error",
            _ => "operation_failed",
        }
    }
}

/// Result type alias for tracker operations
pub type Result<T> = std::result::Result<T, Error>;
