//! Santa-specific error types

use std::path::PathBuf;
use thiserror::Error;
use shared::{Participant, SharedError};

#[derive(Error, Debug)]
pub enum SantaError {
    #[error("No valid assignment found after {attempts} attempt(s); {unassigned} participant(s) left unassigned")]
    InfeasibleAssignment { attempts: u32, unassigned: usize },

    #[error("Participant '{participant}' appears more than once in {path}")]
    DuplicateParticipant { participant: Participant, path: PathBuf },

    #[error("Malformed record on line {line} of {path}: {reason}")]
    MalformedRecord { path: PathBuf, line: usize, reason: String },

    #[error("Record store operation failed: {operation} on {path}")]
    RecordStore {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No contact address for {participant}")]
    MissingContact { participant: Participant },

    #[error("Notification delivery failed: {message}")]
    Notification { message: String },

    #[error("Configuration error: {field}")]
    ConfigurationError { field: String },

    #[error("{0}")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl SantaError {
    pub fn config(field: impl Into<String>) -> Self {
        Self::ConfigurationError { field: field.into() }
    }

    pub fn record_store(operation: &str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::RecordStore {
            operation: operation.to_string(),
            path: path.into(),
            source,
        }
    }

    pub fn notification(message: impl Into<String>) -> Self {
        Self::Notification { message: message.into() }
    }
}

pub type SantaResult<T> = Result<T, SantaError>;
