//! Error types for the medcal pipeline.

use thiserror::Error;

/// Errors that can occur while converting and publishing appointments.
#[derive(Error, Debug)]
pub enum MedcalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not load location catalog: {0}")]
    CatalogLoad(String),

    #[error("Could not parse appointments: {0}")]
    InputParse(String),

    #[error("Could not parse appointment date '{0}'")]
    DateParse(String),

    #[error("Calendar '{0}' not found on server")]
    CalendarNotFound(String),

    #[error("CalDAV connection error: {0}")]
    RemoteConnection(String),

    #[error("Failed to submit event {uid}: {reason}")]
    RemoteSubmission { uid: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for medcal operations.
pub type MedcalResult<T> = Result<T, MedcalError>;
