//! Calendar-specific error types.

use datetrack_core::error::{DatabaseError, NetworkError, ReqwestErrorExt, RusqliteErrorExt};
use thiserror::Error;

/// Failure talking to the remote calendar.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Calendar client could not be initialized: {0}")]
    Initialization(String),

    #[error("Authentication required")]
    AuthRequired,

    #[error("Token expired")]
    TokenExpired,

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Conflict: event was modified")]
    Conflict,

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
}

impl From<reqwest::Error> for CalendarError {
    fn from(e: reqwest::Error) -> Self {
        CalendarError::Network(e.into_network_error())
    }
}

impl CalendarError {
    /// User-friendly error message for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Initialization(_) => "Could not connect to Google Calendar.".to_string(),
            Self::AuthRequired => {
                "Calendar permission was not granted. Please sign in again.".to_string()
            }
            Self::TokenExpired => "Your session has expired. Please sign in again.".to_string(),
            Self::RateLimited(secs) => format!("Too many requests. Please wait {} seconds.", secs),
            Self::EventNotFound(_) => "Calendar event not found".to_string(),
            Self::Conflict => "The event was modified elsewhere. Please sync again.".to_string(),
            Self::ApiError(msg) => format!("Calendar error: {}", msg),
            Self::Network(e) => e.user_message().to_string(),
        }
    }

    /// Whether this error should send the user back through sign-in.
    pub fn should_refresh_token(&self) -> bool {
        matches!(self, Self::TokenExpired | Self::AuthRequired)
    }
}

/// A record whose date and time do not form a valid point in time.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Record {record_id}: cannot read '{date} {time}' as a date and time")]
pub struct FormatError {
    pub record_id: String,
    pub date: String,
    pub time: String,
}

/// Failure reading or writing the link store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Link store error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Link store is unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.into_database_error())
    }
}

/// Errors surfaced before or outside a sync pass.
///
/// Individual record failures inside a pass never become a `SyncError`;
/// they are tallied in the pass outcome.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Calendar permission not granted")]
    PermissionDenied,

    #[error(transparent)]
    Remote(#[from] CalendarError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SyncError {
    pub fn user_message(&self) -> String {
        match self {
            Self::PermissionDenied => {
                "Please grant calendar permission during Google sign-in, then try again."
                    .to_string()
            }
            Self::Remote(e) => e.user_message(),
            Self::Store(_) => "Could not read local sync state.".to_string(),
        }
    }
}
