//! Record validation and storage errors.

use chrono::NaiveDate;
use datetrack_core::error::{DatabaseError, RusqliteErrorExt};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Location is required")]
    EmptyLocation,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Rating {0} is out of range (0-5)")]
    RatingOutOfRange(u8),

    #[error("Date {date} is in the future (today is {today})")]
    FutureDate { date: NaiveDate, today: NaiveDate },

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Database(#[from] DatabaseError),
}

impl From<rusqlite::Error> for RecordError {
    fn from(e: rusqlite::Error) -> Self {
        RecordError::Database(e.into_database_error())
    }
}

impl RecordError {
    /// Whether the error comes from user input rather than storage.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyLocation
                | Self::MissingField(_)
                | Self::RatingOutOfRange(_)
                | Self::FutureDate { .. }
                | Self::InvalidDate(_)
                | Self::InvalidTime(_)
        )
    }
}
