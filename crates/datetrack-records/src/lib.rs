//! Date and match records for DateTrack.
//!
//! Provides the record types, form validation, SQLite storage, filtering
//! and aggregate statistics.

pub mod error;
pub mod filter;
pub mod form;
pub mod stats;
pub mod store;
pub mod types;

pub use error::RecordError;
pub use filter::RecordFilter;
pub use form::{parse_date, parse_time, NewDateRecord, NewMatchRecord};
pub use stats::{DateStats, MatchStats};
pub use store::RecordStore;
pub use types::{
    DateEntry, DateRecord, DateType, MatchOutcome, MatchRecord, MessageStyle, Outcome,
    MAX_RATING,
};
