//! Form-boundary validation.
//!
//! Everything a user submits passes through here before it is stored or
//! handed to calendar sync.

use chrono::{Local, NaiveDate, NaiveTime, Utc};

use crate::error::RecordError;
use crate::types::{
    DateEntry, DateRecord, DateType, MatchOutcome, MatchRecord, MessageStyle, Outcome, MAX_RATING,
};

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, RecordError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| RecordError::InvalidDate(s.to_string()))
}

/// Parse an `HH:MM` or `HH:MM:SS` time of day.
pub fn parse_time(s: &str) -> Result<NaiveTime, RecordError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| RecordError::InvalidTime(s.to_string()))
}

/// A date as submitted, before validation.
#[derive(Debug, Clone)]
pub struct NewDateRecord {
    /// Keep an existing id (imports); a fresh one is generated otherwise
    pub id: Option<String>,
    pub location: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub date_type: DateType,
    pub outcome: Outcome,
    pub rating: u8,
    pub notes: Option<String>,
}

impl NewDateRecord {
    /// Validate against today's local date.
    pub fn submit(self) -> Result<DateRecord, RecordError> {
        let today = Local::now().date_naive();
        self.validate(today)
    }

    /// Validate against an explicit `today`.
    pub fn validate(self, today: NaiveDate) -> Result<DateRecord, RecordError> {
        let location = self.location.trim().to_string();
        if location.is_empty() {
            return Err(RecordError::EmptyLocation);
        }
        if self.rating > MAX_RATING {
            return Err(RecordError::RatingOutOfRange(self.rating));
        }
        if self.date > today {
            return Err(RecordError::FutureDate {
                date: self.date,
                today,
            });
        }

        let notes = self
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Ok(DateRecord {
            id: self
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            location,
            date: self.date,
            time: self.time,
            date_type: self.date_type,
            outcome: self.outcome,
            rating: self.rating,
            notes,
            created_at: Utc::now(),
        })
    }
}

impl TryFrom<&DateEntry> for NewDateRecord {
    type Error = RecordError;

    fn try_from(entry: &DateEntry) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Some(entry.id.clone()),
            location: entry.location.clone(),
            date: parse_date(&entry.date)?,
            time: parse_time(&entry.time)?,
            date_type: DateType::from(entry.date_type.as_str()),
            outcome: Outcome::from(entry.outcome.as_str()),
            rating: entry.rating,
            notes: Some(entry.notes.clone()),
        })
    }
}

/// A match as submitted, before validation.
#[derive(Debug, Clone)]
pub struct NewMatchRecord {
    pub app: String,
    pub first_message: String,
    pub style: MessageStyle,
    pub replied: bool,
    pub reply_time: Option<String>,
    pub outcome: MatchOutcome,
}

impl NewMatchRecord {
    pub fn validate(self) -> Result<MatchRecord, RecordError> {
        let app = self.app.trim().to_string();
        if app.is_empty() {
            return Err(RecordError::MissingField("App"));
        }
        let first_message = self.first_message.trim().to_string();
        if first_message.is_empty() {
            return Err(RecordError::MissingField("First message"));
        }

        // A reply time only means something if they replied.
        let reply_time = if self.replied {
            self.reply_time
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
        } else {
            None
        };

        Ok(MatchRecord {
            id: uuid::Uuid::new_v4().to_string(),
            app,
            first_message,
            style: self.style,
            replied: self.replied,
            reply_time,
            outcome: self.outcome,
            created_at: Utc::now(),
        })
    }
}
