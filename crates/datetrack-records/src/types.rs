//! Record types and their string forms.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest rating a date can receive.
pub const MAX_RATING: u8 = 5;

/// Kind of date. Unknown tags are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DateType {
    Coffee,
    Dinner,
    Walk,
    Drinks,
    Activity,
    Other(String),
}

impl DateType {
    pub fn as_str(&self) -> &str {
        match self {
            DateType::Coffee => "Coffee",
            DateType::Dinner => "Dinner",
            DateType::Walk => "Walk",
            DateType::Drinks => "Drinks",
            DateType::Activity => "Activity",
            DateType::Other(tag) => tag,
        }
    }
}

impl From<&str> for DateType {
    fn from(s: &str) -> Self {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "coffee" => DateType::Coffee,
            "dinner" => DateType::Dinner,
            "walk" => DateType::Walk,
            "drinks" => DateType::Drinks,
            "activity" => DateType::Activity,
            _ if s.is_empty() => DateType::Other("Other".to_string()),
            _ => DateType::Other(s.to_string()),
        }
    }
}

impl From<String> for DateType {
    fn from(s: String) -> Self {
        DateType::from(s.as_str())
    }
}

impl From<DateType> for String {
    fn from(t: DateType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for DateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a date went. Unknown tags are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Outcome {
    Great,
    Good,
    Okay,
    NoSpark,
    Other(String),
}

impl Outcome {
    pub fn as_str(&self) -> &str {
        match self {
            Outcome::Great => "Great",
            Outcome::Good => "Good",
            Outcome::Okay => "Okay",
            Outcome::NoSpark => "No spark",
            Outcome::Other(tag) => tag,
        }
    }

    /// Great and Good count as dates that went well.
    pub fn is_positive(&self) -> bool {
        matches!(self, Outcome::Great | Outcome::Good)
    }
}

impl From<&str> for Outcome {
    fn from(s: &str) -> Self {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "great" => Outcome::Great,
            "good" => Outcome::Good,
            "okay" | "ok" => Outcome::Okay,
            "no spark" | "no-spark" | "nospark" => Outcome::NoSpark,
            _ => Outcome::Other(s.to_string()),
        }
    }
}

impl From<String> for Outcome {
    fn from(s: String) -> Self {
        Outcome::from(s.as_str())
    }
}

impl From<Outcome> for String {
    fn from(o: Outcome) -> Self {
        o.as_str().to_string()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logged date that passed form validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRecord {
    pub id: String,
    pub location: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub date_type: DateType,
    pub outcome: Outcome,
    pub rating: u8,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DateRecord {
    /// Text searched by free-text filters.
    pub fn search_text(&self) -> String {
        let mut text = self.location.to_lowercase();
        if let Some(notes) = &self.notes {
            text.push('\n');
            text.push_str(&notes.to_lowercase());
        }
        text
    }
}

/// Loosely typed date entry, as exchanged in JSON import/export files.
///
/// `date` is `YYYY-MM-DD` and `time` is `HH:MM`; neither is guaranteed to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateEntry {
    pub id: String,
    pub location: String,
    pub date: String,
    pub time: String,
    #[serde(rename = "type")]
    pub date_type: String,
    pub outcome: String,
    pub rating: u8,
    #[serde(default)]
    pub notes: String,
}

impl From<&DateRecord> for DateEntry {
    fn from(record: &DateRecord) -> Self {
        Self {
            id: record.id.clone(),
            location: record.location.clone(),
            date: record.date.format("%Y-%m-%d").to_string(),
            time: record.time.format("%H:%M").to_string(),
            date_type: record.date_type.to_string(),
            outcome: record.outcome.to_string(),
            rating: record.rating,
            notes: record.notes.clone().unwrap_or_default(),
        }
    }
}

/// Style of an opening message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageStyle {
    Flirty,
    Funny,
    Compliment,
    Question,
}

impl MessageStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStyle::Flirty => "Flirty",
            MessageStyle::Funny => "Funny",
            MessageStyle::Compliment => "Compliment",
            MessageStyle::Question => "Question",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flirty" => Some(MessageStyle::Flirty),
            "funny" => Some(MessageStyle::Funny),
            "compliment" => Some(MessageStyle::Compliment),
            "question" => Some(MessageStyle::Question),
            _ => None,
        }
    }
}

impl fmt::Display for MessageStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a match ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    Ghosted,
    NumberExchanged,
    Unmatched,
    Date,
}

impl MatchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchOutcome::Ghosted => "Ghosted",
            MatchOutcome::NumberExchanged => "Number Exchanged",
            MatchOutcome::Unmatched => "Unmatched",
            MatchOutcome::Date => "Date",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ghosted" => Some(MatchOutcome::Ghosted),
            "number exchanged" | "number-exchanged" | "number" => {
                Some(MatchOutcome::NumberExchanged)
            }
            "unmatched" => Some(MatchOutcome::Unmatched),
            "date" => Some(MatchOutcome::Date),
            _ => None,
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logged match from a dating app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: String,
    pub app: String,
    pub first_message: String,
    pub style: MessageStyle,
    pub replied: bool,
    /// Free text such as "15 min"
    pub reply_time: Option<String>,
    pub outcome: MatchOutcome,
    pub created_at: DateTime<Utc>,
}
