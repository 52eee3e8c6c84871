//! Date record to calendar event mapping.
//!
//! Pure functions: the same record always maps to the same event, which is
//! what lets a re-sync replace an event's content without drift.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use datetrack_records::{DateEntry, DateRecord};

use crate::error::FormatError;
use crate::types::{ColorTag, EventDescriptor};

/// Every synced date occupies this many hours.
pub const EVENT_DURATION_HOURS: i64 = 2;

const FOOTER: &str = "Created by Dating Tracker App";

/// Color for an outcome label. Unknown labels get the default color.
pub fn color_for(outcome: &str) -> ColorTag {
    match outcome {
        "Great" => ColorTag::Green,
        "Good" => ColorTag::Blue,
        "Okay" => ColorTag::Yellow,
        "No spark" => ColorTag::Gray,
        _ => ColorTag::Default,
    }
}

/// Map a validated record. Typed dates cannot fail to combine.
pub fn map_record(record: &DateRecord) -> EventDescriptor {
    build(
        record.date_type.as_str(),
        &record.location,
        record.outcome.as_str(),
        record.rating,
        record.notes.as_deref(),
        record.date.and_time(record.time),
    )
}

/// Map a loosely typed entry, parsing its date and time.
pub fn map_entry(entry: &DateEntry) -> Result<EventDescriptor, FormatError> {
    let start = parse_start(&entry.date, &entry.time).ok_or_else(|| FormatError {
        record_id: entry.id.clone(),
        date: entry.date.clone(),
        time: entry.time.clone(),
    })?;

    Ok(build(
        &entry.date_type,
        &entry.location,
        &entry.outcome,
        entry.rating,
        Some(entry.notes.as_str()),
        start,
    ))
}

fn parse_start(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let time = time.trim();
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .ok()?;
    Some(date.and_time(time))
}

fn build(
    date_type: &str,
    location: &str,
    outcome: &str,
    rating: u8,
    notes: Option<&str>,
    start: NaiveDateTime,
) -> EventDescriptor {
    let mut description = format!(
        "Date Type: {}\nLocation: {}\nOutcome: {}\nRating: {}/5 stars",
        date_type, location, outcome, rating
    );
    if let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) {
        description.push_str("\nNotes: ");
        description.push_str(notes);
    }
    description.push_str("\n\n");
    description.push_str(FOOTER);

    EventDescriptor {
        summary: format!("{} Date - {}", date_type, location),
        description,
        start,
        end: start + Duration::hours(EVENT_DURATION_HOURS),
        location: location.to_string(),
        color: color_for(outcome),
    }
}

/// Anything sync can turn into a calendar event.
pub trait ToEvent {
    /// Local id the remote event is linked under.
    fn record_id(&self) -> &str;

    fn to_event(&self) -> Result<EventDescriptor, FormatError>;
}

impl ToEvent for DateRecord {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn to_event(&self) -> Result<EventDescriptor, FormatError> {
        Ok(map_record(self))
    }
}

impl ToEvent for DateEntry {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn to_event(&self) -> Result<EventDescriptor, FormatError> {
        map_entry(self)
    }
}
