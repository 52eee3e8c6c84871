//! Event descriptor and Calendar API types.
//!
//! `EventDescriptor` is what the rest of the crate works with. The `Api*`
//! types mirror the Google Calendar v3 JSON schema and stay behind the
//! client boundary.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

const LOCAL_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Color of a synced event, derived from the date's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Green,
    Blue,
    Yellow,
    Gray,
    Default,
}

impl ColorTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorTag::Green => "green",
            ColorTag::Blue => "blue",
            ColorTag::Yellow => "yellow",
            ColorTag::Gray => "gray",
            ColorTag::Default => "default",
        }
    }

    /// Google Calendar event palette id.
    pub fn google_color_id(&self) -> &'static str {
        match self {
            ColorTag::Green => "10",
            ColorTag::Blue => "7",
            ColorTag::Yellow => "5",
            ColorTag::Gray => "8",
            ColorTag::Default => "1",
        }
    }

    pub fn from_google_color_id(id: &str) -> Self {
        match id {
            "10" => ColorTag::Green,
            "7" => ColorTag::Blue,
            "5" => ColorTag::Yellow,
            "8" => ColorTag::Gray,
            _ => ColorTag::Default,
        }
    }
}

/// A calendar event as this app wants it to look.
///
/// Times are local wall-clock times; the client pairs them with the
/// configured time zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDescriptor {
    pub summary: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub location: String,
    pub color: ColorTag,
}

/// Event listed back from the remote calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteEvent {
    pub id: String,
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    pub color: ColorTag,
    pub html_link: Option<String>,
}

/// Event time - can be a specific datetime or an all-day date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventTime {
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
}

impl EventTime {
    pub fn as_datetime(&self) -> DateTime<Utc> {
        match self {
            EventTime::DateTime(dt) => *dt,
            EventTime::Date(d) => d
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc())
                .unwrap_or_default(),
        }
    }
}

/// Calendar metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calendar {
    pub id: String,
    pub summary: String,
    pub time_zone: Option<String>,
    pub is_primary: bool,
    pub access_role: AccessRole,
}

impl Calendar {
    /// Whether events can be written to this calendar.
    pub fn is_writable(&self) -> bool {
        matches!(self.access_role, AccessRole::Owner | AccessRole::Writer)
    }
}

/// Calendar access role.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub enum AccessRole {
    Owner,
    Writer,
    #[default]
    Reader,
    FreeBusyReader,
}

// API Request Types

/// Request body for inserting or replacing an event.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEventBody {
    pub summary: String,
    pub description: String,
    pub start: ApiEventDateTime,
    pub end: ApiEventDateTime,
    pub location: String,
    pub color_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEventDateTime {
    pub date_time: String,
    pub time_zone: String,
}

impl ApiEventBody {
    pub fn from_descriptor(event: &EventDescriptor, time_zone: &str) -> Self {
        let at = |t: &NaiveDateTime| ApiEventDateTime {
            date_time: t.format(LOCAL_DATE_TIME_FORMAT).to_string(),
            time_zone: time_zone.to_string(),
        };

        Self {
            summary: event.summary.clone(),
            description: event.description.clone(),
            start: at(&event.start),
            end: at(&event.end),
            location: event.location.clone(),
            color_id: event.color.google_color_id().to_string(),
        }
    }
}

// API Response Types

/// Google Calendar API event response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEvent {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<ApiEventTime>,
    pub end: Option<ApiEventTime>,
    pub color_id: Option<String>,
    pub html_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEventTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
    pub time_zone: Option<String>,
}

/// API response for event list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListResponse {
    #[serde(default)]
    pub items: Vec<ApiEvent>,
}

/// API response for calendar list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarListResponse {
    #[serde(default)]
    pub items: Vec<ApiCalendar>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCalendar {
    pub id: String,
    pub summary: Option<String>,
    pub time_zone: Option<String>,
    #[serde(default)]
    pub primary: bool,
    pub access_role: Option<String>,
}

impl RemoteEvent {
    /// Convert an API response to a listed event.
    ///
    /// Returns `None` when the event carries no usable start time.
    pub fn from_api(api: ApiEvent) -> Option<Self> {
        let start = api.start.as_ref().and_then(parse_event_time)?;
        let end = api
            .end
            .as_ref()
            .and_then(parse_event_time)
            .unwrap_or_else(|| start.clone());

        Some(Self {
            id: api.id,
            summary: api.summary.unwrap_or_default(),
            description: api.description,
            location: api.location,
            start,
            end,
            color: api
                .color_id
                .as_deref()
                .map(ColorTag::from_google_color_id)
                .unwrap_or(ColorTag::Default),
            html_link: api.html_link,
        })
    }
}

impl From<ApiCalendar> for Calendar {
    fn from(api: ApiCalendar) -> Self {
        let access_role = match api.access_role.as_deref() {
            Some("owner") => AccessRole::Owner,
            Some("writer") => AccessRole::Writer,
            Some("freeBusyReader") => AccessRole::FreeBusyReader,
            _ => AccessRole::Reader,
        };

        Self {
            id: api.id,
            summary: api.summary.unwrap_or_default(),
            time_zone: api.time_zone,
            is_primary: api.primary,
            access_role,
        }
    }
}

fn parse_event_time(api: &ApiEventTime) -> Option<EventTime> {
    if let Some(dt_str) = &api.date_time {
        if let Ok(dt) = DateTime::parse_from_rfc3339(dt_str) {
            return Some(EventTime::DateTime(dt.with_timezone(&Utc)));
        }
    }
    if let Some(date_str) = &api.date {
        if let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
            return Some(EventTime::Date(date));
        }
    }
    None
}
