//! The remote calendar capability used by sync.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CalendarError;
use crate::types::{EventDescriptor, RemoteEvent};

/// Largest page requested when listing events.
pub const MAX_LISTED_EVENTS: u32 = 50;

/// Which events to list.
#[derive(Debug, Clone)]
pub struct EventQuery {
    pub time_min: DateTime<Utc>,
    pub time_max: Option<DateTime<Utc>>,
    /// Free-text filter, matched by the remote service
    pub text: Option<String>,
    pub max_results: u32,
}

impl EventQuery {
    /// Upcoming events from `time_min` on, matching `text`.
    pub fn upcoming(time_min: DateTime<Utc>, text: Option<String>) -> Self {
        Self {
            time_min,
            time_max: None,
            text,
            max_results: MAX_LISTED_EVENTS,
        }
    }

    pub fn until(mut self, time_max: DateTime<Utc>) -> Self {
        self.time_max = Some(time_max);
        self
    }
}

/// A calendar service that sync can push events to.
///
/// `CalendarClient` is the production implementation; tests substitute
/// their own.
#[async_trait]
pub trait RemoteCalendar: Send + Sync {
    /// Insert a new event, returning its remote id.
    async fn create_event(&self, event: &EventDescriptor) -> Result<String, CalendarError>;

    /// Replace the content of an existing event.
    async fn update_event(
        &self,
        event_id: &str,
        event: &EventDescriptor,
    ) -> Result<(), CalendarError>;

    async fn delete_event(&self, event_id: &str) -> Result<(), CalendarError>;

    async fn list_events(&self, query: &EventQuery) -> Result<Vec<RemoteEvent>, CalendarError>;

    /// Lightweight read-only call proving the credential can reach the calendar.
    async fn probe(&self) -> Result<(), CalendarError>;
}
