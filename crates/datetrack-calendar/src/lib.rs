//! Google Calendar sync for DateTrack.
//!
//! Maps logged dates to calendar events and pushes them to the user's
//! calendar, remembering which remote event belongs to which record.

pub mod client;
pub mod error;
pub mod links;
pub mod mapper;
pub mod remote;
pub mod store;
pub mod sync;
pub mod types;

pub use client::CalendarClient;
pub use error::{CalendarError, FormatError, StoreError, SyncError};
pub use links::{EventLinks, ExternalEventLink};
pub use mapper::{color_for, map_entry, map_record, ToEvent, EVENT_DURATION_HOURS};
pub use remote::{EventQuery, RemoteCalendar};
pub use store::{KeyValueStore, MemoryKvStore, SqliteKvStore};
pub use sync::{RecordSyncState, SyncOrchestrator, SyncOutcome};
pub use types::{AccessRole, Calendar, ColorTag, EventDescriptor, EventTime, RemoteEvent};
