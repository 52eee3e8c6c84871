//! Best-effort batch sync of date records to a remote calendar.

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::error::{CalendarError, FormatError, StoreError, SyncError};
use crate::links::EventLinks;
use crate::mapper::ToEvent;
use crate::remote::{EventQuery, RemoteCalendar};
use crate::store::KeyValueStore;
use crate::types::RemoteEvent;

/// Result of one sync pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub success: u32,
    pub failed: u32,
    /// Message of the most recent failure in the pass
    pub last_error: Option<String>,
}

impl SyncOutcome {
    pub fn attempted(&self) -> u32 {
        self.success + self.failed
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Where a single record stands relative to the remote calendar.
///
/// `SyncFailed` is not sticky: the next pass retries from whichever branch
/// the link store dictates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSyncState {
    Unsynced,
    Synced,
    SyncFailed,
}

#[derive(Error, Debug)]
enum RecordFailure {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Remote(#[from] CalendarError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Pushes records to a remote calendar, remembering the event made for each.
pub struct SyncOrchestrator<R, S> {
    remote: R,
    links: EventLinks<S>,
}

impl<R: RemoteCalendar, S: KeyValueStore> SyncOrchestrator<R, S> {
    pub fn new(remote: R, store: S) -> Self {
        Self {
            remote,
            links: EventLinks::new(store),
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn links(&self) -> &EventLinks<S> {
        &self.links
    }

    /// Whether the remote calendar accepts our credential.
    ///
    /// Callers should not start a pass when this is false.
    pub async fn has_permission(&self) -> bool {
        self.ensure_permission().await.is_ok()
    }

    pub async fn ensure_permission(&self) -> Result<(), SyncError> {
        self.remote.probe().await.map_err(|e| {
            warn!(error = %e, "Calendar permission probe failed");
            SyncError::PermissionDenied
        })
    }

    /// Sync every record in order, one remote call at a time.
    ///
    /// Individual failures are counted, never returned; the whole batch is
    /// always attempted.
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub async fn sync_all<T: ToEvent>(&self, records: &[T]) -> SyncOutcome {
        let mut outcome = SyncOutcome::default();

        for record in records {
            match self.try_sync(record).await {
                Ok(()) => outcome.success += 1,
                Err(e) => {
                    warn!(record_id = %record.record_id(), error = %e, "Failed to sync record");
                    outcome.failed += 1;
                    outcome.last_error = Some(e.to_string());
                }
            }
        }

        if let Err(e) = self.links.set_last_sync(Utc::now()) {
            warn!(error = %e, "Failed to record last sync time");
        }

        info!(
            success = outcome.success,
            failed = outcome.failed,
            "Calendar sync finished"
        );
        outcome
    }

    /// Sync a single record.
    pub async fn sync_record<T: ToEvent>(&self, record: &T) -> RecordSyncState {
        match self.try_sync(record).await {
            Ok(()) => RecordSyncState::Synced,
            Err(e) => {
                warn!(record_id = %record.record_id(), error = %e, "Failed to sync record");
                RecordSyncState::SyncFailed
            }
        }
    }

    async fn try_sync<T: ToEvent>(&self, record: &T) -> Result<(), RecordFailure> {
        let record_id = record.record_id();
        let existing = self.links.remote_id(record_id)?;
        let event = record.to_event()?;

        match existing {
            Some(remote_id) => {
                debug!(record_id, remote_id = %remote_id, "Updating calendar event");
                self.remote.update_event(&remote_id, &event).await?;
            }
            None => {
                debug!(record_id, "Creating calendar event");
                let remote_id = self.remote.create_event(&event).await?;
                // The event now exists remotely; a failed write here means the
                // next pass creates a second one.
                self.links.link(record_id, &remote_id)?;
            }
        }
        Ok(())
    }

    /// Last known state of a record, judged from the link store.
    pub fn record_state(&self, record_id: &str) -> Result<RecordSyncState, SyncError> {
        Ok(match self.links.remote_id(record_id)? {
            Some(_) => RecordSyncState::Synced,
            None => RecordSyncState::Unsynced,
        })
    }

    /// Remove a record's event from the calendar and drop its link.
    ///
    /// Returns false when the record was never synced. An event already gone
    /// remotely still clears the link; any other failure keeps it.
    #[instrument(skip(self))]
    pub async fn forget(&self, record_id: &str) -> Result<bool, SyncError> {
        let Some(remote_id) = self.links.remote_id(record_id)? else {
            return Ok(false);
        };

        match self.remote.delete_event(&remote_id).await {
            Ok(()) => {}
            Err(CalendarError::EventNotFound(_)) => {
                debug!(remote_id = %remote_id, "Calendar event already removed");
            }
            Err(e) => return Err(e.into()),
        }

        self.links.unlink(record_id)?;
        info!("Calendar event removed");
        Ok(true)
    }

    pub fn last_sync(&self) -> Result<Option<chrono::DateTime<Utc>>, SyncError> {
        Ok(self.links.last_sync()?)
    }

    pub async fn list_synced_events(
        &self,
        query: &EventQuery,
    ) -> Result<Vec<RemoteEvent>, SyncError> {
        Ok(self.remote.list_events(query).await?)
    }
}
