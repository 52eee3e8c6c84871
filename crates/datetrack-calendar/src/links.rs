//! Record to remote event links, kept in a `KeyValueStore`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::store::KeyValueStore;

const LINK_PREFIX: &str = "calendar-event-";
const LAST_SYNC_KEY: &str = "last-calendar-sync";

/// Association between a local record and the remote event created for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalEventLink {
    pub record_id: String,
    pub remote_event_id: String,
}

/// Typed view over the link keys of a store.
///
/// At most one remote event is linked per record id; linking again
/// overwrites.
pub struct EventLinks<S> {
    store: S,
}

impl<S: KeyValueStore> EventLinks<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn key(record_id: &str) -> String {
        format!("{}{}", LINK_PREFIX, record_id)
    }

    pub fn remote_id(&self, record_id: &str) -> Result<Option<String>, StoreError> {
        self.store.get(&Self::key(record_id))
    }

    pub fn link(&self, record_id: &str, remote_event_id: &str) -> Result<(), StoreError> {
        self.store.set(&Self::key(record_id), remote_event_id)
    }

    pub fn unlink(&self, record_id: &str) -> Result<(), StoreError> {
        self.store.remove(&Self::key(record_id))
    }

    pub fn all_links(&self) -> Result<Vec<ExternalEventLink>, StoreError> {
        let mut links = Vec::new();
        for key in self.store.keys(LINK_PREFIX)? {
            let Some(remote_event_id) = self.store.get(&key)? else {
                continue;
            };
            links.push(ExternalEventLink {
                record_id: key[LINK_PREFIX.len()..].to_string(),
                remote_event_id,
            });
        }
        Ok(links)
    }

    /// When the last sync pass finished. An unreadable value counts as never.
    pub fn last_sync(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        let value = self.store.get(LAST_SYNC_KEY)?;
        Ok(value
            .and_then(|v| DateTime::parse_from_rfc3339(&v).ok())
            .map(|dt| dt.with_timezone(&Utc)))
    }

    pub fn set_last_sync(&self, at: DateTime<Utc>) -> Result<(), StoreError> {
        self.store.set(LAST_SYNC_KEY, &at.to_rfc3339())
    }
}
