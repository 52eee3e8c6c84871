//! SQLite storage for date and match records.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;

use crate::error::RecordError;
use crate::form::{parse_date, parse_time};
use crate::types::{DateRecord, DateType, MatchOutcome, MatchRecord, MessageStyle, Outcome};

/// SQLite store for everything the user logs.
pub struct RecordStore {
    conn: Connection,
}

impl RecordStore {
    /// Open (or create) a store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, RecordError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    RecordError::Database(datetrack_core::DatabaseError::ConnectionFailed(
                        e.to_string(),
                    ))
                })?;
            }
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn in_memory() -> Result<Self, RecordError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), RecordError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS dates (
                id TEXT PRIMARY KEY,
                location TEXT NOT NULL,
                date TEXT NOT NULL,
                time TEXT NOT NULL,
                date_type TEXT NOT NULL,
                outcome TEXT NOT NULL,
                rating INTEGER NOT NULL CHECK (rating BETWEEN 0 AND 5),
                notes TEXT,
                created_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS matches (
                id TEXT PRIMARY KEY,
                app TEXT NOT NULL,
                first_message TEXT NOT NULL,
                style TEXT NOT NULL,
                replied INTEGER NOT NULL,
                reply_time TEXT,
                outcome TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_dates_date ON dates(date, time);
            "#,
        )?;
        Ok(())
    }

    /// Insert or replace a date record.
    pub fn save_date(&self, record: &DateRecord) -> Result<(), RecordError> {
        self.conn.execute(
            r#"
            INSERT OR REPLACE INTO dates
            (id, location, date, time, date_type, outcome, rating, notes, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                record.id,
                record.location,
                record.date.format("%Y-%m-%d").to_string(),
                record.time.format("%H:%M:%S").to_string(),
                record.date_type.as_str(),
                record.outcome.as_str(),
                record.rating,
                record.notes,
                record.created_at.timestamp_millis(),
            ],
        )?;
        tracing::debug!("Saved date record {}", record.id);
        Ok(())
    }

    /// Get a date record by id.
    pub fn get_date(&self, id: &str) -> Result<Option<DateRecord>, RecordError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, location, date, time, date_type, outcome, rating, notes, created_at FROM dates WHERE id = ?1",
        )?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Self::row_to_date(row)?))
        } else {
            Ok(None)
        }
    }

    /// List all date records, most recent first.
    pub fn list_dates(&self) -> Result<Vec<DateRecord>, RecordError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, location, date, time, date_type, outcome, rating, notes, created_at
            FROM dates
            ORDER BY date DESC, time DESC
            "#,
        )?;

        let rows = stmt.query_map([], Self::row_to_date)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Delete a date record. Returns false if it did not exist.
    pub fn delete_date(&self, id: &str) -> Result<bool, RecordError> {
        let count = self
            .conn
            .execute("DELETE FROM dates WHERE id = ?1", params![id])?;
        Ok(count > 0)
    }

    pub fn date_count(&self) -> Result<u32, RecordError> {
        let count: u32 = self
            .conn
            .query_row("SELECT COUNT(*) FROM dates", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Insert or replace a match record.
    pub fn save_match(&self, record: &MatchRecord) -> Result<(), RecordError> {
        self.conn.execute(
            r#"
            INSERT OR REPLACE INTO matches
            (id, app, first_message, style, replied, reply_time, outcome, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                record.id,
                record.app,
                record.first_message,
                record.style.as_str(),
                record.replied as i32,
                record.reply_time,
                record.outcome.as_str(),
                record.created_at.timestamp_millis(),
            ],
        )?;
        Ok(())
    }

    /// List all match records, newest first.
    pub fn list_matches(&self) -> Result<Vec<MatchRecord>, RecordError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, app, first_message, style, replied, reply_time, outcome, created_at FROM matches ORDER BY created_at DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            let style_str: String = row.get(3)?;
            let outcome_str: String = row.get(6)?;
            let created_ms: i64 = row.get(7)?;

            Ok(MatchRecord {
                id: row.get(0)?,
                app: row.get(1)?,
                first_message: row.get(2)?,
                style: MessageStyle::parse(&style_str).ok_or_else(|| {
                    conversion_error(3, format!("unknown message style '{}'", style_str))
                })?,
                replied: row.get::<_, i32>(4)? != 0,
                reply_time: row.get(5)?,
                outcome: MatchOutcome::parse(&outcome_str).ok_or_else(|| {
                    conversion_error(6, format!("unknown match outcome '{}'", outcome_str))
                })?,
                created_at: DateTime::from_timestamp_millis(created_ms).unwrap_or_default(),
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Delete a match record. Returns false if it did not exist.
    pub fn delete_match(&self, id: &str) -> Result<bool, RecordError> {
        let count = self
            .conn
            .execute("DELETE FROM matches WHERE id = ?1", params![id])?;
        Ok(count > 0)
    }

    fn row_to_date(row: &rusqlite::Row) -> rusqlite::Result<DateRecord> {
        let date_str: String = row.get(2)?;
        let time_str: String = row.get(3)?;
        let type_str: String = row.get(4)?;
        let outcome_str: String = row.get(5)?;
        let created_ms: i64 = row.get(8)?;

        let date = parse_date(&date_str).map_err(|e| conversion_error(2, e.to_string()))?;
        let time = parse_time(&time_str).map_err(|e| conversion_error(3, e.to_string()))?;

        Ok(DateRecord {
            id: row.get(0)?,
            location: row.get(1)?,
            date,
            time,
            date_type: DateType::from(type_str.as_str()),
            outcome: Outcome::from(outcome_str.as_str()),
            rating: row.get(6)?,
            notes: row.get(7)?,
            created_at: DateTime::<Utc>::from_timestamp_millis(created_ms).unwrap_or_default(),
        })
    }
}

fn conversion_error(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        rusqlite::types::Type::Text,
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn create_test_date(id: &str, day: u32, outcome: Outcome) -> DateRecord {
        DateRecord {
            id: id.to_string(),
            location: "Starbucks".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            date_type: DateType::Coffee,
            outcome,
            rating: 4,
            notes: Some("nice".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_save_and_get_date() {
        let store = RecordStore::in_memory().unwrap();
        let record = create_test_date("d1", 15, Outcome::Great);

        store.save_date(&record).unwrap();
        let loaded = store.get_date("d1").unwrap().unwrap();

        assert_eq!(loaded.location, "Starbucks");
        assert_eq!(loaded.time, record.time);
        assert_eq!(loaded.outcome, Outcome::Great);
        assert_eq!(loaded.notes.as_deref(), Some("nice"));
    }

    #[test]
    fn test_date_not_found() {
        let store = RecordStore::in_memory().unwrap();
        assert!(store.get_date("missing").unwrap().is_none());
    }

    #[test]
    fn test_list_dates_newest_first() {
        let store = RecordStore::in_memory().unwrap();
        store.save_date(&create_test_date("a", 3, Outcome::Okay)).unwrap();
        store.save_date(&create_test_date("b", 20, Outcome::Good)).unwrap();
        store.save_date(&create_test_date("c", 11, Outcome::NoSpark)).unwrap();

        let ids: Vec<_> = store
            .list_dates()
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_custom_tags_survive_storage() {
        let store = RecordStore::in_memory().unwrap();
        let mut record = create_test_date("d1", 15, Outcome::Other("Went well".to_string()));
        record.date_type = DateType::Other("Museum".to_string());
        store.save_date(&record).unwrap();

        let loaded = store.get_date("d1").unwrap().unwrap();
        assert_eq!(loaded.date_type, DateType::Other("Museum".to_string()));
        assert_eq!(loaded.outcome, Outcome::Other("Went well".to_string()));
    }

    #[test]
    fn test_delete_date() {
        let store = RecordStore::in_memory().unwrap();
        store.save_date(&create_test_date("d1", 15, Outcome::Great)).unwrap();
        assert_eq!(store.date_count().unwrap(), 1);

        assert!(store.delete_date("d1").unwrap());
        assert!(!store.delete_date("d1").unwrap());
        assert_eq!(store.date_count().unwrap(), 0);
    }

    #[test]
    fn test_rating_check_constraint() {
        let store = RecordStore::in_memory().unwrap();
        let mut record = create_test_date("d1", 15, Outcome::Great);
        record.rating = 9;
        assert!(store.save_date(&record).is_err());
    }

    #[test]
    fn test_matches_round_trip_through_table() {
        let store = RecordStore::in_memory().unwrap();
        let record = MatchRecord {
            id: "m1".to_string(),
            app: "Tinder".to_string(),
            first_message: "Hey! You look like trouble".to_string(),
            style: MessageStyle::Flirty,
            replied: true,
            reply_time: Some("15 min".to_string()),
            outcome: MatchOutcome::NumberExchanged,
            created_at: Utc::now(),
        };
        store.save_match(&record).unwrap();

        let matches = store.list_matches().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].outcome, MatchOutcome::NumberExchanged);
        assert!(matches[0].replied);

        assert!(store.delete_match("m1").unwrap());
        assert!(store.list_matches().unwrap().is_empty());
    }

    #[test]
    fn test_store_on_disk_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("dates.db");
        {
            let store = RecordStore::new(&path).unwrap();
            store.save_date(&create_test_date("d1", 15, Outcome::Good)).unwrap();
        }
        let reopened = RecordStore::new(&path).unwrap();
        assert_eq!(reopened.date_count().unwrap(), 1);
    }
}
