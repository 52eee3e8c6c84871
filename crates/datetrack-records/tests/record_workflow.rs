//! End-to-end tests for logging dates: form, storage, search and stats.

use chrono::{NaiveDate, NaiveTime};
use datetrack_records::{
    DateEntry, DateStats, DateType, NewDateRecord, Outcome, RecordError, RecordFilter,
    RecordStore,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, 14).unwrap()
}

fn submit(
    store: &RecordStore,
    location: &str,
    day: u32,
    date_type: DateType,
    outcome: Outcome,
    rating: u8,
) -> String {
    let record = NewDateRecord {
        id: None,
        location: location.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
        time: NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
        date_type,
        outcome,
        rating,
        notes: None,
    }
    .validate(today())
    .unwrap();
    store.save_date(&record).unwrap();
    record.id
}

#[test]
fn test_logged_dates_feed_search_and_stats() {
    let store = RecordStore::in_memory().unwrap();
    submit(&store, "Starbucks", 1, DateType::Coffee, Outcome::Great, 5);
    submit(&store, "Nopa", 7, DateType::Dinner, Outcome::Okay, 3);
    submit(&store, "Dolores Park", 10, DateType::Walk, Outcome::Good, 4);

    let all = store.list_dates().unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].location, "Dolores Park");

    let filter = RecordFilter {
        text: Some("park".to_string()),
        ..Default::default()
    };
    assert_eq!(filter.apply(all.clone()).len(), 1);

    let stats = DateStats::from_records(&all);
    assert_eq!(stats.average_rating, Some(4.0));
    assert_eq!(stats.positive_rate.map(|r| r.round()), Some(67.0));
}

#[test]
fn test_future_date_never_reaches_storage() {
    let store = RecordStore::in_memory().unwrap();
    let result = NewDateRecord {
        id: None,
        location: "Rooftop bar".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 2, 20).unwrap(),
        time: NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
        date_type: DateType::Drinks,
        outcome: Outcome::Good,
        rating: 4,
        notes: None,
    }
    .validate(today());

    assert!(matches!(result, Err(RecordError::FutureDate { .. })));
    assert_eq!(store.date_count().unwrap(), 0);
}

#[test]
fn test_export_then_import_keeps_ids() {
    let source = RecordStore::in_memory().unwrap();
    let id = submit(&source, "Starbucks", 1, DateType::Coffee, Outcome::Great, 5);

    let entries: Vec<DateEntry> = source
        .list_dates()
        .unwrap()
        .iter()
        .map(DateEntry::from)
        .collect();
    let json = serde_json::to_string(&entries).unwrap();

    let target = RecordStore::in_memory().unwrap();
    let parsed: Vec<DateEntry> = serde_json::from_str(&json).unwrap();
    for entry in &parsed {
        let record = NewDateRecord::try_from(entry)
            .unwrap()
            .validate(today())
            .unwrap();
        target.save_date(&record).unwrap();
    }

    let imported = target.get_date(&id).unwrap().unwrap();
    assert_eq!(imported.location, "Starbucks");
    assert_eq!(imported.time, NaiveTime::from_hms_opt(19, 30, 0).unwrap());
}
