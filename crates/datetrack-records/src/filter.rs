//! Filter & search over date records.

use crate::types::{DateRecord, DateType, Outcome};

/// Criteria combined with AND; unset criteria match everything.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub date_type: Option<DateType>,
    pub outcome: Option<Outcome>,
    /// Case-insensitive substring searched in location and notes
    pub text: Option<String>,
    pub min_rating: Option<u8>,
}

impl RecordFilter {
    pub fn is_empty(&self) -> bool {
        self.date_type.is_none()
            && self.outcome.is_none()
            && self.text.as_deref().map_or(true, |t| t.trim().is_empty())
            && self.min_rating.is_none()
    }

    pub fn matches(&self, record: &DateRecord) -> bool {
        if let Some(t) = &self.date_type {
            if &record.date_type != t {
                return false;
            }
        }
        if let Some(o) = &self.outcome {
            if &record.outcome != o {
                return false;
            }
        }
        if let Some(min) = self.min_rating {
            if record.rating < min {
                return false;
            }
        }
        match self.text.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                record.search_text().contains(&needle.to_lowercase())
            }
            _ => true,
        }
    }

    /// Keep matching records, preserving order.
    pub fn apply(&self, records: Vec<DateRecord>) -> Vec<DateRecord> {
        if self.is_empty() {
            return records;
        }
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn record(id: &str, date_type: DateType, outcome: Outcome, location: &str) -> DateRecord {
        DateRecord {
            id: id.to_string(),
            location: location.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
            time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            date_type,
            outcome,
            rating: 3,
            notes: Some("Talked about Lisbon".to_string()),
            created_at: Utc::now(),
        }
    }

    fn sample() -> Vec<DateRecord> {
        vec![
            record("1", DateType::Coffee, Outcome::Great, "Starbucks"),
            record("2", DateType::Dinner, Outcome::NoSpark, "Olive Garden"),
            record("3", DateType::Coffee, Outcome::Okay, "Blue Bottle"),
        ]
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = RecordFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(sample()).len(), 3);
    }

    #[test]
    fn test_filters_combine() {
        let filter = RecordFilter {
            date_type: Some(DateType::Coffee),
            outcome: Some(Outcome::Okay),
            ..Default::default()
        };
        let ids: Vec<_> = filter.apply(sample()).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["3"]);
    }

    #[test]
    fn test_text_search_covers_location_and_notes() {
        let by_location = RecordFilter {
            text: Some("olive".to_string()),
            ..Default::default()
        };
        assert_eq!(by_location.apply(sample()).len(), 1);

        let by_notes = RecordFilter {
            text: Some("LISBON".to_string()),
            ..Default::default()
        };
        assert_eq!(by_notes.apply(sample()).len(), 3);
    }

    #[test]
    fn test_min_rating() {
        let mut records = sample();
        records[0].rating = 5;
        let filter = RecordFilter {
            min_rating: Some(4),
            ..Default::default()
        };
        assert_eq!(filter.apply(records).len(), 1);
    }
}
