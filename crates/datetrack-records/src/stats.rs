//! Aggregate statistics for the dashboard.

use std::collections::HashMap;

use crate::types::{DateRecord, MatchOutcome, MatchRecord};

/// Counts sorted by count (descending), then label.
pub type Tally = Vec<(String, usize)>;

fn tally<'a>(labels: impl Iterator<Item = &'a str>) -> Tally {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    let mut tally: Tally = counts
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect();
    tally.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    tally
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateStats {
    pub total: usize,
    pub by_type: Tally,
    pub by_outcome: Tally,
    pub average_rating: Option<f64>,
    /// Share of Great/Good outcomes, in percent
    pub positive_rate: Option<f64>,
}

impl DateStats {
    pub fn from_records(records: &[DateRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let total = records.len();
        let rating_sum: u32 = records.iter().map(|r| u32::from(r.rating)).sum();
        let positive = records.iter().filter(|r| r.outcome.is_positive()).count();

        Self {
            total,
            by_type: tally(records.iter().map(|r| r.date_type.as_str())),
            by_outcome: tally(records.iter().map(|r| r.outcome.as_str())),
            average_rating: Some(f64::from(rating_sum) / total as f64),
            positive_rate: Some(positive as f64 * 100.0 / total as f64),
        }
    }

    /// What's working: the most frequent kind of date.
    pub fn top_type(&self) -> Option<&str> {
        self.by_type.first().map(|(label, _)| label.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchStats {
    pub total: usize,
    pub replied: usize,
    /// Share of matches that replied, in percent
    pub reply_rate: Option<f64>,
    pub by_outcome: Tally,
    pub by_style: Tally,
    /// Matches that turned into a date
    pub dates: usize,
}

impl MatchStats {
    pub fn from_records(records: &[MatchRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let total = records.len();
        let replied = records.iter().filter(|m| m.replied).count();

        Self {
            total,
            replied,
            reply_rate: Some(replied as f64 * 100.0 / total as f64),
            by_outcome: tally(records.iter().map(|m| m.outcome.as_str())),
            by_style: tally(records.iter().map(|m| m.style.as_str())),
            dates: records
                .iter()
                .filter(|m| m.outcome == MatchOutcome::Date)
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::types::{DateType, MessageStyle, Outcome};
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn date(date_type: DateType, outcome: Outcome, rating: u8) -> DateRecord {
        DateRecord {
            id: uuid::Uuid::new_v4().to_string(),
            location: "Somewhere".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 5).unwrap(),
            time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            date_type,
            outcome,
            rating,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_stats() {
        let stats = DateStats::from_records(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_rating, None);
        assert_eq!(stats.top_type(), None);
    }

    #[test]
    fn test_date_stats() {
        let records = vec![
            date(DateType::Dinner, Outcome::Great, 5),
            date(DateType::Dinner, Outcome::NoSpark, 1),
            date(DateType::Dinner, Outcome::Good, 4),
            date(DateType::Coffee, Outcome::Okay, 2),
        ];

        let stats = DateStats::from_records(&records);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.average_rating, Some(3.0));
        assert_eq!(stats.positive_rate, Some(50.0));
        assert_eq!(stats.top_type(), Some("Dinner"));
        assert_eq!(
            stats.by_type,
            vec![("Dinner".to_string(), 3), ("Coffee".to_string(), 1)]
        );
    }

    #[test]
    fn test_tally_ties_sorted_by_label() {
        let records = vec![
            date(DateType::Walk, Outcome::Good, 3),
            date(DateType::Coffee, Outcome::Good, 3),
        ];
        let stats = DateStats::from_records(&records);
        assert_eq!(stats.by_type[0].0, "Coffee");
        assert_eq!(stats.by_outcome, vec![("Good".to_string(), 2)]);
    }

    #[test]
    fn test_match_stats() {
        let make = |replied, outcome| MatchRecord {
            id: uuid::Uuid::new_v4().to_string(),
            app: "Bumble".to_string(),
            first_message: "Hi".to_string(),
            style: MessageStyle::Funny,
            replied,
            reply_time: None,
            outcome,
            created_at: Utc::now(),
        };
        let records = vec![
            make(true, MatchOutcome::Date),
            make(true, MatchOutcome::NumberExchanged),
            make(false, MatchOutcome::Ghosted),
            make(false, MatchOutcome::Ghosted),
        ];

        let stats = MatchStats::from_records(&records);
        assert_eq!(stats.replied, 2);
        assert_eq!(stats.reply_rate, Some(50.0));
        assert_eq!(stats.dates, 1);
        assert_eq!(stats.by_outcome[0], ("Ghosted".to_string(), 2));
    }
}
