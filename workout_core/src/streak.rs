//! Consecutive-day completion streak.
//!
//! The walk starts at the reference date and moves back one calendar day at
//! a time. A day with no record ends the streak, and so does a day whose
//! records all fail to qualify.

use crate::WorkoutCompletionRecord;
use chrono::NaiveDate;
use std::collections::HashMap;

impl WorkoutCompletionRecord {
    /// Whether this record counts toward a streak
    ///
    /// Rest-day markers always count. Otherwise an explicit `completed` flag
    /// decides. Documents written without the flag count when they carry any
    /// data beyond their id and date.
    pub fn qualifies(&self) -> bool {
        if self.is_rest_day {
            return true;
        }

        match self.completed {
            Some(completed) => completed,
            None => self.user_id.is_some() || self.workout_id.is_some() || !self.extra.is_empty(),
        }
    }
}

/// Count consecutive qualifying days ending at `reference_date`
///
/// Returns 0 when there is no record for `reference_date` itself, even if
/// earlier days were logged.
pub fn compute_streak(records: &[WorkoutCompletionRecord], reference_date: NaiveDate) -> u32 {
    // date -> at least one qualifying record exists
    let mut by_date: HashMap<NaiveDate, bool> = HashMap::new();
    for record in records {
        let satisfied = by_date.entry(record.date).or_insert(false);
        *satisfied |= record.qualifies();
    }

    let mut streak = 0;
    let mut current = Some(reference_date);

    while let Some(date) = current {
        match by_date.get(&date) {
            Some(true) => {
                streak += 1;
                current = date.pred_opt();
            }
            Some(false) => {
                tracing::debug!("Streak broken by non-qualifying entry on {}", date);
                break;
            }
            None => break,
        }
    }

    tracing::debug!("Computed streak of {} ending {}", streak, reference_date);
    streak
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn days_ago(n: u64) -> NaiveDate {
        today() - chrono::Days::new(n)
    }

    fn done(date: NaiveDate) -> WorkoutCompletionRecord {
        WorkoutCompletionRecord::workout("u1", "day1", date)
    }

    /// A record with nothing but identity and date
    fn bare(date: NaiveDate) -> WorkoutCompletionRecord {
        WorkoutCompletionRecord {
            id: "bare".into(),
            date,
            user_id: None,
            workout_id: None,
            completed: None,
            is_rest_day: false,
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_empty_records() {
        assert_eq!(compute_streak(&[], today()), 0);
    }

    #[test]
    fn test_three_consecutive_days() {
        let records = vec![done(today()), done(days_ago(1)), done(days_ago(2))];
        assert_eq!(compute_streak(&records, today()), 3);
    }

    #[test]
    fn test_stops_at_non_qualifying_day() {
        let records = vec![
            done(today()),
            done(days_ago(1)),
            bare(days_ago(2)),
            done(days_ago(3)),
        ];
        assert_eq!(compute_streak(&records, today()), 2);
    }

    #[test]
    fn test_today_missing_freezes_at_zero() {
        let records = vec![done(days_ago(1)), done(days_ago(2))];
        assert_eq!(compute_streak(&records, today()), 0);
        assert_eq!(compute_streak(&records, days_ago(1)), 2);
    }

    #[test]
    fn test_gap_ends_streak() {
        let records = vec![done(today()), done(days_ago(2))];
        assert_eq!(compute_streak(&records, today()), 1);
    }

    #[test]
    fn test_rest_day_counts() {
        let records = vec![
            done(today()),
            WorkoutCompletionRecord::rest_day("u1", days_ago(1)),
            done(days_ago(2)),
        ];
        assert_eq!(compute_streak(&records, today()), 3);
    }

    #[test]
    fn test_any_qualifying_record_satisfies_date() {
        let records = vec![bare(today()), done(today()), done(days_ago(1))];
        assert_eq!(compute_streak(&records, today()), 2);
    }

    #[test]
    fn test_explicit_incomplete_flag_does_not_qualify() {
        let mut record = done(today());
        record.completed = Some(false);
        assert!(!record.qualifies());
        assert_eq!(compute_streak(&[record], today()), 0);
    }

    #[test]
    fn test_legacy_shape_qualifies_with_extra_data() {
        let mut record = bare(today());
        assert!(!record.qualifies());

        record
            .extra
            .insert("duration".into(), serde_json::Value::from(45));
        assert!(record.qualifies());
    }

    #[test]
    fn test_record_order_does_not_matter() {
        let records = vec![done(days_ago(2)), done(today()), done(days_ago(1))];
        assert_eq!(compute_streak(&records, today()), 3);
    }

    #[test]
    fn test_future_records_are_ignored() {
        let records = vec![done(today()), done(today() + chrono::Days::new(1))];
        assert_eq!(compute_streak(&records, today()), 1);
    }

    #[test]
    fn test_calendar_minimum_terminates() {
        let records = vec![done(NaiveDate::MIN)];
        assert_eq!(compute_streak(&records, NaiveDate::MIN), 1);
    }

    #[test]
    fn test_streak_is_idempotent() {
        let records = vec![done(today()), done(days_ago(1))];
        assert_eq!(compute_streak(&records, today()), compute_streak(&records, today()));
    }
}
