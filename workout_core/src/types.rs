//! Core domain types for the Repday workout tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercises and their prescription (sets, reps, weight)
//! - Workout days and how they are scheduled
//! - The per-user workout program document
//! - Completion records written when a workout (or rest day) is logged
//!
//! Field names serialize in camelCase so documents keep the same shape as the
//! ones held by the remote document store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Exercise Types
// ============================================================================

/// Movement pattern of an exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
    #[default]
    Push,
    Pull,
    Legs,
    Other,
}

impl ExerciseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Pull => "pull",
            Self::Legs => "legs",
            Self::Other => "other",
        }
    }

    /// Parse a kind name, falling back to `Other` for anything unrecognised
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "push" => Self::Push,
            "pull" => Self::Pull,
            "legs" | "leg" => Self::Legs,
            _ => Self::Other,
        }
    }
}

/// A single exercise within a workout day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ExerciseKind,
    pub sets: u32,
    /// Free-form target such as "8-12"
    pub reps: String,
    #[serde(default)]
    pub weight: f64,
    /// Reference to a demo video held by the blob store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_uri: Option<String>,
}

impl Exercise {
    /// Video reference, ignoring the empty strings older documents carry
    pub fn video(&self) -> Option<&str> {
        self.video_uri.as_deref().filter(|uri| !uri.is_empty())
    }
}

// ============================================================================
// Workout Day and Program Types
// ============================================================================

/// How a day is placed on the calendar
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleType {
    Weekly,
    Rotation,
}

/// A well-formed schedule: the type together with its one populated field
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Schedule {
    /// Fixed weekday, 0 = Sunday .. 6 = Saturday
    Weekly(u8),
    /// Position in the rotation cycle
    Rotation(u32),
}

/// One planned training session definition
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDay {
    pub id: String,
    pub name: String,
    pub schedule_type: ScheduleType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_day: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl WorkoutDay {
    /// Create a day with a fresh id and no exercises
    pub fn new(name: impl Into<String>, schedule: Schedule) -> Self {
        let (schedule_type, week_day, order) = match schedule {
            Schedule::Weekly(day) => (ScheduleType::Weekly, Some(day), None),
            Schedule::Rotation(order) => (ScheduleType::Rotation, None, Some(order)),
        };

        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            schedule_type,
            week_day,
            order,
            exercises: Vec::new(),
        }
    }

    /// The day's schedule, or None when the stored fields are inconsistent
    /// with `schedule_type` (both or neither of weekDay/order populated, or a
    /// weekday outside 0..=6).
    pub fn schedule(&self) -> Option<Schedule> {
        match (self.schedule_type, self.week_day, self.order) {
            (ScheduleType::Weekly, Some(day), None) if day <= 6 => Some(Schedule::Weekly(day)),
            (ScheduleType::Rotation, None, Some(order)) => Some(Schedule::Rotation(order)),
            _ => None,
        }
    }

    /// Total number of sets across all exercises
    pub fn total_sets(&self) -> u32 {
        self.exercises.iter().map(|e| e.sets).sum()
    }
}

/// A user's full set of defined workout days
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutProgram {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub days: Vec<WorkoutDay>,
}

// ============================================================================
// Completion Records
// ============================================================================

fn is_false(value: &bool) -> bool {
    !*value
}

/// An immutable fact that a user finished a workout (or took a rest day) on
/// a given calendar date.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutCompletionRecord {
    pub id: String,
    /// Local calendar day, stored as YYYY-MM-DD
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_rest_day: bool,
    /// Any other fields present on the stored document
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl WorkoutCompletionRecord {
    /// Record for a finished workout session
    pub fn workout(user_id: impl Into<String>, workout_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            user_id: Some(user_id.into()),
            workout_id: Some(workout_id.into()),
            completed: Some(true),
            is_rest_day: false,
            extra: serde_json::Map::new(),
        }
    }

    /// Explicit rest-day marker
    pub fn rest_day(user_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            user_id: Some(user_id.into()),
            workout_id: None,
            completed: None,
            is_rest_day: true,
            extra: serde_json::Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_deserializes_store_shape() {
        let json = r#"{
            "id": "1700000000000",
            "name": "Push A",
            "scheduleType": "weekly",
            "weekDay": 3,
            "exercises": [
                {"id": "e1", "name": "Bench", "type": "push", "sets": 3,
                 "reps": "8-12", "weight": 60, "videoUri": "", "completed": [false, false, false]}
            ]
        }"#;

        let day: WorkoutDay = serde_json::from_str(json).unwrap();
        assert_eq!(day.schedule(), Some(Schedule::Weekly(3)));
        assert_eq!(day.exercises.len(), 1);
        assert_eq!(day.exercises[0].video(), None);
        assert_eq!(day.total_sets(), 3);
    }

    #[test]
    fn test_malformed_day_has_no_schedule() {
        let mut day = WorkoutDay::new("Broken", Schedule::Rotation(0));
        day.week_day = Some(2);
        assert_eq!(day.schedule(), None);

        let mut day = WorkoutDay::new("Broken", Schedule::Weekly(1));
        day.week_day = None;
        assert_eq!(day.schedule(), None);

        let day = WorkoutDay::new("Out of range", Schedule::Weekly(9));
        assert_eq!(day.schedule(), None);
    }

    #[test]
    fn test_record_serializes_date_and_keeps_extra_fields() {
        let json = r#"{"id": "r1", "date": "2024-05-01", "userId": "u1",
                       "workoutId": "d1", "completed": true, "note": "felt strong"}"#;
        let record: WorkoutCompletionRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(record.completed, Some(true));
        assert!(!record.is_rest_day);
        assert_eq!(record.extra.get("note").and_then(|v| v.as_str()), Some("felt strong"));

        let out = serde_json::to_string(&record).unwrap();
        assert!(out.contains("\"date\":\"2024-05-01\""));
        assert!(out.contains("\"note\":\"felt strong\""));
        assert!(!out.contains("isRestDay"));
    }

    #[test]
    fn test_rest_day_marker() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let record = WorkoutCompletionRecord::rest_day("u1", date);
        assert!(record.is_rest_day);
        assert!(record.workout_id.is_none());

        let out = serde_json::to_string(&record).unwrap();
        assert!(out.contains("\"isRestDay\":true"));
    }

    #[test]
    fn test_exercise_kind_parse() {
        assert_eq!(ExerciseKind::parse("Pull"), ExerciseKind::Pull);
        assert_eq!(ExerciseKind::parse("leg"), ExerciseKind::Legs);
        assert_eq!(ExerciseKind::parse("cardio"), ExerciseKind::Other);
    }
}
