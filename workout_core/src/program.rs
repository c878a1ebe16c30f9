//! Program editing and integrity checks.
//!
//! Every edit changes the in-memory program only; callers persist the whole
//! document afterwards (see `store::ProgramStore`).

use crate::{Error, Exercise, ExerciseKind, Result, Schedule, ScheduleType, WorkoutDay, WorkoutProgram};
use std::collections::HashSet;
use uuid::Uuid;

/// Fields for a new exercise; missing values take the usual defaults
#[derive(Clone, Debug, Default)]
pub struct NewExercise {
    pub name: String,
    pub kind: Option<ExerciseKind>,
    pub sets: Option<u32>,
    pub reps: Option<String>,
    pub weight: Option<f64>,
    pub video_uri: Option<String>,
}

impl NewExercise {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn into_exercise(self) -> Exercise {
        Exercise {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            kind: self.kind.unwrap_or_default(),
            sets: self.sets.unwrap_or(3),
            reps: self.reps.unwrap_or_else(|| "8-12".into()),
            weight: self.weight.unwrap_or(0.0),
            video_uri: self.video_uri.filter(|uri| !uri.is_empty()),
        }
    }
}

impl WorkoutProgram {
    /// Create an empty program owned by `user_id`
    ///
    /// The program document is keyed by user, so its id is the user id.
    pub fn new(user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        Self {
            id: user_id.clone(),
            user_id,
            days: Vec::new(),
        }
    }

    /// Look up a day by id
    pub fn day(&self, day_id: &str) -> Option<&WorkoutDay> {
        self.days.iter().find(|day| day.id == day_id)
    }

    fn day_mut(&mut self, day_id: &str) -> Result<&mut WorkoutDay> {
        self.days
            .iter_mut()
            .find(|day| day.id == day_id)
            .ok_or_else(|| Error::NotFound(format!("workout day {}", day_id)))
    }

    /// Order the next rotation day will take: one past the highest in use
    pub fn next_rotation_order(&self) -> u32 {
        self.days
            .iter()
            .filter(|day| day.schedule_type == ScheduleType::Rotation)
            .filter_map(|day| day.order)
            .max()
            .map_or(0, |order| order.saturating_add(1))
    }

    /// Add a weekly day on `week_day` (0 = Sunday)
    pub fn add_weekly_day(&mut self, name: &str, week_day: u8) -> Result<String> {
        if week_day > 6 {
            return Err(Error::InvalidSchedule(format!(
                "weekday {} is outside 0 (Sunday) ..= 6 (Saturday)",
                week_day
            )));
        }
        Ok(self.push_day(name, Schedule::Weekly(week_day)))
    }

    /// Append a day at the end of the rotation
    pub fn add_rotation_day(&mut self, name: &str) -> String {
        let order = self.next_rotation_order();
        self.push_day(name, Schedule::Rotation(order))
    }

    fn push_day(&mut self, name: &str, schedule: Schedule) -> String {
        let day = WorkoutDay::new(name, schedule);
        let id = day.id.clone();
        tracing::info!("Added workout day {} ({:?}) as {}", name, schedule, id);
        self.days.push(day);
        id
    }

    /// Remove a day and its exercises
    pub fn remove_day(&mut self, day_id: &str) -> Result<WorkoutDay> {
        let index = self
            .days
            .iter()
            .position(|day| day.id == day_id)
            .ok_or_else(|| Error::NotFound(format!("workout day {}", day_id)))?;

        let removed = self.days.remove(index);
        tracing::info!("Removed workout day {} ({})", removed.name, removed.id);
        Ok(removed)
    }

    /// Append an exercise to a day, returning the new exercise id
    pub fn add_exercise(&mut self, day_id: &str, new: NewExercise) -> Result<String> {
        if new.sets == Some(0) {
            return Err(Error::Other("an exercise needs at least one set".into()));
        }

        let day = self.day_mut(day_id)?;
        let exercise = new.into_exercise();
        let id = exercise.id.clone();
        tracing::info!("Added exercise {} to {}", exercise.name, day.name);
        day.exercises.push(exercise);
        Ok(id)
    }

    /// Remove one exercise from a day
    pub fn remove_exercise(&mut self, day_id: &str, exercise_id: &str) -> Result<Exercise> {
        let day = self.day_mut(day_id)?;
        let index = day
            .exercises
            .iter()
            .position(|e| e.id == exercise_id)
            .ok_or_else(|| Error::NotFound(format!("exercise {}", exercise_id)))?;

        Ok(day.exercises.remove(index))
    }

    /// Check data integrity
    ///
    /// Returns a list of problems (empty if the program is well-formed).
    /// Nothing is repaired; the schedule resolver skips malformed days.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut day_ids = HashSet::new();
        let mut orders = HashSet::new();

        for day in &self.days {
            if !day_ids.insert(day.id.as_str()) {
                errors.push(format!("Duplicate day id: {}", day.id));
            }

            match (day.schedule_type, day.week_day, day.order) {
                (_, Some(_), Some(_)) => errors.push(format!(
                    "Day {} has both weekDay and order set",
                    day.id
                )),
                (ScheduleType::Weekly, None, _) => {
                    errors.push(format!("Weekly day {} has no weekDay", day.id))
                }
                (ScheduleType::Rotation, _, None) => {
                    errors.push(format!("Rotation day {} has no order", day.id))
                }
                (ScheduleType::Weekly, Some(week_day), None) if week_day > 6 => errors.push(
                    format!("Day {} has weekDay {} outside 0..=6", day.id, week_day),
                ),
                (ScheduleType::Rotation, None, Some(order)) => {
                    if !orders.insert(order) {
                        errors.push(format!("Rotation order {} is used more than once", order));
                    }
                }
                _ => {}
            }

            let mut exercise_ids = HashSet::new();
            for exercise in &day.exercises {
                if !exercise_ids.insert(exercise.id.as_str()) {
                    errors.push(format!(
                        "Day {} has duplicate exercise id: {}",
                        day.id, exercise.id
                    ));
                }
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_program_is_keyed_by_user() {
        let program = WorkoutProgram::new("u1");
        assert_eq!(program.id, "u1");
        assert_eq!(program.user_id, "u1");
        assert!(program.days.is_empty());
        assert!(program.validate().is_empty());
    }

    #[test]
    fn test_add_weekly_day() {
        let mut program = WorkoutProgram::new("u1");
        let id = program.add_weekly_day("Push", 1).unwrap();

        let day = program.day(&id).unwrap();
        assert_eq!(day.schedule(), Some(Schedule::Weekly(1)));
        assert!(day.exercises.is_empty());
    }

    #[test]
    fn test_weekday_out_of_range() {
        let mut program = WorkoutProgram::new("u1");
        let result = program.add_weekly_day("Nope", 7);
        assert!(matches!(result, Err(Error::InvalidSchedule(_))));
        assert!(program.days.is_empty());
    }

    #[test]
    fn test_rotation_orders_increase() {
        let mut program = WorkoutProgram::new("u1");
        program.add_weekly_day("Mon", 1).unwrap();
        let a = program.add_rotation_day("A");
        let b = program.add_rotation_day("B");

        assert_eq!(program.day(&a).unwrap().order, Some(0));
        assert_eq!(program.day(&b).unwrap().order, Some(1));

        // Removing the first keeps the next order past the highest
        program.remove_day(&a).unwrap();
        let c = program.add_rotation_day("C");
        assert_eq!(program.day(&c).unwrap().order, Some(2));
        assert!(program.validate().is_empty());
    }

    #[test]
    fn test_remove_unknown_day() {
        let mut program = WorkoutProgram::new("u1");
        assert!(matches!(program.remove_day("missing"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_add_exercise_defaults() {
        let mut program = WorkoutProgram::new("u1");
        let day_id = program.add_rotation_day("Full body");
        let exercise_id = program
            .add_exercise(&day_id, NewExercise::named("Squat"))
            .unwrap();

        let exercise = &program.day(&day_id).unwrap().exercises[0];
        assert_eq!(exercise.id, exercise_id);
        assert_eq!(exercise.kind, ExerciseKind::Push);
        assert_eq!(exercise.sets, 3);
        assert_eq!(exercise.reps, "8-12");
        assert_eq!(exercise.weight, 0.0);
        assert_eq!(exercise.video(), None);
    }

    #[test]
    fn test_add_exercise_keeps_video_reference() {
        let mut program = WorkoutProgram::new("u1");
        let day_id = program.add_rotation_day("Full body");
        program
            .add_exercise(
                &day_id,
                NewExercise {
                    video_uri: Some("videos/squat.mp4".to_string()),
                    ..NewExercise::named("Squat")
                },
            )
            .unwrap();

        let exercise = &program.day(&day_id).unwrap().exercises[0];
        assert_eq!(exercise.video(), Some("videos/squat.mp4"));
    }

    #[test]
    fn test_add_exercise_rejects_zero_sets() {
        let mut program = WorkoutProgram::new("u1");
        let day_id = program.add_rotation_day("A");
        let new = NewExercise {
            sets: Some(0),
            ..NewExercise::named("Plank")
        };
        assert!(program.add_exercise(&day_id, new).is_err());
    }

    #[test]
    fn test_remove_exercise() {
        let mut program = WorkoutProgram::new("u1");
        let day_id = program.add_rotation_day("A");
        let keep = program.add_exercise(&day_id, NewExercise::named("Row")).unwrap();
        let drop = program.add_exercise(&day_id, NewExercise::named("Curl")).unwrap();

        let removed = program.remove_exercise(&day_id, &drop).unwrap();
        assert_eq!(removed.name, "Curl");

        let day = program.day(&day_id).unwrap();
        assert_eq!(day.exercises.len(), 1);
        assert_eq!(day.exercises[0].id, keep);

        assert!(matches!(
            program.remove_exercise(&day_id, &drop),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_validate_reports_malformed_days() {
        let mut program = WorkoutProgram::new("u1");
        let both = program.add_rotation_day("Both");
        let neither = program.add_weekly_day("Neither", 2).unwrap();
        let dup_a = program.add_rotation_day("Dup A");
        program.add_rotation_day("Dup B");

        for day in program.days.iter_mut() {
            if day.id == both {
                day.week_day = Some(1);
            } else if day.id == neither {
                day.week_day = None;
            } else if day.id != dup_a {
                day.order = Some(1);
            }
        }

        let errors = program.validate();
        assert_eq!(errors.len(), 3, "{:?}", errors);
        assert!(errors.iter().any(|e| e.contains("both weekDay and order")));
        assert!(errors.iter().any(|e| e.contains("has no weekDay")));
        assert!(errors.iter().any(|e| e.contains("used more than once")));
    }
}
