//! Workout session state machine.
//!
//! A session walks the sets of one workout day in order. Completing a set
//! starts a rest; when the rest runs out (or is skipped) the session moves to
//! the next set, then the next exercise, and finally finishes.

use crate::{Error, Exercise, Result, RestTimer, WorkoutCompletionRecord, WorkoutDay};
use chrono::NaiveDate;
use std::time::Duration;

/// Where a session currently is
#[derive(Clone, Debug, PartialEq)]
pub enum SessionPhase {
    /// Working on `set` (0-based) of exercise `exercise`
    Active { exercise: usize, set: u32 },
    /// Resting after finishing the given set
    Resting {
        exercise: usize,
        set: u32,
        timer: RestTimer,
    },
    Finished,
    /// Abandoned before the last set; nothing is recorded
    Stopped,
}

/// An in-progress workout for one day
#[derive(Clone, Debug)]
pub struct WorkoutSession {
    day_id: String,
    day_name: String,
    exercises: Vec<Exercise>,
    completed: Vec<Vec<bool>>,
    rest: Duration,
    phase: SessionPhase,
}

impl WorkoutSession {
    /// Start a session on `day` with the given rest length between sets
    ///
    /// Fails when the day has no exercise with at least one set.
    pub fn start(day: &WorkoutDay, rest: Duration) -> Result<Self> {
        let first = day
            .exercises
            .iter()
            .position(|e| e.sets > 0)
            .ok_or_else(|| Error::Session(format!("{} has no sets to perform", day.name)))?;

        tracing::info!(
            "Starting {} ({} exercises, {} sets)",
            day.name,
            day.exercises.len(),
            day.total_sets()
        );

        Ok(Self {
            day_id: day.id.clone(),
            day_name: day.name.clone(),
            exercises: day.exercises.clone(),
            completed: day
                .exercises
                .iter()
                .map(|e| vec![false; e.sets as usize])
                .collect(),
            rest,
            phase: SessionPhase::Active {
                exercise: first,
                set: 0,
            },
        })
    }

    pub fn day_id(&self) -> &str {
        &self.day_id
    }

    pub fn day_name(&self) -> &str {
        &self.day_name
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    fn current_index(&self) -> Option<usize> {
        match self.phase {
            SessionPhase::Active { exercise, .. } | SessionPhase::Resting { exercise, .. } => {
                Some(exercise)
            }
            SessionPhase::Finished | SessionPhase::Stopped => None,
        }
    }

    /// The exercise being worked (or rested after)
    pub fn current_exercise(&self) -> Option<&Exercise> {
        self.current_index().and_then(|i| self.exercises.get(i))
    }

    /// Exercises still to come after the current one
    pub fn upcoming(&self) -> &[Exercise] {
        match self.current_index() {
            Some(i) => self.exercises.get(i + 1..).unwrap_or(&[]),
            None => &[],
        }
    }

    /// Per-exercise set completion flags
    pub fn completed(&self) -> &[Vec<bool>] {
        &self.completed
    }

    pub fn completed_sets(&self) -> usize {
        self.completed.iter().flatten().filter(|done| **done).count()
    }

    pub fn total_sets(&self) -> usize {
        self.completed.iter().map(Vec::len).sum()
    }

    /// Mark the current set done and start resting
    pub fn complete_set(&mut self) -> Result<()> {
        let SessionPhase::Active { exercise, set } = self.phase else {
            return Err(Error::Session(format!(
                "cannot complete a set while {:?}",
                self.phase
            )));
        };

        if let Some(flag) = self
            .completed
            .get_mut(exercise)
            .and_then(|sets| sets.get_mut(set as usize))
        {
            *flag = true;
        }

        tracing::debug!("Completed set {} of exercise {}", set + 1, exercise + 1);
        self.phase = SessionPhase::Resting {
            exercise,
            set,
            timer: RestTimer::new(self.rest),
        };
        Ok(())
    }

    /// Feed elapsed time to the rest timer; moves on when it runs out
    pub fn tick(&mut self, elapsed: Duration) -> &SessionPhase {
        if let SessionPhase::Resting {
            exercise,
            set,
            ref mut timer,
        } = self.phase
        {
            timer.tick(elapsed);
            if timer.is_done() {
                self.advance(exercise, set);
            }
        }
        &self.phase
    }

    /// End the rest early
    pub fn skip_rest(&mut self) -> Result<()> {
        let SessionPhase::Resting { exercise, set, .. } = self.phase else {
            return Err(Error::Session(format!("not resting ({:?})", self.phase)));
        };
        self.advance(exercise, set);
        Ok(())
    }

    /// Abandon the session
    pub fn stop(&mut self) {
        tracing::info!(
            "Stopped {} after {}/{} sets",
            self.day_name,
            self.completed_sets(),
            self.total_sets()
        );
        self.phase = SessionPhase::Stopped;
    }

    fn advance(&mut self, exercise: usize, set: u32) {
        let sets_here = self.exercises.get(exercise).map_or(0, |e| e.sets);

        self.phase = if set + 1 < sets_here {
            SessionPhase::Active {
                exercise,
                set: set + 1,
            }
        } else {
            match self
                .exercises
                .iter()
                .enumerate()
                .skip(exercise + 1)
                .find(|(_, e)| e.sets > 0)
            {
                Some((next, _)) => SessionPhase::Active {
                    exercise: next,
                    set: 0,
                },
                None => {
                    tracing::info!("Finished {}", self.day_name);
                    SessionPhase::Finished
                }
            }
        };
    }

    /// Record for a finished session
    pub fn completion_record(&self, user_id: &str, date: NaiveDate) -> Result<WorkoutCompletionRecord> {
        if !self.is_finished() {
            return Err(Error::Session(format!(
                "{} is not finished ({:?})",
                self.day_name, self.phase
            )));
        }
        Ok(WorkoutCompletionRecord::workout(user_id, self.day_id.as_str(), date))
    }
}
