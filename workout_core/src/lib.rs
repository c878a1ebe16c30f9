#![forbid(unsafe_code)]

//! Core domain model and business logic for the Repday workout tracker.
//!
//! This crate provides:
//! - Domain types (programs, days, exercises, completion records)
//! - Schedule resolution (weekly and rotation days)
//! - Streak calculation over completion history
//! - Program editing and workout sessions with rest timers
//! - Persistence (program documents, record log, CSV export)

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod program;
pub mod schedule;
pub mod streak;
pub mod timer;
pub mod session;
pub mod store;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use program::NewExercise;
pub use schedule::{day_of_week, resolve_todays_workout, rotation_days, week_plan, weekday_name};
pub use streak::compute_streak;
pub use timer::RestTimer;
pub use session::{SessionPhase, WorkoutSession};
pub use store::{JsonProgramStore, JsonlRecordLog, ProgramStore, RecordSink};
pub use export::export_records;
