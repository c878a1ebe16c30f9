//! Schedule resolution: which workout day applies on a given date.
//!
//! Weekly days win when one is pinned to the date's weekday. Otherwise the
//! rotation days, sorted by `order`, are cycled through by weekday. A date
//! that resolves to nothing is a rest day.

use crate::{Schedule, WorkoutDay, WorkoutProgram};
use chrono::{Datelike, Duration, NaiveDate};

const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Weekday index of a date, 0 = Sunday .. 6 = Saturday
///
/// Every call site that compares against `WorkoutDay::week_day` or indexes
/// the rotation must go through this function.
pub fn day_of_week(date: NaiveDate) -> u8 {
    // num_days_from_sunday is always in 0..=6
    date.weekday().num_days_from_sunday() as u8
}

/// Display name for a weekday index
pub fn weekday_name(week_day: u8) -> Option<&'static str> {
    WEEKDAY_NAMES.get(usize::from(week_day)).copied()
}

/// Rotation days of a program, sorted ascending by `order`
///
/// Days whose stored fields don't form a valid rotation schedule are left out.
/// The sort is stable, so equal orders keep their list order.
pub fn rotation_days(program: &WorkoutProgram) -> Vec<&WorkoutDay> {
    let mut days: Vec<(u32, &WorkoutDay)> = program
        .days
        .iter()
        .filter_map(|day| match day.schedule() {
            Some(Schedule::Rotation(order)) => Some((order, day)),
            _ => None,
        })
        .collect();

    days.sort_by_key(|(order, _)| *order);
    days.into_iter().map(|(_, day)| day).collect()
}

/// Resolve the workout to perform on `date`
///
/// Returns None for a rest day: an empty program, or a weekday with no weekly
/// day and no rotation to fall back on.
pub fn resolve_todays_workout(program: &WorkoutProgram, date: NaiveDate) -> Option<&WorkoutDay> {
    let dow = day_of_week(date);

    for day in &program.days {
        if day.schedule().is_none() {
            tracing::warn!(
                "Skipping workout day {} ({}): schedule fields are inconsistent",
                day.id,
                day.name
            );
        }
    }

    // First weekly match in list order wins
    let weekly = program
        .days
        .iter()
        .find(|day| day.schedule() == Some(Schedule::Weekly(dow)));

    if let Some(day) = weekly {
        tracing::debug!("Resolved weekly day {} for {}", day.name, date);
        return Some(day);
    }

    let rotation = rotation_days(program);
    if rotation.is_empty() {
        tracing::debug!("No weekly or rotation day for {}, rest day", date);
        return None;
    }

    // 1-based position (dow + 1) wrapped into 1..=n is zero-based dow mod n
    let index = usize::from(dow) % rotation.len();
    let day = rotation.get(index).copied();

    if let Some(day) = day {
        tracing::debug!(
            "Resolved rotation day {} (position {} of {}) for {}",
            day.name,
            index + 1,
            rotation.len(),
            date
        );
    }

    day
}

/// Resolve seven consecutive dates starting at `start`
pub fn week_plan(program: &WorkoutProgram, start: NaiveDate) -> Vec<(NaiveDate, Option<&WorkoutDay>)> {
    (0..7)
        .filter_map(|offset| start.checked_add_signed(Duration::days(offset)))
        .map(|date| (date, resolve_todays_workout(program, date)))
        .collect()
}
