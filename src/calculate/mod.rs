//! History views derived from stored documents.
//!
//! Everything here is a pure function over loaded collections: sorting,
//! Monday-anchored week grouping with Spanish labels, and the weekly
//! streak. Stored dates are free-form strings, so every comparison goes
//! through the shared date heuristics in `parser::dates`.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::models::{WeeklyPlan, Workout};
use crate::parser::dates::{monday_of, parse_flexible, parse_with_fallback_year};
use crate::storage::Stored;

/// Abbreviated Spanish month names, indexed by month - 1.
const MESES: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

/// One calendar week of history.
#[derive(Debug, Serialize)]
pub struct WeekGroup {
    pub monday: NaiveDate,
    pub label: String,
    pub workouts: Vec<Stored<Workout>>,
}

/// The calendar date a stored workout counts under: its own date field
/// when parseable, otherwise the day it was stored.
pub fn workout_date(stored: &Stored<Workout>) -> NaiveDate {
    stored
        .item
        .date
        .as_deref()
        .and_then(parse_flexible)
        .unwrap_or_else(|| stored.stored_at.date_naive())
}

/// Sort newest-first, the order history is browsed in.
pub fn sort_recent_first(workouts: &mut [Stored<Workout>]) {
    workouts.sort_by_key(|w| std::cmp::Reverse(workout_date(w)));
}

/// "19 Ene – 25 Ene" style label for a week's Monday.
fn week_label(monday: NaiveDate) -> String {
    let sunday = monday + Duration::days(6);
    format!(
        "{} {} – {} {}",
        monday.day(),
        MESES[monday.month0() as usize],
        sunday.day(),
        MESES[sunday.month0() as usize]
    )
}

/// Group workouts into calendar weeks, newest week first. Workouts inside
/// a week are also newest-first.
pub fn week_groups(mut workouts: Vec<Stored<Workout>>) -> Vec<WeekGroup> {
    sort_recent_first(&mut workouts);

    let mut groups: Vec<WeekGroup> = Vec::new();
    for workout in workouts {
        let monday = monday_of(workout_date(&workout));
        match groups.last_mut() {
            Some(group) if group.monday == monday => group.workouts.push(workout),
            _ => groups.push(WeekGroup {
                monday,
                label: week_label(monday),
                workouts: vec![workout],
            }),
        }
    }
    groups
}

/// Consecutive calendar weeks with at least one workout, counted
/// backwards from the week containing `today`. An empty current week
/// means a streak of zero.
pub fn weekly_streak(workouts: &[Stored<Workout>], today: NaiveDate) -> u32 {
    let weeks: HashSet<NaiveDate> = workouts
        .iter()
        .map(|w| monday_of(workout_date(w)))
        .collect();

    let mut streak = 0;
    let mut week = monday_of(today);
    while weeks.contains(&week) {
        streak += 1;
        week -= Duration::weeks(1);
    }
    streak
}

/// First calendar date a plan covers, resolved from its earliest day.
/// Day dates without a year borrow the year of `today`.
pub fn plan_start_date(plan: &WeeklyPlan, today: NaiveDate) -> Option<NaiveDate> {
    plan.days
        .iter()
        .filter_map(|day| parse_with_fallback_year(&day.date, today.year()))
        .min()
}
