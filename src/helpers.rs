//! Normalization primitives shared by every calculator.
//!
//! Historical data predates stricter write-path validation, so progress
//! values arrive in mixed units (fractions 0..1 and percentages 0..100) and
//! sums can overshoot 100%. `normalize_progress` is the single contract for
//! ambiguous-unit values system-wide; everything downstream builds on it.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::types::{Project, Task};

/// Clamp a value to the unit interval [0, 1]. NaN collapses to 0.
pub fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        return 0.0;
    }
    v.clamp(0.0, 1.0)
}

/// Normalize an ambiguous-unit progress value to a fraction in [0, 1].
///
/// Values greater than 1 are assumed to be percentages (0..100); values at
/// or below 0 floor to 0.
pub fn normalize_progress(v: f64) -> f64 {
    if v > 1.0 {
        clamp_unit(v / 100.0)
    } else {
        clamp_unit(v)
    }
}

/// Calendar quarter of a date, 1..4.
pub fn quarter_of(date: NaiveDate) -> u32 {
    (date.month() - 1) / 3 + 1
}

/// First and last calendar day of a quarter.
///
/// Month lengths come from the calendar itself, so leap-year February is
/// handled without a lookup table. Out-of-range quarters clamp to 1..4.
pub fn quarter_range(year: i32, quarter: u32) -> (NaiveDate, NaiveDate) {
    let quarter = quarter.clamp(1, 4);
    let start_month = (quarter - 1) * 3 + 1;
    let end_month = quarter * 3;
    let start = NaiveDate::from_ymd_opt(year, start_month, 1).unwrap_or(NaiveDate::MIN);
    let end = NaiveDate::from_ymd_opt(year, end_month, days_in_month(year, end_month))
        .unwrap_or(NaiveDate::MAX);
    (start, end)
}

/// Number of days in a month: the day before the first of the next month.
fn days_in_month(year: i32, month: u32) -> u32 {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

/// Sum a task's normalized log increments within `start..=end`, clamped to
/// [0, 1].
///
/// The final clamp guards against data-entry errors where increments sum
/// past 100% for the window.
pub fn sum_logs_in_range(task: &Task, start: NaiveDate, end: NaiveDate) -> f64 {
    let sum: f64 = task
        .logs
        .iter()
        .filter(|l| l.date >= start && l.date <= end)
        .map(|l| normalize_progress(l.progress))
        .sum();
    if sum > 1.0 {
        log::debug!(
            "task {} logs sum to {:.3} in {}..{}, clamping to 1.0",
            task.id,
            sum,
            start,
            end
        );
    }
    clamp_unit(sum)
}

/// A task's weight, or 0 when absent or non-positive.
pub fn safe_weight(weight: Option<f64>) -> f64 {
    match weight {
        Some(w) if w > 0.0 => w,
        _ => 0.0,
    }
}

/// Group a flat task list by `project_id`. Built once per aggregation call.
pub fn build_task_lookup(tasks: &[Task]) -> HashMap<i64, Vec<&Task>> {
    let mut lookup: HashMap<i64, Vec<&Task>> = HashMap::new();
    for task in tasks {
        lookup.entry(task.project_id).or_default().push(task);
    }
    lookup
}

/// Resolve a project's tasks: the embedded collection when non-empty, else
/// the flat-lookup entry, else empty.
pub fn tasks_for_project<'a>(
    project: &'a Project,
    lookup: &HashMap<i64, Vec<&'a Task>>,
) -> Vec<&'a Task> {
    if !project.tasks.is_empty() {
        return project.tasks.iter().collect();
    }
    lookup.get(&project.id).cloned().unwrap_or_default()
}
