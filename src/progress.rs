//! Progress aggregator: targeted (planned) vs. actual (observed) completion
//! for the whole portfolio, bucketed by year and quarter, plus per-project
//! detail rows for chart drill-down.
//!
//! Targeted figures come from task weights keyed by expected end date.
//! Actual figures come from weight × normalized log increments inside the
//! period; the per-project detail rows fall back to the legacy `done_ratio`
//! only when no logged progress exists anywhere in the window. Period
//! figures are averaged across the full project set, not summed, so the KPI
//! stays comparable as the portfolio grows.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::helpers::{
    normalize_progress, quarter_of, quarter_range, safe_weight, sum_logs_in_range,
    tasks_for_project,
};
use crate::types::{Project, Task};

/// One drill-down row: a project's targeted and actual progress for a single
/// quarter of a single year.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProgressDetail {
    pub project_id: i64,
    pub project_name: String,
    pub year: i32,
    /// Quarter label, `"Q1"`..`"Q4"`.
    pub quarter: String,
    pub annual_target_progress: f64,
    pub quarter_target_progress: f64,
    pub actual_progress: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_reasons: Option<String>,
}

/// Portfolio-level targeted vs. actual progress, keyed by year and by
/// `"{year}-Q{n}"` quarter.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressComparison {
    pub targeted_by_year: BTreeMap<i32, f64>,
    pub actual_by_year: BTreeMap<i32, f64>,
    pub targeted_by_quarter: BTreeMap<String, f64>,
    pub actual_by_quarter: BTreeMap<String, f64>,
    pub project_details: Vec<ProjectProgressDetail>,
}

/// Compute the full targeted-vs-actual comparison for the portfolio.
pub fn compute_progress(
    projects: &[Project],
    lookup: &HashMap<i64, Vec<&Task>>,
) -> ProgressComparison {
    // Resolve each project's task set once; every step below reads this.
    let resolved: Vec<(&Project, Vec<&Task>)> = projects
        .iter()
        .map(|p| (p, tasks_for_project(p, lookup)))
        .collect();

    let mut comparison = ProgressComparison::default();

    // Reported years: expected-end years union log years, so a year with no
    // planned completions but recorded progress still appears.
    let mut years: BTreeSet<i32> = BTreeSet::new();
    for (_, tasks) in &resolved {
        for task in tasks {
            years.insert(task.expected_end_date.year());
            for log in &task.logs {
                years.insert(log.date.year());
            }
        }
    }

    for &year in &years {
        let targeted = average_over_projects(&resolved, |tasks| {
            tasks
                .iter()
                .filter(|t| t.expected_end_date.year() == year)
                .map(|t| safe_weight(t.weight))
                .sum()
        });

        let (year_start, year_end) = year_range(year);
        let actual = average_over_projects(&resolved, |tasks| {
            tasks
                .iter()
                .map(|t| safe_weight(t.weight) * sum_logs_in_range(t, year_start, year_end))
                .sum()
        });

        comparison.targeted_by_year.insert(year, targeted);
        comparison.actual_by_year.insert(year, actual);

        for quarter in 1..=4u32 {
            let quarter_targeted = average_over_projects(&resolved, |tasks| {
                tasks
                    .iter()
                    .filter(|t| {
                        t.expected_end_date.year() == year
                            && quarter_of(t.expected_end_date) == quarter
                    })
                    .map(|t| safe_weight(t.weight))
                    .sum()
            });

            let (quarter_start, quarter_end) = quarter_range(year, quarter);
            let quarter_actual = average_over_projects(&resolved, |tasks| {
                tasks
                    .iter()
                    .map(|t| {
                        safe_weight(t.weight) * sum_logs_in_range(t, quarter_start, quarter_end)
                    })
                    .sum()
            });

            // Sparse maps: an all-zero quarter is omitted entirely.
            if quarter_targeted > 0.0 || quarter_actual > 0.0 {
                let key = format!("{}-Q{}", year, quarter);
                comparison
                    .targeted_by_quarter
                    .insert(key.clone(), quarter_targeted);
                comparison.actual_by_quarter.insert(key, quarter_actual);
            }
        }
    }

    for (project, tasks) in &resolved {
        append_project_details(project, tasks, &mut comparison.project_details);
    }

    comparison
}

/// Average a per-project figure across the full project set. Projects
/// without matching tasks contribute 0; the denominator never shrinks.
fn average_over_projects<F>(resolved: &[(&Project, Vec<&Task>)], per_project: F) -> f64
where
    F: Fn(&[&Task]) -> f64,
{
    if resolved.is_empty() {
        return 0.0;
    }
    let total: f64 = resolved
        .iter()
        .map(|(_, tasks)| per_project(tasks.as_slice()))
        .sum();
    total / resolved.len() as f64
}

fn year_range(year: i32) -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN),
        NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX),
    )
}

/// Emit detail rows for one project: its own year set, one row per quarter
/// that carries either a target or observed progress.
fn append_project_details(
    project: &Project,
    tasks: &[&Task],
    details: &mut Vec<ProjectProgressDetail>,
) {
    if tasks.is_empty() {
        return;
    }

    let mut years: BTreeSet<i32> = BTreeSet::new();
    for task in tasks {
        years.insert(task.expected_end_date.year());
        for log in &task.logs {
            years.insert(log.date.year());
        }
    }

    for &year in &years {
        let annual_target: f64 = tasks
            .iter()
            .filter(|t| t.expected_end_date.year() == year)
            .map(|t| safe_weight(t.weight))
            .sum();

        for quarter in 1..=4u32 {
            let quarter_tasks: Vec<&&Task> = tasks
                .iter()
                .filter(|t| {
                    t.expected_end_date.year() == year && quarter_of(t.expected_end_date) == quarter
                })
                .collect();
            let quarter_target: f64 = quarter_tasks.iter().map(|t| safe_weight(t.weight)).sum();

            let (quarter_start, quarter_end) = quarter_range(year, quarter);

            // Logged progress across ALL of the project's tasks in this
            // window; the legacy done-ratio fallback activates only when no
            // log anywhere in the window recorded anything.
            let actual_from_logs: f64 = tasks
                .iter()
                .map(|t| safe_weight(t.weight) * sum_logs_in_range(t, quarter_start, quarter_end))
                .sum();
            let actual = if actual_from_logs > 0.0 {
                actual_from_logs
            } else {
                quarter_tasks
                    .iter()
                    .map(|t| safe_weight(t.weight) * normalize_progress(t.done_ratio.unwrap_or(0.0)))
                    .sum()
            };

            if quarter_target > 0.0 || actual > 0.0 {
                details.push(ProjectProgressDetail {
                    project_id: project.id,
                    project_name: project.display_name().to_string(),
                    year,
                    quarter: format!("Q{}", quarter),
                    annual_target_progress: annual_target,
                    quarter_target_progress: quarter_target,
                    actual_progress: actual,
                    delay_reasons: project.delay_reasons.clone(),
                });
            }
        }
    }
}
