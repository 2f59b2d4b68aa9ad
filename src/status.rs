//! Status classifier: buckets each project into Done / NotStarted /
//! InProgress from its tasks' completion state.

use std::collections::HashMap;

use serde::Serialize;

use crate::helpers::tasks_for_project;
use crate::types::{Project, Task};

/// A project reference for UI drill-down lists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRef {
    pub project_id: i64,
    pub name: String,
}

/// Status distribution across the portfolio. Projects with zero tasks are
/// excluded from this KPI entirely.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBreakdown {
    pub in_progress_count: usize,
    pub not_started_count: usize,
    pub done_count: usize,
    pub in_progress: Vec<ProjectRef>,
    pub not_started: Vec<ProjectRef>,
    pub done: Vec<ProjectRef>,
}

/// Classify every project with at least one task into exactly one bucket.
///
/// Done when every task has `done_ratio >= 1.0`; else NotStarted when every
/// task sits at 0 (absent counts as 0); else InProgress. The all-done check
/// runs first, which resolves the degenerate single-state ties.
pub fn classify_projects(
    projects: &[Project],
    lookup: &HashMap<i64, Vec<&Task>>,
) -> StatusBreakdown {
    let mut breakdown = StatusBreakdown::default();

    for project in projects {
        let tasks = tasks_for_project(project, lookup);
        if tasks.is_empty() {
            continue;
        }

        let all_done = tasks.iter().all(|t| t.done_ratio.unwrap_or(0.0) >= 1.0);
        let none_started = tasks.iter().all(|t| t.done_ratio.unwrap_or(0.0) == 0.0);

        let entry = ProjectRef {
            project_id: project.id,
            name: project.display_name().to_string(),
        };

        if all_done {
            breakdown.done.push(entry);
        } else if none_started {
            breakdown.not_started.push(entry);
        } else {
            breakdown.in_progress.push(entry);
        }
    }

    breakdown.in_progress_count = breakdown.in_progress.len();
    breakdown.not_started_count = breakdown.not_started.len();
    breakdown.done_count = breakdown.done.len();
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::build_task_lookup;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn project(id: i64, ratios: &[Option<f64>]) -> Project {
        Project {
            id,
            name: format!("Project {}", id),
            name_localized: None,
            start_date: date("2025-01-01"),
            end_date: date("2025-12-31"),
            total_cost: None,
            delay_reasons: None,
            tasks: ratios
                .iter()
                .enumerate()
                .map(|(i, r)| Task {
                    id: id * 100 + i as i64,
                    project_id: id,
                    stage_name: None,
                    department: None,
                    expected_start_date: date("2025-01-01"),
                    expected_end_date: date("2025-12-31"),
                    actual_end_date: None,
                    done_ratio: *r,
                    weight: Some(50.0),
                    cost: None,
                    days_to_complete: 5,
                    logs: Vec::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn buckets_are_mutually_exclusive_and_exhaustive() {
        let projects = vec![
            project(1, &[Some(1.0), Some(1.0)]),          // done
            project(2, &[None, Some(0.0)]),               // not started
            project(3, &[Some(0.5), Some(0.0)]),          // in progress
            project(4, &[]),                              // no tasks: excluded
        ];
        let lookup = build_task_lookup(&[]);
        let breakdown = classify_projects(&projects, &lookup);

        assert_eq!(breakdown.done_count, 1);
        assert_eq!(breakdown.not_started_count, 1);
        assert_eq!(breakdown.in_progress_count, 1);

        let classified =
            breakdown.done_count + breakdown.not_started_count + breakdown.in_progress_count;
        assert_eq!(classified, 3);
        assert_eq!(breakdown.done[0].project_id, 1);
        assert_eq!(breakdown.not_started[0].project_id, 2);
        assert_eq!(breakdown.in_progress[0].project_id, 3);
    }

    #[test]
    fn absent_done_ratio_counts_as_not_started() {
        let projects = vec![project(1, &[None, None])];
        let breakdown = classify_projects(&projects, &build_task_lookup(&[]));
        assert_eq!(breakdown.not_started_count, 1);
    }

    #[test]
    fn over_complete_ratios_still_count_as_done() {
        let projects = vec![project(1, &[Some(1.0), Some(1.2)])];
        let breakdown = classify_projects(&projects, &build_task_lookup(&[]));
        assert_eq!(breakdown.done_count, 1);
    }

    #[test]
    fn flat_lookup_feeds_projects_without_embedded_tasks() {
        let p = project(1, &[]);
        let flat = project(1, &[Some(0.4)]).tasks;
        let lookup = build_task_lookup(&flat);
        let breakdown = classify_projects(&[p], &lookup);
        assert_eq!(breakdown.in_progress_count, 1);
    }
}
