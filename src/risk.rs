//! Risk analyzer: flags projects as overdue or at-risk.
//!
//! Overdue: past its end date with incomplete tasks. At-risk: not yet
//! overdue, but the incomplete tasks' estimated remaining work-days exceed
//! the project's total planned duration. The two flags are mutually
//! exclusive; overdue wins.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::helpers::tasks_for_project;
use crate::types::{Project, Task};

/// A flagged project, ready for the dashboard's risk list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProject {
    pub project_id: i64,
    pub name: String,
    pub end_date: NaiveDate,
    pub incomplete_tasks_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_reasons: Option<String>,
}

/// Flag overdue and at-risk projects, ordered overdue-first and then by
/// nearest deadline within each bucket.
pub fn overdue_or_at_risk(
    projects: &[Project],
    lookup: &HashMap<i64, Vec<&Task>>,
    today: NaiveDate,
) -> Vec<RiskProject> {
    let mut flagged: Vec<RiskProject> = Vec::new();

    for project in projects {
        let tasks = tasks_for_project(project, lookup);
        let incomplete: Vec<&&Task> = tasks
            .iter()
            .filter(|t| t.done_ratio.unwrap_or(0.0) < 1.0)
            .collect();
        let incomplete_count = incomplete.len();

        let remaining_required_days: i64 = incomplete.iter().map(|t| t.days_to_complete).sum();
        let project_duration_days = (project.end_date - project.start_date).num_days().max(0);

        let is_overdue = today > project.end_date && incomplete_count > 0;
        let is_at_risk = !is_overdue
            && incomplete_count > 0
            && remaining_required_days > project_duration_days;

        if is_overdue || is_at_risk {
            flagged.push(RiskProject {
                project_id: project.id,
                name: project.display_name().to_string(),
                end_date: project.end_date,
                incomplete_tasks_count: incomplete_count,
                delay_reasons: project.delay_reasons.clone(),
            });
        }
    }

    // Overdue bucket first, then the nearest deadline surfaces first.
    flagged.sort_by(|a, b| {
        let a_overdue = a.end_date < today;
        let b_overdue = b.end_date < today;
        b_overdue
            .cmp(&a_overdue)
            .then_with(|| a.end_date.cmp(&b.end_date))
    });

    flagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::build_task_lookup;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn task(project_id: i64, done_ratio: Option<f64>, days: i64) -> Task {
        Task {
            id: project_id * 10,
            project_id,
            stage_name: None,
            department: None,
            expected_start_date: date("2025-01-01"),
            expected_end_date: date("2025-12-31"),
            actual_end_date: None,
            done_ratio,
            weight: Some(100.0),
            cost: None,
            days_to_complete: days,
            logs: Vec::new(),
        }
    }

    fn project(id: i64, start: &str, end: &str, tasks: Vec<Task>) -> Project {
        Project {
            id,
            name: format!("Project {}", id),
            name_localized: None,
            start_date: date(start),
            end_date: date(end),
            total_cost: None,
            delay_reasons: None,
            tasks,
        }
    }

    #[test]
    fn past_deadline_with_incomplete_work_is_overdue() {
        let today = date("2025-06-15");
        let projects = vec![project(
            1,
            "2025-01-01",
            "2025-06-14",
            vec![task(1, Some(0.5), 10)],
        )];
        let flagged = overdue_or_at_risk(&projects, &build_task_lookup(&[]), today);
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].incomplete_tasks_count, 1);
    }

    #[test]
    fn fully_done_project_is_never_flagged() {
        let today = date("2025-06-15");
        let projects = vec![project(
            1,
            "2025-01-01",
            "2025-06-01",
            vec![task(1, Some(1.0), 10)],
        )];
        assert!(overdue_or_at_risk(&projects, &build_task_lookup(&[]), today).is_empty());
    }

    #[test]
    fn required_days_exceeding_duration_is_at_risk() {
        // 9-day duration, 30 required work-days, deadline still ahead.
        let today = date("2025-01-02");
        let projects = vec![project(
            1,
            "2025-01-01",
            "2025-01-10",
            vec![task(1, Some(0.0), 30)],
        )];
        let flagged = overdue_or_at_risk(&projects, &build_task_lookup(&[]), today);
        assert_eq!(flagged.len(), 1);
        // Not past the end date, so this is the at-risk bucket.
        assert!(flagged[0].end_date >= today);
    }

    #[test]
    fn overdue_and_at_risk_are_mutually_exclusive() {
        // Past-deadline AND under-resourced: flagged exactly once.
        let today = date("2025-06-15");
        let projects = vec![project(
            1,
            "2025-06-01",
            "2025-06-05",
            vec![task(1, Some(0.2), 400)],
        )];
        let flagged = overdue_or_at_risk(&projects, &build_task_lookup(&[]), today);
        assert_eq!(flagged.len(), 1);
    }

    #[test]
    fn comfortable_schedule_is_not_flagged() {
        let today = date("2025-01-15");
        let projects = vec![project(
            1,
            "2025-01-01",
            "2025-12-31",
            vec![task(1, Some(0.2), 30)],
        )];
        assert!(overdue_or_at_risk(&projects, &build_task_lookup(&[]), today).is_empty());
    }

    #[test]
    fn ordering_puts_overdue_first_then_nearest_deadline() {
        let today = date("2025-06-15");
        let projects = vec![
            // At-risk, later deadline.
            project(1, "2025-06-10", "2025-06-20", vec![task(1, None, 100)]),
            // Overdue, older deadline.
            project(2, "2025-01-01", "2025-03-01", vec![task(2, None, 1)]),
            // Overdue, nearer deadline.
            project(3, "2025-01-01", "2025-06-01", vec![task(3, None, 1)]),
            // At-risk, earlier deadline.
            project(4, "2025-06-12", "2025-06-18", vec![task(4, None, 100)]),
        ];
        let flagged = overdue_or_at_risk(&projects, &build_task_lookup(&[]), today);
        let ids: Vec<i64> = flagged.iter().map(|f| f.project_id).collect();
        assert_eq!(ids, vec![2, 3, 4, 1]);
    }

    #[test]
    fn absent_done_ratio_counts_as_incomplete() {
        let today = date("2025-06-15");
        let projects = vec![project(
            1,
            "2025-01-01",
            "2025-06-01",
            vec![task(1, None, 0), task(1, Some(1.0), 0)],
        )];
        let flagged = overdue_or_at_risk(&projects, &build_task_lookup(&[]), today);
        assert_eq!(flagged[0].incomplete_tasks_count, 1);
    }
}
