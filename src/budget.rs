//! Budget aggregator: remaining budget exposure per project and committed
//! budget totals per end-date year.

use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;

use crate::helpers::tasks_for_project;
use crate::types::{Project, Task};

/// Count of projects per `end_date` year.
pub fn projects_count_by_year(projects: &[Project]) -> BTreeMap<i32, usize> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for project in projects {
        *counts.entry(project.end_date.year()).or_default() += 1;
    }
    counts
}

/// Per-project budget exposure, excluding fully-done projects, plus the
/// id-to-display-name map that accompanies it.
///
/// A project's budget is its committed `total_cost` when present, otherwise
/// the sum of its task costs. Negative figures floor to 0.
pub fn budgets_except_fully_done(
    projects: &[Project],
    lookup: &HashMap<i64, Vec<&Task>>,
) -> (BTreeMap<i64, f64>, BTreeMap<i64, String>) {
    let mut budgets: BTreeMap<i64, f64> = BTreeMap::new();
    let mut names: BTreeMap<i64, String> = BTreeMap::new();

    for project in projects {
        let tasks = tasks_for_project(project, lookup);
        let fully_done =
            !tasks.is_empty() && tasks.iter().all(|t| t.done_ratio.unwrap_or(0.0) >= 1.0);
        if fully_done {
            continue;
        }

        let budget = project
            .total_cost
            .unwrap_or_else(|| tasks.iter().map(|t| t.cost.unwrap_or(0.0)).sum());
        if budget < 0.0 {
            log::debug!("project {} budget {:.2} is negative, flooring to 0", project.id, budget);
        }
        budgets.insert(project.id, budget.max(0.0));
        names.insert(project.id, project.display_name().to_string());
    }

    (budgets, names)
}

/// Committed budget totals per `end_date` year.
///
/// Only project-level `total_cost` counts here; a project without one
/// contributes 0 even when its tasks carry costs. Yearly totals floor to 0.
pub fn budgets_by_year(projects: &[Project]) -> BTreeMap<i32, f64> {
    let mut totals: BTreeMap<i32, f64> = BTreeMap::new();
    for project in projects {
        *totals.entry(project.end_date.year()).or_default() += project.total_cost.unwrap_or(0.0);
    }
    for total in totals.values_mut() {
        *total = total.max(0.0);
    }
    totals
}
