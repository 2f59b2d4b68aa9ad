//! Dashboard composer: one aggregation pass over the portfolio snapshot.
//!
//! Pure composition: the lookup is built once and handed to each
//! independent calculator. Calculators never call each other, and no logic
//! lives here beyond assembly.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::budget::{budgets_by_year, budgets_except_fully_done, projects_count_by_year};
use crate::helpers::build_task_lookup;
use crate::progress::{compute_progress, ProjectProgressDetail};
use crate::risk::{overdue_or_at_risk, RiskProject};
use crate::status::{classify_projects, StatusBreakdown};
use crate::types::{Project, Task};

/// The aggregate dashboard result: every portfolio KPI from one snapshot.
///
/// Maps are ordered so that re-serializing the same snapshot with the same
/// `now` yields byte-identical output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioDashboard {
    pub status: StatusBreakdown,
    pub projects_count_by_year: BTreeMap<i32, usize>,
    pub budgets_except_fully_done: BTreeMap<i64, f64>,
    pub project_names: BTreeMap<i64, String>,
    pub budgets_by_year: BTreeMap<i32, f64>,
    pub overdue_or_at_risk: Vec<RiskProject>,
    pub targeted_progress_by_year: BTreeMap<i32, f64>,
    pub actual_progress_by_year: BTreeMap<i32, f64>,
    pub targeted_progress_by_quarter: BTreeMap<String, f64>,
    pub actual_progress_by_quarter: BTreeMap<String, f64>,
    pub project_progress_details: Vec<ProjectProgressDetail>,
}

/// Compute every portfolio KPI for a snapshot.
///
/// `all_tasks` is the flat fallback list for projects that arrive without
/// their embedded task collections. `now` defaults to the current local
/// date; callers needing reproducible output pass it explicitly.
pub fn calculate_dashboard(
    projects: &[Project],
    all_tasks: &[Task],
    now: Option<NaiveDate>,
) -> PortfolioDashboard {
    let today = now.unwrap_or_else(|| chrono::Local::now().date_naive());
    let lookup = build_task_lookup(all_tasks);

    let status = classify_projects(projects, &lookup);
    let (budgets, project_names) = budgets_except_fully_done(projects, &lookup);
    let risk = overdue_or_at_risk(projects, &lookup, today);
    let progress = compute_progress(projects, &lookup);

    log::debug!(
        "dashboard: {} projects, {} flagged overdue/at-risk, {} reported years",
        projects.len(),
        risk.len(),
        progress.targeted_by_year.len()
    );

    PortfolioDashboard {
        status,
        projects_count_by_year: projects_count_by_year(projects),
        budgets_except_fully_done: budgets,
        project_names,
        budgets_by_year: budgets_by_year(projects),
        overdue_or_at_risk: risk,
        targeted_progress_by_year: progress.targeted_by_year,
        actual_progress_by_year: progress.actual_by_year,
        targeted_progress_by_quarter: progress.targeted_by_quarter,
        actual_progress_by_quarter: progress.actual_by_quarter,
        project_progress_details: progress.project_details,
    }
}
