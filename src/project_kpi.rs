//! Per-project KPIs: task status counts, completion percentages, department
//! and stage distributions, and timeline position for a single project.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::StatsError;
use crate::helpers::{build_task_lookup, clamp_unit, normalize_progress, tasks_for_project};
use crate::types::{Project, Task};

/// Computed metrics for a single project. Percentages are 0..100; per-stage
/// completion values are fractions in [0,1].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectKpis {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub in_progress_tasks: usize,
    pub not_started_tasks: usize,
    pub overdue_tasks: usize,

    pub completion_percentage: f64,
    pub average_task_completion: f64,

    pub tasks_by_department: BTreeMap<String, usize>,
    pub stage_task_counts: BTreeMap<String, usize>,
    /// Per stage: Σ(weight × done) / Σ weight, clamped to [0,1]. A stage
    /// whose weights sum to 0 yields 0.
    pub stage_completion_by_weight: BTreeMap<String, f64>,

    pub days_remaining: i64,
    pub total_project_days: i64,
    pub time_elapsed_percentage: f64,
}

/// Compute KPIs for one project and its resolved task list.
pub fn compute_project_kpis(project: &Project, tasks: &[&Task], today: NaiveDate) -> ProjectKpis {
    let mut kpis = ProjectKpis {
        total_tasks: tasks.len(),
        ..Default::default()
    };

    for task in tasks {
        match task.done_ratio {
            Some(r) if r >= 1.0 => kpis.completed_tasks += 1,
            Some(r) if r > 0.0 && r < 1.0 => kpis.in_progress_tasks += 1,
            Some(r) if r == 0.0 => kpis.not_started_tasks += 1,
            None => kpis.not_started_tasks += 1,
            _ => {}
        }
        if task.expected_end_date < today && task.done_ratio.unwrap_or(0.0) < 1.0 {
            kpis.overdue_tasks += 1;
        }
    }

    if kpis.total_tasks > 0 {
        kpis.completion_percentage =
            round2(kpis.completed_tasks as f64 / kpis.total_tasks as f64 * 100.0);
        let ratio_sum: f64 = tasks
            .iter()
            .map(|t| normalize_progress(t.done_ratio.unwrap_or(0.0)))
            .sum();
        kpis.average_task_completion = round2(ratio_sum / kpis.total_tasks as f64 * 100.0);
    }

    for task in tasks {
        if let Some(dept) = non_blank(task.department.as_deref()) {
            *kpis.tasks_by_department.entry(dept.to_string()).or_default() += 1;
        }
        if let Some(stage) = non_blank(task.stage_name.as_deref()) {
            *kpis.stage_task_counts.entry(stage.to_string()).or_default() += 1;
        }
    }

    for stage in kpis.stage_task_counts.keys() {
        let stage_tasks: Vec<&&Task> = tasks
            .iter()
            .filter(|t| non_blank(t.stage_name.as_deref()) == Some(stage.as_str()))
            .collect();
        let weight_sum: f64 = stage_tasks.iter().map(|t| t.weight.unwrap_or(0.0)).sum();
        let weighted_done: f64 = stage_tasks
            .iter()
            .map(|t| t.weight.unwrap_or(0.0) * normalize_progress(t.done_ratio.unwrap_or(0.0)))
            .sum();
        let relative = if weight_sum > 0.0 {
            weighted_done / weight_sum
        } else {
            0.0
        };
        kpis.stage_completion_by_weight
            .insert(stage.clone(), clamp_unit(relative));
    }

    kpis.total_project_days = (project.end_date - project.start_date).num_days();
    kpis.days_remaining = (project.end_date - today).num_days();
    if kpis.total_project_days > 0 {
        let elapsed = kpis.total_project_days - kpis.days_remaining;
        let raw = elapsed as f64 / kpis.total_project_days as f64 * 100.0;
        kpis.time_elapsed_percentage = round2(raw.clamp(0.0, 100.0));
    }

    kpis
}

/// Look a project up by id in the snapshot and compute its KPIs, resolving
/// tasks from the flat list when the project carries none.
pub fn project_kpis_by_id(
    projects: &[Project],
    all_tasks: &[Task],
    project_id: i64,
    now: Option<NaiveDate>,
) -> Result<ProjectKpis, StatsError> {
    let project = projects
        .iter()
        .find(|p| p.id == project_id)
        .ok_or(StatsError::ProjectNotFound(project_id))?;

    let today = now.unwrap_or_else(|| chrono::Local::now().date_naive());
    let lookup = build_task_lookup(all_tasks);
    let tasks = tasks_for_project(project, &lookup);
    Ok(compute_project_kpis(project, &tasks, today))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
