//! Snapshot types consumed by the statistics engine.
//!
//! Projects, tasks, and task logs arrive as read-only snapshots from the
//! storage collaborator. The engine creates no entities and mutates none;
//! a snapshot lives for the duration of a single aggregation call.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A project in the portfolio.
///
/// A project may arrive with its `tasks` collection pre-loaded. When that
/// collection is empty, calculators fall back to the flat task list supplied
/// alongside the projects (keyed by `project_id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub name: String,
    /// Localized display alternate. Wins over `name` when non-blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_localized: Option<String>,
    pub start_date: NaiveDate,
    /// Planned end. Enforced upstream to exceed `start_date`.
    pub end_date: NaiveDate,
    /// Committed project-level budget. Absent means the project is budgeted
    /// bottom-up from task costs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_reasons: Option<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Project {
    /// Display name: the localized alternate when non-blank, else `name`.
    pub fn display_name(&self) -> &str {
        match self.name_localized.as_deref() {
            Some(localized) if !localized.trim().is_empty() => localized,
            _ => &self.name,
        }
    }
}

/// A weighted task belonging to a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub project_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_name: Option<String>,
    /// Implementing department, used for per-project distribution KPIs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub expected_start_date: NaiveDate,
    pub expected_end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_end_date: Option<NaiveDate>,
    /// Legacy overall completion fraction in [0,1]. Absent is treated as 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done_ratio: Option<f64>,
    /// Percentage-point share (0-100) of the project's total completion.
    /// Absent or negative is treated as 0. Weights summing to 100 per
    /// project is an upstream invariant, not enforced here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    /// Estimated work-days required to complete the task.
    #[serde(default)]
    pub days_to_complete: i64,
    #[serde(default)]
    pub logs: Vec<TaskLog>,
}

/// A dated, incremental progress entry for a task.
///
/// `progress` is unit-ambiguous: legacy rows carry a percentage (0..100),
/// newer rows a fraction (0..1). Normalization is the engine's job; see
/// `helpers::normalize_progress`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskLog {
    pub id: i64,
    pub task_id: i64,
    pub date: NaiveDate,
    pub progress: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str, localized: Option<&str>) -> Project {
        Project {
            id: 1,
            name: name.to_string(),
            name_localized: localized.map(|s| s.to_string()),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            total_cost: None,
            delay_reasons: None,
            tasks: Vec::new(),
        }
    }

    #[test]
    fn display_name_prefers_localized() {
        let p = project("Platform Migration", Some("ترحيل المنصة"));
        assert_eq!(p.display_name(), "ترحيل المنصة");
    }

    #[test]
    fn display_name_falls_back_when_localized_blank() {
        assert_eq!(project("Alpha", Some("   ")).display_name(), "Alpha");
        assert_eq!(project("Alpha", None).display_name(), "Alpha");
    }

    #[test]
    fn snapshot_round_trips_camel_case() {
        let json = r#"{
            "id": 7,
            "projectId": 3,
            "expectedStartDate": "2025-01-01",
            "expectedEndDate": "2025-03-31",
            "doneRatio": 0.25,
            "weight": 40.0,
            "daysToComplete": 10,
            "logs": [{"id": 1, "taskId": 7, "date": "2025-02-10", "progress": 25.0}]
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.project_id, 3);
        assert_eq!(task.logs.len(), 1);
        assert_eq!(task.stage_name, None);
    }
}
