//! Portfolio statistics engine.
//!
//! Computes dashboard KPIs over a read-only snapshot of projects, weighted
//! tasks, and incremental progress logs: status distribution, budget
//! exposure, overdue/at-risk detection, and targeted-vs-actual progress by
//! year and quarter. Pure and synchronous: no I/O, no shared state. The
//! storage and web collaborators own persistence and serialization formats.
//!
//! Entry points: [`calculate_dashboard`] for the portfolio roll-up,
//! [`project_kpis_by_id`] for a single project's detail KPIs.

pub mod budget;
pub mod dashboard;
mod error;
pub mod helpers;
pub mod progress;
pub mod project_kpi;
pub mod risk;
pub mod status;
pub mod types;

pub use dashboard::{calculate_dashboard, PortfolioDashboard};
pub use error::StatsError;
pub use progress::{ProgressComparison, ProjectProgressDetail};
pub use project_kpi::{compute_project_kpis, project_kpis_by_id, ProjectKpis};
pub use risk::RiskProject;
pub use status::{ProjectRef, StatusBreakdown};
pub use types::{Project, Task, TaskLog};
